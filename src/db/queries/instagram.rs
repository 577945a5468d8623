//! Instagram lead account queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{
    non_blank, CreateInstagramAccountRequest, InstagramAccount, UpdateInstagramAccountRequest,
};

pub async fn list_accounts(pool: &PgPool) -> Result<Vec<InstagramAccount>> {
    let accounts = sqlx::query_as::<_, InstagramAccount>(
        r#"
        SELECT id, username, user_link, full_name, is_private, is_verified, created_at
        FROM instagram_accounts
        ORDER BY created_at DESC
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

pub async fn get_account(pool: &PgPool, id: Uuid) -> Result<Option<InstagramAccount>> {
    let account = sqlx::query_as::<_, InstagramAccount>(
        r#"
        SELECT id, username, user_link, full_name, is_private, is_verified, created_at
        FROM instagram_accounts
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// Create a lead account; missing flags are false
pub async fn create_account(
    pool: &PgPool,
    username: &str,
    request: CreateInstagramAccountRequest,
) -> Result<InstagramAccount> {
    let account = sqlx::query_as::<_, InstagramAccount>(
        r#"
        INSERT INTO instagram_accounts (username, user_link, full_name, is_private, is_verified)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, user_link, full_name, is_private, is_verified, created_at
        "#
    )
    .bind(username)
    .bind(non_blank(request.user_link))
    .bind(non_blank(request.full_name))
    .bind(request.is_private.unwrap_or(false))
    .bind(request.is_verified.unwrap_or(false))
    .fetch_one(pool)
    .await?;

    Ok(account)
}

pub async fn update_account(
    pool: &PgPool,
    id: Uuid,
    request: UpdateInstagramAccountRequest,
) -> Result<Option<InstagramAccount>> {
    let Some(existing) = get_account(pool, id).await? else {
        return Ok(None);
    };
    if request.is_empty() {
        return Ok(Some(existing));
    }

    let account = sqlx::query_as::<_, InstagramAccount>(
        r#"
        UPDATE instagram_accounts
        SET username = $1, user_link = $2, full_name = $3, is_private = $4, is_verified = $5
        WHERE id = $6
        RETURNING id, username, user_link, full_name, is_private, is_verified, created_at
        "#
    )
    .bind(request.username.unwrap_or(existing.username))
    .bind(request.user_link.unwrap_or(existing.user_link))
    .bind(request.full_name.unwrap_or(existing.full_name))
    .bind(request.is_private.unwrap_or(existing.is_private))
    .bind(request.is_verified.unwrap_or(existing.is_verified))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM instagram_accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
