//! Deal database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{non_blank, CreateDealRequest, Deal, DealWithRelations, UpdateDealRequest};

/// List deals, newest first, with their client and lead account embedded.
///
/// `country` is matched exactly after trimming; a blank filter lists everything.
pub async fn list_deals(pool: &PgPool, country: Option<&str>) -> Result<Vec<DealWithRelations>> {
    let country = country.map(str::trim).filter(|c| !c.is_empty());

    let deals = sqlx::query_as::<_, DealWithRelations>(
        r#"
        SELECT d.id, d.title, d.client_id, d.amount, d.stage, d.probability, d.close_date,
               d.country, d.instagram_account_id, d.image_url, d.created_at,
               CASE WHEN c.id IS NULL THEN NULL ELSE json_build_object(
                   'id', c.id, 'name', c.name, 'email', c.email,
                   'phone', c.phone, 'company', c.company
               ) END AS clients,
               CASE WHEN ia.id IS NULL THEN NULL ELSE json_build_object(
                   'id', ia.id, 'username', ia.username, 'user_link', ia.user_link,
                   'full_name', ia.full_name, 'is_private', ia.is_private,
                   'is_verified', ia.is_verified
               ) END AS instagram_accounts
        FROM deals d
        LEFT JOIN clients c ON c.id = d.client_id
        LEFT JOIN instagram_accounts ia ON ia.id = d.instagram_account_id
        WHERE ($1::text IS NULL OR d.country = $1)
        ORDER BY d.created_at DESC
        "#
    )
    .bind(country)
    .fetch_all(pool)
    .await?;

    Ok(deals)
}

/// Get a single deal with its relations
pub async fn get_deal(pool: &PgPool, id: Uuid) -> Result<Option<DealWithRelations>> {
    let deal = sqlx::query_as::<_, DealWithRelations>(
        r#"
        SELECT d.id, d.title, d.client_id, d.amount, d.stage, d.probability, d.close_date,
               d.country, d.instagram_account_id, d.image_url, d.created_at,
               CASE WHEN c.id IS NULL THEN NULL ELSE json_build_object(
                   'id', c.id, 'name', c.name, 'email', c.email,
                   'phone', c.phone, 'company', c.company
               ) END AS clients,
               CASE WHEN ia.id IS NULL THEN NULL ELSE json_build_object(
                   'id', ia.id, 'username', ia.username, 'user_link', ia.user_link,
                   'full_name', ia.full_name, 'is_private', ia.is_private,
                   'is_verified', ia.is_verified
               ) END AS instagram_accounts
        FROM deals d
        LEFT JOIN clients c ON c.id = d.client_id
        LEFT JOIN instagram_accounts ia ON ia.id = d.instagram_account_id
        WHERE d.id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}

async fn get_plain_deal(pool: &PgPool, id: Uuid) -> Result<Option<Deal>> {
    let deal = sqlx::query_as::<_, Deal>(
        r#"
        SELECT id, title, client_id, amount, stage, probability, close_date,
               country, instagram_account_id, image_url, created_at
        FROM deals
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}

/// Create a deal. Amount, stage and probability default to 0, `new` and 0.
pub async fn create_deal(pool: &PgPool, title: &str, request: CreateDealRequest) -> Result<Deal> {
    let deal = sqlx::query_as::<_, Deal>(
        r#"
        INSERT INTO deals (title, client_id, amount, stage, probability, close_date,
                           country, instagram_account_id, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, title, client_id, amount, stage, probability, close_date,
                  country, instagram_account_id, image_url, created_at
        "#
    )
    .bind(title)
    .bind(request.client_id)
    .bind(request.amount.unwrap_or(0.0))
    .bind(request.stage.unwrap_or_default())
    .bind(request.probability.unwrap_or(0))
    .bind(request.close_date)
    .bind(non_blank(request.country).map(|c| c.trim().to_string()))
    .bind(request.instagram_account_id)
    .bind(non_blank(request.image_url))
    .fetch_one(pool)
    .await?;

    Ok(deal)
}

/// Update the fields present in `request`; a kanban move sends only `stage`
pub async fn update_deal(
    pool: &PgPool,
    id: Uuid,
    request: UpdateDealRequest,
) -> Result<Option<Deal>> {
    let Some(existing) = get_plain_deal(pool, id).await? else {
        return Ok(None);
    };
    if request.is_empty() {
        return Ok(Some(existing));
    }

    let deal = sqlx::query_as::<_, Deal>(
        r#"
        UPDATE deals
        SET title = $1, client_id = $2, amount = $3, stage = $4, probability = $5,
            close_date = $6, country = $7, instagram_account_id = $8, image_url = $9
        WHERE id = $10
        RETURNING id, title, client_id, amount, stage, probability, close_date,
                  country, instagram_account_id, image_url, created_at
        "#
    )
    .bind(request.title.unwrap_or(existing.title))
    .bind(request.client_id.unwrap_or(existing.client_id))
    .bind(request.amount.unwrap_or(existing.amount))
    .bind(request.stage.unwrap_or(existing.stage))
    .bind(request.probability.unwrap_or(existing.probability))
    .bind(request.close_date.unwrap_or(existing.close_date))
    .bind(request.country.unwrap_or(existing.country))
    .bind(request.instagram_account_id.unwrap_or(existing.instagram_account_id))
    .bind(request.image_url.unwrap_or(existing.image_url))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}

/// Delete a deal. Tasks pointing at it keep a NULL reference.
pub async fn delete_deal(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM deals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
