//! Client database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{non_blank, Client, CreateClientRequest, UpdateClientRequest};

/// List all clients, newest first
pub async fn list_clients(pool: &PgPool) -> Result<Vec<Client>> {
    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, email, phone, company, status, created_at
        FROM clients
        ORDER BY created_at DESC
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Get a single client by ID
pub async fn get_client(pool: &PgPool, id: Uuid) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, email, phone, company, status, created_at
        FROM clients
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Create a client. Blank optional fields are stored as NULL.
pub async fn create_client(
    pool: &PgPool,
    name: &str,
    request: CreateClientRequest,
) -> Result<Client> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (name, email, phone, company, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, phone, company, status, created_at
        "#
    )
    .bind(name)
    .bind(non_blank(request.email))
    .bind(non_blank(request.phone))
    .bind(non_blank(request.company))
    .bind(request.status.unwrap_or_default())
    .fetch_one(pool)
    .await?;

    Ok(client)
}

/// Update the fields present in `request`.
///
/// Returns `None` if the client does not exist.
pub async fn update_client(
    pool: &PgPool,
    id: Uuid,
    request: UpdateClientRequest,
) -> Result<Option<Client>> {
    let Some(existing) = get_client(pool, id).await? else {
        return Ok(None);
    };
    if request.is_empty() {
        return Ok(Some(existing));
    }

    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
        SET name = $1, email = $2, phone = $3, company = $4, status = $5
        WHERE id = $6
        RETURNING id, name, email, phone, company, status, created_at
        "#
    )
    .bind(request.name.unwrap_or(existing.name))
    .bind(request.email.unwrap_or(existing.email))
    .bind(request.phone.unwrap_or(existing.phone))
    .bind(request.company.unwrap_or(existing.company))
    .bind(request.status.unwrap_or(existing.status))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Delete a client. Deals and tasks pointing at it keep a NULL reference.
pub async fn delete_client(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
