//! Task database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{non_blank, CreateTaskRequest, Task, TaskWithRelations, UpdateTaskRequest};

/// List tasks, newest first, with client name and deal title embedded
pub async fn list_tasks(pool: &PgPool) -> Result<Vec<TaskWithRelations>> {
    let tasks = sqlx::query_as::<_, TaskWithRelations>(
        r#"
        SELECT t.id, t.title, t.description, t.client_id, t.deal_id, t.status,
               t.due_date, t.priority, t.created_at,
               CASE WHEN c.id IS NULL THEN NULL
                    ELSE json_build_object('id', c.id, 'name', c.name) END AS clients,
               CASE WHEN d.id IS NULL THEN NULL
                    ELSE json_build_object('id', d.id, 'title', d.title) END AS deals
        FROM tasks t
        LEFT JOIN clients c ON c.id = t.client_id
        LEFT JOIN deals d ON d.id = t.deal_id
        ORDER BY t.created_at DESC
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn get_task(pool: &PgPool, id: Uuid) -> Result<Option<TaskWithRelations>> {
    let task = sqlx::query_as::<_, TaskWithRelations>(
        r#"
        SELECT t.id, t.title, t.description, t.client_id, t.deal_id, t.status,
               t.due_date, t.priority, t.created_at,
               CASE WHEN c.id IS NULL THEN NULL
                    ELSE json_build_object('id', c.id, 'name', c.name) END AS clients,
               CASE WHEN d.id IS NULL THEN NULL
                    ELSE json_build_object('id', d.id, 'title', d.title) END AS deals
        FROM tasks t
        LEFT JOIN clients c ON c.id = t.client_id
        LEFT JOIN deals d ON d.id = t.deal_id
        WHERE t.id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

async fn get_plain_task(pool: &PgPool, id: Uuid) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, title, description, client_id, deal_id, status, due_date, priority, created_at
        FROM tasks
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Create a task; status defaults to `pending`, priority to `medium`
pub async fn create_task(pool: &PgPool, title: &str, request: CreateTaskRequest) -> Result<Task> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (title, description, client_id, deal_id, status, due_date, priority)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, description, client_id, deal_id, status, due_date, priority, created_at
        "#
    )
    .bind(title)
    .bind(non_blank(request.description))
    .bind(request.client_id)
    .bind(request.deal_id)
    .bind(request.status.unwrap_or_default())
    .bind(request.due_date)
    .bind(request.priority.unwrap_or_default())
    .fetch_one(pool)
    .await?;

    Ok(task)
}

pub async fn update_task(
    pool: &PgPool,
    id: Uuid,
    request: UpdateTaskRequest,
) -> Result<Option<Task>> {
    let Some(existing) = get_plain_task(pool, id).await? else {
        return Ok(None);
    };
    if request.is_empty() {
        return Ok(Some(existing));
    }

    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET title = $1, description = $2, client_id = $3, deal_id = $4,
            status = $5, due_date = $6, priority = $7
        WHERE id = $8
        RETURNING id, title, description, client_id, deal_id, status, due_date, priority, created_at
        "#
    )
    .bind(request.title.unwrap_or(existing.title))
    .bind(request.description.unwrap_or(existing.description))
    .bind(request.client_id.unwrap_or(existing.client_id))
    .bind(request.deal_id.unwrap_or(existing.deal_id))
    .bind(request.status.unwrap_or(existing.status))
    .bind(request.due_date.unwrap_or(existing.due_date))
    .bind(request.priority.unwrap_or(existing.priority))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

pub async fn delete_task(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
