//! Task CRUD endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::{parse_id, required_text, ApiError, AppState};
use crate::db::queries;
use crate::types::{
    Ack, CreateTaskRequest, SuccessResponse, Task, TaskWithRelations, UpdateTaskRequest,
};

const NOT_FOUND: &str = "Задача не найдена";
const TITLE_REQUIRED: &str = "Название задачи обязательно";

pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskWithRelations>>, ApiError> {
    let tasks = queries::task::list_tasks(&state.pool).await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskWithRelations>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;

    queries::task::get_task(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Task>>, ApiError> {
    let Json(mut request) = payload?;
    let title = required_text(request.title.take(), TITLE_REQUIRED)?;

    let task = queries::task::create_task(&state.pool, &title, request).await?;
    info!(task_id = %task.id, "Task created");

    Ok(Json(SuccessResponse::new(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Task>>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;
    let Json(mut request) = payload?;
    if let Some(title) = request.title.take() {
        request.title = Some(required_text(Some(title), TITLE_REQUIRED)?);
    }

    let task = queries::task::update_task(&state.pool, id, request)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(SuccessResponse::new(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    if let Some(id) = parse_id(&id) {
        queries::task::delete_task(&state.pool, id).await?;
    }
    Ok(Json(Ack::ok()))
}
