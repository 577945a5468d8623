//! Instagram lead account endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::{parse_id, required_text, ApiError, AppState};
use crate::db::queries;
use crate::types::{
    Ack, CreateInstagramAccountRequest, InstagramAccount, SuccessResponse,
    UpdateInstagramAccountRequest,
};

const NOT_FOUND: &str = "Аккаунт не найден";
const USERNAME_REQUIRED: &str = "Username обязателен";

pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstagramAccount>>, ApiError> {
    let accounts = queries::instagram::list_accounts(&state.pool).await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstagramAccount>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;

    queries::instagram::get_account(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateInstagramAccountRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<InstagramAccount>>, ApiError> {
    let Json(mut request) = payload?;
    let username = required_text(request.username.take(), USERNAME_REQUIRED)?;

    let account = queries::instagram::create_account(&state.pool, &username, request).await?;
    info!(account_id = %account.id, username = %account.username, "Instagram account created");

    Ok(Json(SuccessResponse::new(account)))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateInstagramAccountRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<InstagramAccount>>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;
    let Json(mut request) = payload?;
    if let Some(username) = request.username.take() {
        request.username = Some(required_text(Some(username), USERNAME_REQUIRED)?);
    }

    let account = queries::instagram::update_account(&state.pool, id, request)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(SuccessResponse::new(account)))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    if let Some(id) = parse_id(&id) {
        queries::instagram::delete_account(&state.pool, id).await?;
    }
    Ok(Json(Ack::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::handlers::test_support::{json_request, send, test_app};
    use crate::services::record_store::memory::MemoryStore;

    #[tokio::test]
    async fn create_requires_a_username() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let (status, json) = send(
            app,
            json_request("POST", "/api/instagram", r#"{"full_name":"Без ника","is_private":true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Username обязателен");
    }
}
