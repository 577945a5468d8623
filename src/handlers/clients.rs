//! Client CRUD endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::{parse_id, required_text, ApiError, AppState};
use crate::db::queries;
use crate::types::{Ack, Client, CreateClientRequest, SuccessResponse, UpdateClientRequest};

const NOT_FOUND: &str = "Клиент не найден";
const NAME_REQUIRED: &str = "Имя клиента обязательно";

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = queries::client::list_clients(&state.pool).await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;

    queries::client::get_client(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Client>>, ApiError> {
    let Json(mut request) = payload?;
    let name = required_text(request.name.take(), NAME_REQUIRED)?;

    let client = queries::client::create_client(&state.pool, &name, request).await?;
    info!(client_id = %client.id, "Client created");

    Ok(Json(SuccessResponse::new(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateClientRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Client>>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;
    let Json(mut request) = payload?;
    if let Some(name) = request.name.take() {
        request.name = Some(required_text(Some(name), NAME_REQUIRED)?);
    }

    let client = queries::client::update_client(&state.pool, id, request)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(SuccessResponse::new(client)))
}

/// Deleting an unknown id is not an error
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    if let Some(id) = parse_id(&id) {
        if queries::client::delete_client(&state.pool, id).await? {
            info!(client_id = %id, "Client deleted");
        }
    }
    Ok(Json(Ack::ok()))
}
