//! Deal CRUD endpoints (the kanban board talks to these)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::info;

use super::{parse_id, required_text, ApiError, AppState};
use crate::db::queries;
use crate::types::{
    Ack, CreateDealRequest, Deal, DealListQuery, DealWithRelations, SuccessResponse,
    UpdateDealRequest,
};

const NOT_FOUND: &str = "Сделка не найдена";
const TITLE_REQUIRED: &str = "Название сделки обязательно";

fn check_probability(probability: Option<i32>) -> Result<(), ApiError> {
    match probability {
        Some(p) if !(0..=100).contains(&p) => Err(ApiError::BadRequest(
            "Вероятность должна быть от 0 до 100".to_string(),
        )),
        _ => Ok(()),
    }
}

/// `?country=` narrows the list to one country
pub async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<DealListQuery>,
) -> Result<Json<Vec<DealWithRelations>>, ApiError> {
    let deals = queries::deal::list_deals(&state.pool, query.country.as_deref()).await?;
    Ok(Json(deals))
}

pub async fn get_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DealWithRelations>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;

    queries::deal::get_deal(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn create_deal(
    State(state): State<AppState>,
    payload: Result<Json<CreateDealRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Deal>>, ApiError> {
    let Json(mut request) = payload?;
    let title = required_text(request.title.take(), TITLE_REQUIRED)?;
    check_probability(request.probability)?;

    let deal = queries::deal::create_deal(&state.pool, &title, request).await?;
    info!(deal_id = %deal.id, stage = ?deal.stage, "Deal created");

    Ok(Json(SuccessResponse::new(deal)))
}

pub async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDealRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Deal>>, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(NOT_FOUND))?;
    let Json(mut request) = payload?;
    if let Some(title) = request.title.take() {
        request.title = Some(required_text(Some(title), TITLE_REQUIRED)?);
    }
    check_probability(request.probability)?;

    let deal = queries::deal::update_deal(&state.pool, id, request)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(SuccessResponse::new(deal)))
}

pub async fn delete_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    if let Some(id) = parse_id(&id) {
        if queries::deal::delete_deal(&state.pool, id).await? {
            info!(deal_id = %id, "Deal deleted");
        }
    }
    Ok(Json(Ack::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use uuid::Uuid;

    use super::*;
    use crate::handlers::test_support::{json_request, send, test_app};
    use crate::services::record_store::memory::MemoryStore;

    fn app() -> axum::Router {
        test_app(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn probability_bounds() {
        assert!(check_probability(None).is_ok());
        assert!(check_probability(Some(0)).is_ok());
        assert!(check_probability(Some(100)).is_ok());
        assert!(check_probability(Some(101)).is_err());
        assert!(check_probability(Some(-1)).is_err());
    }

    #[tokio::test]
    async fn create_requires_a_title() {
        let (status, json) = send(app(), json_request("POST", "/api/deals", r#"{"amount": 100}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], TITLE_REQUIRED);
    }

    #[tokio::test]
    async fn unknown_stage_is_rejected() {
        let uri = format!("/api/deals/{}", Uuid::new_v4());
        let (status, _) = send(app(), json_request("PUT", &uri, r#"{"stage":"won"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_probability_is_rejected() {
        let (status, _) = send(
            app(),
            json_request("POST", "/api/deals", r#"{"title":"Deal","probability":150}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
