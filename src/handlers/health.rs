//! Liveness endpoint

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "CRM API работает".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::handlers::test_support::{get, send, test_app};
    use crate::services::record_store::memory::MemoryStore;

    #[tokio::test]
    async fn health_is_ok() {
        let app = test_app(Arc::new(MemoryStore::new()));

        let (status, json) = send(app, get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["message"], "CRM API работает");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let (status, _) = send(app, get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
