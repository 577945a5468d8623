//! HTTP error mapping

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::services::importer::ImportError;
use crate::services::record_store::StoreError;
use crate::services::spreadsheet::SpreadsheetError;
use crate::types::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingFile(&'static str),

    #[error("{0}")]
    UnsupportedExtension(&'static str),

    /// Normalization dropped every row; the message names the expected columns
    #[error("{0}")]
    NoValidRows(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// Broken or oversized multipart body
    #[error("{0}")]
    Upload(#[from] MultipartError),

    #[error("{0}")]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile(_)
            | ApiError::UnsupportedExtension(_)
            | ApiError::NoValidRows(_)
            | ApiError::BadRequest(_)
            | ApiError::Spreadsheet(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upload(e) => e.status(),
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::NoValidRows(hint) => ApiError::NoValidRows(hint),
            ImportError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let mut body = ErrorBody::new(self.to_string());
        if matches!(self, ApiError::NoValidRows(_)) {
            body.imported = Some(0);
        }

        (status, Json(body)).into_response()
    }
}
