//! Spreadsheet import endpoints

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use super::{ApiError, AppState};
use crate::services::importer;
use crate::services::spreadsheet::{read_rows, SheetFormat, SheetRow};
use crate::types::{
    AccountImportSummary, ClientImportSummary, CreateDealsRequest, DealBackfillSummary,
};

const CLIENT_FILE_MISSING: &str = "Файл не загружен. Выберите .xlsx или .xls файл.";
const CLIENT_FILE_UNSUPPORTED: &str = "Поддерживаются только файлы .xlsx и .xls";
const ACCOUNT_FILE_MISSING: &str = "Файл не загружен. Выберите .xlsx или .xls.";
const ACCOUNT_FILE_UNSUPPORTED: &str = "Поддерживаются только .xlsx, .xls, .csv";

/// The `file` field of a multipart upload
struct Upload {
    file_name: String,
    bytes: Bytes,
}

async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    missing: &'static str,
) -> Result<Upload, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::MissingFile(missing))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::MissingFile(missing));
        }
        return Ok(Upload { file_name, bytes });
    }

    Err(ApiError::MissingFile(missing))
}

/// Parse off the async runtime; calamine is CPU bound
async fn parse_upload(upload: Upload, format: SheetFormat) -> Result<Vec<SheetRow>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || read_rows(&upload.bytes, format))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(rows)
}

/// `POST /api/import/clients`: `.xlsx`/`.xls` with company listings
pub async fn import_clients(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClientImportSummary>, ApiError> {
    let upload = read_upload(multipart, CLIENT_FILE_MISSING).await?;
    let format = match SheetFormat::from_filename(&upload.file_name) {
        Some(format @ (SheetFormat::Xlsx | SheetFormat::Xls)) => format,
        _ => return Err(ApiError::UnsupportedExtension(CLIENT_FILE_UNSUPPORTED)),
    };

    info!(file = %upload.file_name, bytes = upload.bytes.len(), "Client import upload received");
    let rows = parse_upload(upload, format).await?;

    let summary = importer::import_clients(state.store.as_ref(), &rows, &state.import).await?;
    Ok(Json(summary))
}

/// `POST /api/import/instagram`: `.xlsx`/`.xls`/`.csv` with lead accounts
pub async fn import_instagram(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AccountImportSummary>, ApiError> {
    let upload = read_upload(multipart, ACCOUNT_FILE_MISSING).await?;
    let format = SheetFormat::from_filename(&upload.file_name)
        .ok_or(ApiError::UnsupportedExtension(ACCOUNT_FILE_UNSUPPORTED))?;

    info!(file = %upload.file_name, bytes = upload.bytes.len(), "Instagram import upload received");
    let rows = parse_upload(upload, format).await?;

    let summary =
        importer::import_instagram_accounts(state.store.as_ref(), &rows, &state.import).await?;
    Ok(Json(summary))
}

/// `POST /api/import/create-deals-from-clients`, body `{country?}` or empty
pub async fn create_deals_from_clients(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DealBackfillSummary>, ApiError> {
    let request: CreateDealsRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateDealsRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let summary =
        importer::create_missing_deals(state.store.as_ref(), request.country.as_deref(), &state.import)
            .await?;
    Ok(Json(summary))
}
