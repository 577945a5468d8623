//! Spreadsheet import pipeline
//!
//! rows → normalizer → batch writer → (clients only) linker → deal batch.
//! Each run owns its counters; nothing is shared between runs and nothing is
//! retried. A failed chunk is recorded in the summary and skipped.

use thiserror::Error;
use tracing::{info, warn};

use super::batch_writer::BatchWriter;
use super::linker::link_deals;
use super::normalizer::{
    normalize_account_row, normalize_client_row, truncate, ClientImportItem, ACCOUNT_COLUMNS_HINT,
    CLIENT_COLUMNS_HINT, COUNTRY_MAX,
};
use super::record_store::{RecordStore, StoreError};
use super::spreadsheet::SheetRow;
use crate::defaults::{DEFAULT_BATCH_SIZE, DEFAULT_COUNTRY};
use crate::types::{
    AccountImportSummary, BatchError, ClientImportSummary, DealBackfillSummary, NewClient,
    NewDeal,
};

/// Knobs shared by every import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub batch_size: usize,
    /// Country for rows that name none
    pub default_country: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    /// Normalization left nothing to write
    #[error("{0}")]
    NoValidRows(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Import clients and open one deal per imported client.
///
/// Client chunk failures are reported with `message`, deal chunk failures
/// with `deals`. A failed deal chunk does not undo its clients.
pub async fn import_clients(
    store: &dyn RecordStore,
    rows: &[SheetRow],
    settings: &ImportSettings,
) -> Result<ClientImportSummary, ImportError> {
    let items: Vec<ClientImportItem> = rows
        .iter()
        .filter_map(|row| normalize_client_row(row, &settings.default_country))
        .collect();

    if items.is_empty() {
        return Err(ImportError::NoValidRows(CLIENT_COLUMNS_HINT));
    }

    let writer = BatchWriter::new(settings.batch_size);
    let mut imported_clients = 0;
    let mut imported_deals = 0;
    let mut errors = Vec::new();

    for (batch, chunk) in writer.chunks(&items) {
        let clients: Vec<NewClient> = chunk.iter().map(ClientImportItem::to_new_client).collect();

        let inserted_ids = match store.insert_clients(&clients).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(batch, rows = chunk.len(), error = %e, "Client chunk insert failed, skipping");
                errors.push(BatchError::records(batch, e.to_string()));
                continue;
            }
        };
        imported_clients += inserted_ids.len();

        let deals: Vec<NewDeal> = link_deals(chunk, &clients, &inserted_ids);
        let outcome = writer.write(&deals, |deals| store.insert_deals(deals)).await;
        imported_deals += outcome.inserted;
        errors.extend(outcome.errors.into_iter().map(|e| retag_as_deals(e, batch)));
    }

    info!(
        rows = rows.len(),
        total = items.len(),
        chunks = writer.chunk_count(items.len()),
        imported_clients,
        imported_deals,
        failed_batches = errors.len(),
        "Client import finished"
    );

    Ok(ClientImportSummary {
        success: true,
        imported: imported_clients,
        imported_clients,
        imported_deals,
        total: items.len(),
        errors,
    })
}

fn retag_as_deals(error: BatchError, batch: usize) -> BatchError {
    let message = error.message.or(error.deals).unwrap_or_default();
    BatchError::deals(batch, message)
}

/// Import Instagram lead accounts
pub async fn import_instagram_accounts(
    store: &dyn RecordStore,
    rows: &[SheetRow],
    settings: &ImportSettings,
) -> Result<AccountImportSummary, ImportError> {
    let accounts: Vec<_> = rows.iter().filter_map(normalize_account_row).collect();

    if accounts.is_empty() {
        return Err(ImportError::NoValidRows(ACCOUNT_COLUMNS_HINT));
    }

    let outcome = BatchWriter::new(settings.batch_size)
        .write(&accounts, |chunk| store.insert_instagram_accounts(chunk))
        .await;

    info!(
        rows = rows.len(),
        total = accounts.len(),
        imported = outcome.inserted,
        failed_batches = outcome.errors.len(),
        "Instagram import finished"
    );

    Ok(AccountImportSummary {
        success: true,
        imported: outcome.inserted,
        total: outcome.attempted,
        errors: outcome.errors,
    })
}

/// Open a deal for every client that has none yet.
///
/// A blank `country` falls back to the configured default. Longer names are
/// cut to the column width.
pub async fn create_missing_deals(
    store: &dyn RecordStore,
    country: Option<&str>,
    settings: &ImportSettings,
) -> Result<DealBackfillSummary, ImportError> {
    let country = country
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&settings.default_country);
    let country = truncate(country, COUNTRY_MAX);

    let clients = store.clients_without_deals().await?;
    if clients.is_empty() {
        return Ok(DealBackfillSummary {
            success: true,
            created: 0,
            total: 0,
            errors: Vec::new(),
            message: Some("У всех клиентов уже есть сделки".to_string()),
        });
    }

    let deals: Vec<NewDeal> = clients
        .iter()
        .map(|c| NewDeal::opening(c.name.clone(), Some(c.id), Some(country.clone())))
        .collect();

    let outcome = BatchWriter::new(settings.batch_size)
        .write(&deals, |chunk| store.insert_deals(chunk))
        .await;

    info!(
        total = deals.len(),
        created = outcome.inserted,
        country = %country,
        "Deal backfill finished"
    );

    Ok(DealBackfillSummary {
        success: true,
        created: outcome.inserted,
        total: outcome.attempted,
        errors: outcome.errors,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::record_store::memory::{IdReport, MemoryStore};
    use crate::services::spreadsheet::Cell;
    use tokio_test::{assert_err, assert_ok};

    fn client_rows(n: usize, blank_every: Option<usize>) -> Vec<SheetRow> {
        (0..n)
            .map(|i| {
                let name = match blank_every {
                    Some(k) if i % k == k - 1 => String::new(),
                    _ => format!("Client {i}"),
                };
                let mut row = SheetRow::new();
                row.insert("name".into(), Cell::Text(name));
                row.insert("phone".into(), Cell::Text(format!("+7 900 {i:07}")));
                row.insert("country_code".into(), Cell::Text("kz".into()));
                row
            })
            .collect()
    }

    fn settings(batch_size: usize) -> ImportSettings {
        ImportSettings {
            batch_size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn imports_clients_with_one_deal_each() {
        let store = MemoryStore::new();
        let rows = client_rows(7, None);

        let summary = assert_ok!(import_clients(&store, &rows, &settings(3)).await);

        assert_eq!(summary.total, 7);
        assert_eq!(summary.imported_clients, 7);
        assert_eq!(summary.imported, 7);
        assert_eq!(summary.imported_deals, 7);
        assert!(summary.errors.is_empty());
        assert_eq!(store.client_calls(), 3);
        assert_eq!(store.deal_calls(), 3);

        let clients = store.clients();
        let deals = store.deals();
        for (client, deal) in clients.iter().zip(&deals) {
            assert_eq!(deal.client_id, Some(client.id));
            assert_eq!(deal.title, client.name);
            assert_eq!(deal.country.as_deref(), Some("Казахстан"));
        }
    }

    #[tokio::test]
    async fn skipped_rows_only_lower_the_total() {
        let store = MemoryStore::new();
        let rows = client_rows(10, Some(5));

        let summary = import_clients(&store, &rows, &settings(50)).await.unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(summary.total, 8);
        assert_eq!(summary.imported_clients, 8);
    }

    #[tokio::test]
    async fn no_valid_rows_is_rejected_before_any_write() {
        let store = MemoryStore::new();
        let rows = client_rows(3, Some(1));

        let err = assert_err!(import_clients(&store, &rows, &settings(50)).await);

        assert!(matches!(err, ImportError::NoValidRows(CLIENT_COLUMNS_HINT)));
        assert_eq!(store.client_calls(), 0);
    }

    #[tokio::test]
    async fn failed_client_chunk_is_recorded_and_skipped() {
        let store = MemoryStore::new().fail_client_call(2);
        let rows = client_rows(9, None);

        let summary = import_clients(&store, &rows, &settings(3)).await.unwrap();

        assert_eq!(store.client_calls(), 3, "chunk C is still attempted");
        assert_eq!(summary.imported_clients, 6);
        assert_eq!(summary.imported_deals, 6);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].batch, 2);
        assert!(summary.errors[0].message.is_some());
        assert!(summary.errors[0].deals.is_none());
        assert_eq!(store.deal_calls(), 2, "no deals for a failed client chunk");
    }

    #[tokio::test]
    async fn failed_deal_chunk_keeps_its_clients() {
        let store = MemoryStore::new().fail_deal_call(1);
        let rows = client_rows(4, None);

        let summary = import_clients(&store, &rows, &settings(2)).await.unwrap();

        assert_eq!(summary.imported_clients, 4);
        assert_eq!(summary.imported_deals, 2);
        assert_eq!(store.clients().len(), 4);
        assert_eq!(
            summary.errors,
            vec![BatchError::deals(1, "deals insert #1 rejected")]
        );
    }

    #[tokio::test]
    async fn short_id_reply_links_remaining_deal_to_nobody() {
        let store = MemoryStore::new().report_ids(IdReport::DropLast);
        let rows = client_rows(3, None);

        let summary = import_clients(&store, &rows, &settings(3)).await.unwrap();

        assert_eq!(summary.imported_clients, 2);
        assert_eq!(summary.imported_deals, 3);
        let deals = store.deals();
        assert!(deals[0].client_id.is_some());
        assert!(deals[1].client_id.is_some());
        assert_eq!(deals[2].client_id, None);
    }

    #[tokio::test]
    async fn reordered_id_reply_keeps_pairs_intact() {
        let store = MemoryStore::new().report_ids(IdReport::Reversed);
        let rows = client_rows(5, None);

        import_clients(&store, &rows, &settings(5)).await.unwrap();

        for (client, deal) in store.clients().iter().zip(store.deals()) {
            assert_eq!(deal.client_id, Some(client.id));
        }
    }

    #[tokio::test]
    async fn hundred_twenty_rows_with_three_blank_names() {
        let store = MemoryStore::new().fail_client_call(2);
        let mut rows = client_rows(120, None);
        for i in [10, 60, 110] {
            rows[i].insert("name".into(), Cell::Text("   ".into()));
        }

        let summary = import_clients(&store, &rows, &settings(50)).await.unwrap();

        assert_eq!(summary.total, 117);
        assert_eq!(store.client_calls(), 3);
        // chunks of 50, 50, 17; the second one fails
        assert_eq!(summary.imported_clients, 67);
        assert_eq!(summary.imported_deals, summary.imported_clients);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].batch, 2);
    }

    #[tokio::test]
    async fn instagram_import_continues_past_failed_chunk() {
        let store = MemoryStore::new().fail_account_call(1);
        let rows: Vec<SheetRow> = (0..5)
            .map(|i| {
                let mut row = SheetRow::new();
                row.insert("username".into(), Cell::Text(format!("lead_{i}")));
                row.insert("is_verified".into(), Cell::Text("да".into()));
                row
            })
            .collect();

        let summary = import_instagram_accounts(&store, &rows, &settings(2)).await.unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].batch, 1);
        let accounts = store.accounts();
        assert_eq!(accounts[0].username, "lead_2");
        assert!(accounts.iter().all(|a| a.is_verified));
    }

    #[tokio::test]
    async fn instagram_import_without_usernames_is_rejected() {
        let store = MemoryStore::new();
        let mut row = SheetRow::new();
        row.insert("full_name".into(), Cell::Text("Nobody".into()));

        let err = import_instagram_accounts(&store, &[row], &settings(50)).await.unwrap_err();
        assert!(matches!(err, ImportError::NoValidRows(ACCOUNT_COLUMNS_HINT)));
    }

    #[tokio::test]
    async fn backfill_opens_deals_only_for_clients_without_one() {
        let store = MemoryStore::new();
        let rows = client_rows(2, None);
        import_clients(&store, &rows, &settings(50)).await.unwrap();
        let lonely = store.seed_client("Без сделки");

        let summary = create_missing_deals(&store, Some("  Грузия "), &settings(50)).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.total, 1);
        let deals = store.deals();
        let backfilled = deals.last().unwrap();
        assert_eq!(backfilled.client_id, Some(lonely));
        assert_eq!(backfilled.country.as_deref(), Some("Грузия"));
    }

    #[tokio::test]
    async fn backfill_with_nothing_to_do_reports_a_message() {
        let store = MemoryStore::new();

        let summary = create_missing_deals(&store, None, &ImportSettings::default()).await.unwrap();

        assert_eq!(summary.created, 0);
        assert!(summary.message.is_some());
        assert_eq!(store.deal_calls(), 0);
    }

    #[tokio::test]
    async fn backfill_defaults_blank_country() {
        let store = MemoryStore::new();
        store.seed_client("A");

        create_missing_deals(&store, Some(""), &ImportSettings::default()).await.unwrap();

        assert_eq!(store.deals()[0].country.as_deref(), Some(DEFAULT_COUNTRY));
    }

    #[tokio::test]
    async fn backfill_truncates_long_country() {
        let store = MemoryStore::new();
        store.seed_client("A");

        let country = "страна".repeat(60);
        let summary = create_missing_deals(&store, Some(&country), &ImportSettings::default())
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        let stored = store.deals()[0].country.clone().unwrap();
        assert_eq!(stored.chars().count(), COUNTRY_MAX);
    }
}
