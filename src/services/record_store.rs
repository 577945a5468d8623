//! Record store abstraction used by the import pipeline.
//!
//! Production code talks to Postgres through `db::store::PgRecordStore`;
//! tests use [`memory::MemoryStore`] so the pipeline runs without a database.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{ClientRef, NewClient, NewDeal, NewInstagramAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Bulk write access to the CRM tables.
///
/// Every insert is atomic for the slice it is given: either all rows are
/// written and their ids returned, or the call fails as a whole.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert clients, returning the ids of the inserted rows
    async fn insert_clients(&self, clients: &[NewClient]) -> Result<Vec<Uuid>, StoreError>;

    /// Insert deals, returning their new ids
    async fn insert_deals(&self, deals: &[NewDeal]) -> Result<Vec<Uuid>, StoreError>;

    /// Insert lead accounts, returning their new ids
    async fn insert_instagram_accounts(
        &self,
        accounts: &[NewInstagramAccount],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// Clients that no deal refers to, oldest first
    async fn clients_without_deals(&self) -> Result<Vec<ClientRef>, StoreError>;
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashSet;

    use parking_lot::Mutex;

    use super::*;

    /// How the fake reports client ids back
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum IdReport {
        /// The submitted ids, in submission order
        #[default]
        AsSubmitted,
        /// The submitted ids, reversed
        Reversed,
        /// Fresh ids the store made up, in submission order
        StoreAssigned,
        /// All rows are written but the last id is missing from the reply
        DropLast,
    }

    #[derive(Default)]
    struct State {
        clients: Vec<NewClient>,
        deals: Vec<(Uuid, NewDeal)>,
        accounts: Vec<(Uuid, NewInstagramAccount)>,
        client_calls: usize,
        deal_calls: usize,
        account_calls: usize,
    }

    /// In-memory store with scriptable failures. Call ordinals are 1-based.
    #[derive(Default)]
    pub struct MemoryStore {
        state: Mutex<State>,
        failing_client_calls: HashSet<usize>,
        failing_deal_calls: HashSet<usize>,
        failing_account_calls: HashSet<usize>,
        id_report: IdReport,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_client_call(mut self, call: usize) -> Self {
            self.failing_client_calls.insert(call);
            self
        }

        pub fn fail_deal_call(mut self, call: usize) -> Self {
            self.failing_deal_calls.insert(call);
            self
        }

        pub fn fail_account_call(mut self, call: usize) -> Self {
            self.failing_account_calls.insert(call);
            self
        }

        pub fn report_ids(mut self, report: IdReport) -> Self {
            self.id_report = report;
            self
        }

        /// Add an existing client outside of any import
        pub fn seed_client(&self, name: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.state.lock().clients.push(NewClient {
                id,
                name: name.to_string(),
                email: None,
                phone: None,
                company: None,
                status: Default::default(),
            });
            id
        }

        pub fn clients(&self) -> Vec<NewClient> {
            self.state.lock().clients.clone()
        }

        pub fn deals(&self) -> Vec<NewDeal> {
            self.state.lock().deals.iter().map(|(_, d)| d.clone()).collect()
        }

        pub fn accounts(&self) -> Vec<NewInstagramAccount> {
            self.state.lock().accounts.iter().map(|(_, a)| a.clone()).collect()
        }

        pub fn client_calls(&self) -> usize {
            self.state.lock().client_calls
        }

        pub fn deal_calls(&self) -> usize {
            self.state.lock().deal_calls
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn insert_clients(&self, clients: &[NewClient]) -> Result<Vec<Uuid>, StoreError> {
            let mut state = self.state.lock();
            state.client_calls += 1;
            if self.failing_client_calls.contains(&state.client_calls) {
                return Err(StoreError::Rejected(format!(
                    "clients insert #{} rejected",
                    state.client_calls
                )));
            }

            state.clients.extend_from_slice(clients);
            let mut ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
            match self.id_report {
                IdReport::AsSubmitted => {}
                IdReport::Reversed => ids.reverse(),
                IdReport::StoreAssigned => ids = ids.iter().map(|_| Uuid::new_v4()).collect(),
                IdReport::DropLast => {
                    ids.pop();
                }
            }
            Ok(ids)
        }

        async fn insert_deals(&self, deals: &[NewDeal]) -> Result<Vec<Uuid>, StoreError> {
            let mut state = self.state.lock();
            state.deal_calls += 1;
            if self.failing_deal_calls.contains(&state.deal_calls) {
                return Err(StoreError::Rejected(format!(
                    "deals insert #{} rejected",
                    state.deal_calls
                )));
            }

            let rows: Vec<(Uuid, NewDeal)> =
                deals.iter().map(|d| (Uuid::new_v4(), d.clone())).collect();
            let ids = rows.iter().map(|(id, _)| *id).collect();
            state.deals.extend(rows);
            Ok(ids)
        }

        async fn insert_instagram_accounts(
            &self,
            accounts: &[NewInstagramAccount],
        ) -> Result<Vec<Uuid>, StoreError> {
            let mut state = self.state.lock();
            state.account_calls += 1;
            if self.failing_account_calls.contains(&state.account_calls) {
                return Err(StoreError::Rejected(format!(
                    "instagram_accounts insert #{} rejected",
                    state.account_calls
                )));
            }

            let rows: Vec<(Uuid, NewInstagramAccount)> =
                accounts.iter().map(|a| (Uuid::new_v4(), a.clone())).collect();
            let ids = rows.iter().map(|(id, _)| *id).collect();
            state.accounts.extend(rows);
            Ok(ids)
        }

        async fn clients_without_deals(&self) -> Result<Vec<ClientRef>, StoreError> {
            let state = self.state.lock();
            let with_deals: HashSet<Uuid> =
                state.deals.iter().filter_map(|(_, d)| d.client_id).collect();

            Ok(state
                .clients
                .iter()
                .filter(|c| !with_deals.contains(&c.id))
                .map(|c| ClientRef {
                    id: c.id,
                    name: c.name.clone(),
                })
                .collect())
        }
    }
}
