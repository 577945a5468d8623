//! Postgres implementation of the import record store

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::services::record_store::{RecordStore, StoreError};
use crate::types::{ClientRef, NewClient, NewDeal, NewInstagramAccount};

/// Writes each chunk as one multi-row `INSERT ... RETURNING id`
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_clients(&self, clients: &[NewClient]) -> Result<Vec<Uuid>, StoreError> {
        if clients.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO clients (id, name, email, phone, company, status) ");
        qb.push_values(clients, |mut row, client| {
            row.push_bind(client.id)
                .push_bind(&client.name)
                .push_bind(&client.email)
                .push_bind(&client.phone)
                .push_bind(&client.company)
                .push_bind(client.status);
        });
        qb.push(" RETURNING id");

        let ids = qb.build_query_scalar::<Uuid>().fetch_all(&self.pool).await?;
        Ok(ids)
    }

    async fn insert_deals(&self, deals: &[NewDeal]) -> Result<Vec<Uuid>, StoreError> {
        if deals.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO deals (title, client_id, amount, stage, probability, country) ",
        );
        qb.push_values(deals, |mut row, deal| {
            row.push_bind(&deal.title)
                .push_bind(deal.client_id)
                .push_bind(deal.amount)
                .push_bind(deal.stage)
                .push_bind(deal.probability)
                .push_bind(&deal.country);
        });
        qb.push(" RETURNING id");

        let ids = qb.build_query_scalar::<Uuid>().fetch_all(&self.pool).await?;
        Ok(ids)
    }

    async fn insert_instagram_accounts(
        &self,
        accounts: &[NewInstagramAccount],
    ) -> Result<Vec<Uuid>, StoreError> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO instagram_accounts (username, user_link, full_name, is_private, is_verified) ",
        );
        qb.push_values(accounts, |mut row, account| {
            row.push_bind(&account.username)
                .push_bind(&account.user_link)
                .push_bind(&account.full_name)
                .push_bind(account.is_private)
                .push_bind(account.is_verified);
        });
        qb.push(" RETURNING id");

        let ids = qb.build_query_scalar::<Uuid>().fetch_all(&self.pool).await?;
        Ok(ids)
    }

    async fn clients_without_deals(&self) -> Result<Vec<ClientRef>, StoreError> {
        let clients = sqlx::query_as::<_, ClientRef>(
            r#"
            SELECT c.id, c.name
            FROM clients c
            WHERE NOT EXISTS (SELECT 1 FROM deals d WHERE d.client_id = c.id)
            ORDER BY c.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }
}
