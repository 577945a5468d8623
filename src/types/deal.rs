//! Deal types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::instagram::InstagramAccountBrief;

/// Sales funnel stage, one kanban column each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    #[default]
    New,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

/// Deal entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub title: String,
    pub client_id: Option<Uuid>,
    pub amount: f64,
    pub stage: DealStage,
    pub probability: i32,
    pub close_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub instagram_account_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client fields embedded into a deal listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientBrief {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Deal with its client and lead account resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DealWithRelations {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deal: Deal,
    pub clients: Option<Json<ClientBrief>>,
    pub instagram_accounts: Option<Json<InstagramAccountBrief>>,
}

/// Deal row produced by the importer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDeal {
    pub title: String,
    pub client_id: Option<Uuid>,
    pub amount: f64,
    pub stage: DealStage,
    pub probability: i32,
    pub country: Option<String>,
}

impl NewDeal {
    /// A fresh deal at the top of the funnel
    pub fn opening(title: impl Into<String>, client_id: Option<Uuid>, country: Option<String>) -> Self {
        Self {
            title: title.into(),
            client_id,
            amount: 0.0,
            stage: DealStage::New,
            probability: 0,
            country,
        }
    }
}

/// Request to create a deal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDealRequest {
    pub title: Option<String>,
    pub client_id: Option<Uuid>,
    pub amount: Option<f64>,
    pub stage: Option<DealStage>,
    pub probability: Option<i32>,
    pub close_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub instagram_account_id: Option<Uuid>,
    pub image_url: Option<String>,
}

/// Request to update a deal (kanban moves send only `stage`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDealRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub client_id: Option<Option<Uuid>>,
    pub amount: Option<f64>,
    pub stage: Option<DealStage>,
    pub probability: Option<i32>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub close_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub instagram_account_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub image_url: Option<Option<String>>,
}

impl UpdateDealRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.client_id.is_none()
            && self.amount.is_none()
            && self.stage.is_none()
            && self.probability.is_none()
            && self.close_date.is_none()
            && self.country.is_none()
            && self.instagram_account_id.is_none()
            && self.image_url.is_none()
    }
}

/// Optional filter for the deal listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealListQuery {
    pub country: Option<String>,
}
