//! Client types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Client status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

/// Client entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

/// Client row produced by the importer, ready for a bulk insert.
///
/// The id is assigned before the insert so dependent deals can be paired
/// with their client regardless of the order the store reports ids back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClient {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ClientStatus,
}

/// Minimal client projection used when backfilling deals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
}

/// Request to create a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<ClientStatus>,
}

/// Request to update a client. Absent keys are left untouched,
/// an explicit `null` clears a nullable column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub company: Option<Option<String>>,
    pub status: Option<ClientStatus>,
}

impl UpdateClientRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.status.is_none()
    }
}
