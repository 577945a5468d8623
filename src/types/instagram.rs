//! Instagram lead account types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lead account entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InstagramAccount {
    pub id: Uuid,
    pub username: String,
    pub user_link: Option<String>,
    pub full_name: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Lead account embedded into a deal listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramAccountBrief {
    pub id: Uuid,
    pub username: String,
    pub user_link: Option<String>,
    pub full_name: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
}

/// Lead account row produced by the importer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInstagramAccount {
    pub username: String,
    pub user_link: Option<String>,
    pub full_name: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInstagramAccountRequest {
    pub username: Option<String>,
    pub user_link: Option<String>,
    pub full_name: Option<String>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInstagramAccountRequest {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub user_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub full_name: Option<Option<String>>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
}

impl UpdateInstagramAccountRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.user_link.is_none()
            && self.full_name.is_none()
            && self.is_private.is_none()
            && self.is_verified.is_none()
    }
}
