//! Task types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientName {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealTitle {
    pub id: Uuid,
    pub title: String,
}

/// Task with the names of its client and deal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskWithRelations {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub clients: Option<Json<ClientName>>,
    pub deals: Option<Json<DealTitle>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub deal_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub client_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub deal_id: Option<Option<Uuid>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "super::deserialize_patch")]
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.client_id.is_none()
            && self.deal_id.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}
