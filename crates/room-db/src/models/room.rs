//! Room database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rooms table
#[derive(Debug, Clone, FromRow)]
pub struct RoomModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub is_persistent: bool,
    pub settings: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Room row with an aggregated participant count
#[derive(Debug, Clone, FromRow)]
pub struct RoomWithCountModel {
    #[sqlx(flatten)]
    pub room: RoomModel,
    pub participant_count: i64,
}
