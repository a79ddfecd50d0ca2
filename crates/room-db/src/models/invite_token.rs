//! Guest token database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for guest_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct InviteTokenModel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub token_hash: String,
    pub max_uses: i32,
    pub current_uses: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

