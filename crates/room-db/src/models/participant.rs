//! Participant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for room_participants table
///
/// `role` is selected as `role::text`; the enum is parsed in the mapper.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Option<Uuid>,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub guest_token_id: Option<Uuid>,
}

/// Participant joined with users (left join, guests have no profile)
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantWithUserModel {
    #[sqlx(flatten)]
    pub participant: ParticipantModel,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_avatar_url: Option<String>,
}
