//! Response DTOs for service operations
//!
//! All response DTOs implement `Serialize`. Identifiers serialize as UUID
//! strings.

use chrono::{DateTime, Utc};
use room_core::value_objects::{ParticipantId, ParticipantRole, RoomId, TokenId, UserId};
use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// User Responses
// ============================================================================

/// The caller's own profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Room Responses
// ============================================================================

/// Room response
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: RoomId,
    pub owner_id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    /// Relative URL of the room page
    pub path: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub is_persistent: bool,
    pub settings: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Room with its live participant count (owner dashboard)
#[derive(Debug, Clone, Serialize)]
pub struct RoomWithCountResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub participant_count: i64,
}

// ============================================================================
// Participant Responses
// ============================================================================

/// Participant response
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub id: ParticipantId,
    pub room_id: RoomId,
    pub user_id: Option<UserId>,
    pub role: ParticipantRole,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Outcome of an email invite, one bucket per address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InviteReport {
    /// Users added to the room
    pub added: Vec<String>,
    /// Users who already had a participant row
    pub already_members: Vec<String>,
    /// Well-formed addresses with no account
    pub unknown: Vec<String>,
    /// Entries that are not email addresses
    pub invalid: Vec<String>,
}

// ============================================================================
// Invite Token Responses
// ============================================================================

/// Invite token metadata (never includes the secret or its hash)
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub id: TokenId,
    pub room_id: RoomId,
    pub label: String,
    pub max_uses: i32,
    pub current_uses: i32,
    pub remaining_uses: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A freshly issued token. `secret` is shown once and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokenResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub secret: String,
}

/// Result of redeeming a guest link
#[derive(Debug, Clone, Serialize)]
pub struct RedemptionResponse {
    pub participant: ParticipantResponse,
    pub room: RoomResponse,
}

/// Result of one sweep run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepResponse {
    pub deactivated: u64,
    pub swept_at: DateTime<Utc>,
}
