//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Length checks here run on the raw input; the domain layer re-checks the
//! trimmed values.

use chrono::Duration;
use room_core::entities::{InviteExpiry, RoomPatch};
use room_core::error::DomainError;
use room_core::value_objects::{ParticipantId, ParticipantRole, UserId};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 3, max = 100, message = "Room name must be 3-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl CreateRoomRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update room request
///
/// An empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 3, max = 100, message = "Room name must be 3-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub is_public: Option<bool>,

    #[validate(range(min = 2, max = 100, message = "Max participants must be 2-100"))]
    pub max_participants: Option<i32>,

    pub is_persistent: Option<bool>,

    /// Free-form room settings; must be a JSON object
    pub settings: Option<serde_json::Value>,
}

impl From<UpdateRoomRequest> for RoomPatch {
    fn from(request: UpdateRoomRequest) -> Self {
        Self {
            name: request.name,
            description: request.description.map(Some),
            is_public: request.is_public,
            max_participants: request.max_participants,
            is_persistent: request.is_persistent,
            settings: request.settings,
        }
    }
}

// ============================================================================
// Participant Requests
// ============================================================================

/// Add an existing user to a room
#[derive(Debug, Clone, Deserialize)]
pub struct AddParticipantRequest {
    pub user_id: UserId,

    #[serde(default)]
    pub role: ParticipantRole,
}

/// Change a participant's role
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub participant_id: ParticipantId,
    pub role: ParticipantRole,
}

/// Invite registered users by email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteByEmailRequest {
    /// Comma or newline separated addresses
    #[validate(length(min = 1, message = "Enter at least one email address"))]
    pub emails: String,

    #[serde(default)]
    pub role: ParticipantRole,
}

// ============================================================================
// Invite Token Requests
// ============================================================================

fn default_max_uses() -> i32 {
    10
}

/// Issue a shareable guest link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueTokenRequest {
    #[validate(length(max = 100, message = "Label must be at most 100 characters"))]
    pub label: Option<String>,

    #[serde(default = "default_max_uses")]
    #[validate(range(min = 1, max = 1000, message = "Max uses must be 1-1000"))]
    pub max_uses: i32,

    /// Preset lifetime: `1h`, `24h`, `7d` or `30d`
    pub expires_in: Option<String>,

    /// Explicit lifetime in seconds; takes precedence over `expires_in`
    pub ttl_secs: Option<i64>,
}

impl Default for IssueTokenRequest {
    fn default() -> Self {
        Self {
            label: None,
            max_uses: default_max_uses(),
            expires_in: None,
            ttl_secs: None,
        }
    }
}

impl IssueTokenRequest {
    /// Requested lifetime, or `fallback` when none was given
    pub fn ttl(&self, fallback: Duration) -> Result<Duration, DomainError> {
        if let Some(secs) = self.ttl_secs {
            return Duration::try_seconds(secs).ok_or_else(|| {
                DomainError::ValidationError("token lifetime out of range".to_string())
            });
        }
        match self.expires_in.as_deref() {
            None => Ok(fallback),
            Some(preset) => InviteExpiry::parse(preset)
                .map(InviteExpiry::duration)
                .ok_or_else(|| {
                    DomainError::ValidationError(format!("unknown expiry preset: {preset}"))
                }),
        }
    }
}

/// Redeem a guest link
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemTokenRequest {
    /// Plaintext secret from the shared link
    pub token: String,
}
