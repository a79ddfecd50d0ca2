//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use room_core::entities::{
    InviteToken, Participant, ParticipantWithUser, Room, RoomWithCount, User,
};

use super::responses::{
    ParticipantResponse, RoomResponse, RoomWithCountResponse, TokenResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            display_name: user.display_name().to_string(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Room Mappers
// ============================================================================

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            owner_id: room.owner_id,
            name: room.name.clone(),
            description: room.description.clone(),
            slug: room.slug.clone(),
            path: room.path(),
            is_public: room.is_public,
            max_participants: room.max_participants,
            is_persistent: room.is_persistent,
            settings: room.settings.clone(),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}

impl From<RoomWithCount> for RoomWithCountResponse {
    fn from(value: RoomWithCount) -> Self {
        Self {
            room: RoomResponse::from(&value.room),
            participant_count: value.participant_count,
        }
    }
}

// ============================================================================
// Participant Mappers
// ============================================================================

impl From<ParticipantWithUser> for ParticipantResponse {
    fn from(value: ParticipantWithUser) -> Self {
        let display_name = value.display_name();
        let p = value.participant;
        Self {
            id: p.id,
            room_id: p.room_id,
            user_id: p.user_id,
            role: p.role,
            display_name,
            email: value.email,
            avatar_url: value.avatar_url,
            joined_at: p.joined_at,
            last_seen: p.last_seen,
        }
    }
}

/// Participant without joined profile fields (e.g. a fresh guest)
impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self::from(ParticipantWithUser {
            participant,
            name: None,
            email: None,
            avatar_url: None,
        })
    }
}

// ============================================================================
// Invite Token Mappers
// ============================================================================

impl From<&InviteToken> for TokenResponse {
    fn from(token: &InviteToken) -> Self {
        Self {
            id: token.id,
            room_id: token.room_id,
            label: token.label.clone(),
            max_uses: token.max_uses,
            current_uses: token.current_uses,
            remaining_uses: token.remaining_uses(),
            expires_at: token.expires_at,
            is_active: token.is_active,
            created_at: token.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::value_objects::{RoomId, TokenId, UserId};

    #[test]
    fn test_guest_participant_display_name() {
        let guest = Participant::guest(RoomId::generate(), TokenId::generate());
        let response = ParticipantResponse::from(guest);
        assert_eq!(response.display_name, "Guest");
        assert!(response.user_id.is_none());
    }

    #[test]
    fn test_room_response_json_shape() {
        let room = Room::new(
            RoomId::generate(),
            UserId::generate(),
            "Standup".to_string(),
            "standup".to_string(),
        );
        let json = serde_json::to_value(RoomResponse::from(&room)).unwrap();
        assert_eq!(json["slug"], "standup");
        assert_eq!(json["max_participants"], 10);
        assert!(json.get("description").is_none());
        assert_eq!(json["settings"], serde_json::json!({}));
    }
}
