//! Participant entity - a user's (or guest's) membership in a room

use chrono::{DateTime, Utc};

use crate::value_objects::{ParticipantId, ParticipantRole, RoomId, TokenId, UserId};

/// Participant entity (junction between Room and User, or a token-admitted guest)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub room_id: RoomId,
    /// `None` for guests
    pub user_id: Option<UserId>,
    pub role: ParticipantRole,
    pub joined_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Token a guest was admitted with
    pub guest_token_id: Option<TokenId>,
}

impl Participant {
    fn new(
        room_id: RoomId,
        user_id: Option<UserId>,
        role: ParticipantRole,
        guest_token_id: Option<TokenId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ParticipantId::generate(),
            room_id,
            user_id,
            role,
            joined_at: now,
            last_seen: now,
            guest_token_id,
        }
    }

    /// The owner row written together with the room
    pub fn owner(room_id: RoomId, user_id: UserId) -> Self {
        Self::new(room_id, Some(user_id), ParticipantRole::Owner, None)
    }

    /// A registered user added by the owner
    pub fn member(room_id: RoomId, user_id: UserId, role: ParticipantRole) -> Self {
        Self::new(room_id, Some(user_id), role, None)
    }

    /// An anonymous guest admitted by an invite token
    pub fn guest(room_id: RoomId, token_id: TokenId) -> Self {
        Self::new(room_id, None, ParticipantRole::Guest, Some(token_id))
    }

    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role == ParticipantRole::Owner
    }

    #[inline]
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    /// Check whether this row belongs to a given user
    #[inline]
    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }

    /// Record activity
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_seen {
            self.last_seen = at;
        }
    }
}

/// Participant joined with the public profile fields of its user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantWithUser {
    pub participant: Participant,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl ParticipantWithUser {
    /// Label for participant lists
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        match (&self.email, self.participant.is_guest()) {
            (Some(email), _) => email.split('@').next().unwrap_or(email).to_string(),
            (None, true) => "Guest".to_string(),
            (None, false) => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_constructors() {
        let room_id = RoomId::generate();
        let user_id = UserId::generate();

        let owner = Participant::owner(room_id, user_id);
        assert!(owner.is_owner());
        assert!(owner.is_user(user_id));
        assert!(!owner.is_guest());

        let member = Participant::member(room_id, user_id, ParticipantRole::Moderator);
        assert_eq!(member.role, ParticipantRole::Moderator);

        let token_id = TokenId::generate();
        let guest = Participant::guest(room_id, token_id);
        assert!(guest.is_guest());
        assert_eq!(guest.role, ParticipantRole::Guest);
        assert_eq!(guest.guest_token_id, Some(token_id));
    }

    #[test]
    fn test_touch_only_moves_forward() {
        let mut p = Participant::guest(RoomId::generate(), TokenId::generate());
        let seen = p.last_seen;

        p.touch(seen - Duration::minutes(5));
        assert_eq!(p.last_seen, seen);

        p.touch(seen + Duration::minutes(5));
        assert_eq!(p.last_seen, seen + Duration::minutes(5));
    }

    #[test]
    fn test_display_name() {
        let guest = ParticipantWithUser {
            participant: Participant::guest(RoomId::generate(), TokenId::generate()),
            name: None,
            email: None,
            avatar_url: None,
        };
        assert_eq!(guest.display_name(), "Guest");

        let member = ParticipantWithUser {
            participant: Participant::member(
                RoomId::generate(),
                UserId::generate(),
                ParticipantRole::Member,
            ),
            name: None,
            email: Some("sam@corp.com".to_string()),
            avatar_url: None,
        };
        assert_eq!(member.display_name(), "sam");
    }
}
