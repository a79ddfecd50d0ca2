//! Participant entity <-> model mapper

use room_core::entities::{Participant, ParticipantWithUser};
use room_core::error::DomainError;
use room_core::value_objects::{ParticipantId, ParticipantRole, RoomId, TokenId, UserId};

use crate::models::{ParticipantModel, ParticipantWithUserModel};

/// Convert ParticipantModel to Participant entity
impl TryFrom<ParticipantModel> for Participant {
    type Error = DomainError;

    fn try_from(model: ParticipantModel) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse::<ParticipantRole>()
            .map_err(|_| DomainError::DatabaseError(format!("unknown role in row: {}", model.role)))?;

        Ok(Participant {
            id: ParticipantId::from_uuid(model.id),
            room_id: RoomId::from_uuid(model.room_id),
            user_id: model.user_id.map(UserId::from_uuid),
            role,
            joined_at: model.joined_at,
            last_seen: model.last_seen,
            guest_token_id: model.guest_token_id.map(TokenId::from_uuid),
        })
    }
}

impl TryFrom<ParticipantWithUserModel> for ParticipantWithUser {
    type Error = DomainError;

    fn try_from(model: ParticipantWithUserModel) -> Result<Self, Self::Error> {
        Ok(ParticipantWithUser {
            participant: Participant::try_from(model.participant)?,
            name: model.user_name,
            email: model.user_email,
            avatar_url: model.user_avatar_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn model(role: &str, user_id: Option<Uuid>) -> ParticipantModel {
        ParticipantModel {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            user_id,
            role: role.to_string(),
            joined_at: Utc::now(),
            last_seen: Utc::now(),
            guest_token_id: None,
        }
    }

    #[test]
    fn test_role_parsed() {
        let p = Participant::try_from(model("moderator", Some(Uuid::new_v4()))).unwrap();
        assert_eq!(p.role, ParticipantRole::Moderator);
        assert!(!p.is_guest());
    }

    #[test]
    fn test_unknown_role_is_database_error() {
        let err = Participant::try_from(model("admin", None)).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
