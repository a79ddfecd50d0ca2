//! Invite token entity <-> model mapper

use room_core::entities::InviteToken;
use room_core::value_objects::{RoomId, TokenHash, TokenId, UserId};

use crate::models::InviteTokenModel;

/// Convert InviteTokenModel to InviteToken entity
impl From<InviteTokenModel> for InviteToken {
    fn from(model: InviteTokenModel) -> Self {
        InviteToken {
            id: TokenId::from_uuid(model.id),
            room_id: RoomId::from_uuid(model.room_id),
            created_by: UserId::from_uuid(model.created_by),
            label: model.name,
            token_hash: TokenHash::from_stored(model.token_hash),
            max_uses: model.max_uses,
            current_uses: model.current_uses,
            expires_at: model.expires_at,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
