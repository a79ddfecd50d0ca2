//! Room entity <-> model mapper

use room_core::entities::{Room, RoomWithCount};
use room_core::value_objects::{RoomId, UserId};
use serde_json::{Map, Value};

use crate::models::{RoomModel, RoomWithCountModel};

/// Convert RoomModel to Room entity
impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        // The column is constrained to objects; anything else reads as empty
        let settings = match model.settings {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Room {
            id: RoomId::from_uuid(model.id),
            owner_id: UserId::from_uuid(model.owner_id),
            name: model.name,
            description: model.description,
            slug: model.slug,
            is_public: model.is_public,
            max_participants: model.max_participants,
            is_persistent: model.is_persistent,
            settings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RoomWithCountModel> for RoomWithCount {
    fn from(model: RoomWithCountModel) -> Self {
        RoomWithCount {
            room: Room::from(model.room),
            participant_count: model.participant_count,
        }
    }
}

/// Settings as a JSON value for binding
pub fn settings_json(room: &Room) -> Value {
    Value::Object(room.settings.clone())
}
