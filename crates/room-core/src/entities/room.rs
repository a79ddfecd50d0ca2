//! Room entity - a named, slugged meeting space owned by one user

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::value_objects::{RoomId, UserId};

/// Bounds on room fields
pub struct RoomLimits;

impl RoomLimits {
    pub const NAME_MIN: usize = 3;
    pub const NAME_MAX: usize = 100;
    pub const DESCRIPTION_MAX: usize = 500;
    pub const PARTICIPANTS_MIN: i32 = 2;
    pub const PARTICIPANTS_MAX: i32 = 100;
    pub const PARTICIPANTS_DEFAULT: i32 = 10;

    /// Trim and length-check a room name
    pub fn name(name: &str) -> Result<String, DomainError> {
        let name = name.trim();
        let len = name.chars().count();
        if (Self::NAME_MIN..=Self::NAME_MAX).contains(&len) {
            Ok(name.to_string())
        } else {
            Err(DomainError::ValidationError(format!(
                "room name must be between {} and {} characters",
                Self::NAME_MIN,
                Self::NAME_MAX
            )))
        }
    }

    /// Normalize a description; blank becomes `None`
    pub fn description(description: Option<&str>) -> Result<Option<String>, DomainError> {
        let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(None);
        };
        if description.chars().count() > Self::DESCRIPTION_MAX {
            return Err(DomainError::ValidationError(format!(
                "description must be at most {} characters",
                Self::DESCRIPTION_MAX
            )));
        }
        Ok(Some(description.to_string()))
    }

    pub fn max_participants(max: i32) -> Result<i32, DomainError> {
        if (Self::PARTICIPANTS_MIN..=Self::PARTICIPANTS_MAX).contains(&max) {
            Ok(max)
        } else {
            Err(DomainError::ValidationError(format!(
                "max participants must be between {} and {}",
                Self::PARTICIPANTS_MIN,
                Self::PARTICIPANTS_MAX
            )))
        }
    }

    /// Settings must be a JSON object
    pub fn settings(settings: Value) -> Result<Map<String, Value>, DomainError> {
        match settings {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            _ => Err(DomainError::ValidationError(
                "settings must be a JSON object".to_string(),
            )),
        }
    }
}

/// Room entity
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub max_participants: i32,
    pub is_persistent: bool,
    pub settings: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Create a new private Room with default capacity
    pub fn new(id: RoomId, owner_id: UserId, name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            name,
            description: None,
            slug,
            is_public: false,
            max_participants: RoomLimits::PARTICIPANTS_DEFAULT,
            is_persistent: false,
            settings: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Check if a user is the room owner
    #[inline]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Relative URL of the room page
    pub fn path(&self) -> String {
        format!("/rooms/{}", self.slug)
    }

    /// Update the room name (the slug is kept)
    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Update the room description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_visibility(&mut self, is_public: bool) {
        self.is_public = is_public;
        self.updated_at = Utc::now();
    }

    pub fn set_max_participants(&mut self, max_participants: i32) {
        self.max_participants = max_participants;
        self.updated_at = Utc::now();
    }

    pub fn set_persistent(&mut self, is_persistent: bool) {
        self.is_persistent = is_persistent;
        self.updated_at = Utc::now();
    }

    pub fn set_settings(&mut self, settings: Map<String, Value>) {
        self.settings = settings;
        self.updated_at = Utc::now();
    }
}

/// Partial update of a room's mutable fields
///
/// `description: Some(None)` clears the description; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub max_participants: Option<i32>,
    pub is_persistent: Option<bool>,
    pub settings: Option<Value>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_public.is_none()
            && self.max_participants.is_none()
            && self.is_persistent.is_none()
            && self.settings.is_none()
    }

    /// Validate every present field, then apply them all.
    ///
    /// Nothing is written when any field is invalid.
    pub fn apply(self, room: &mut Room) -> Result<(), DomainError> {
        let name = self.name.as_deref().map(RoomLimits::name).transpose()?;
        let description = self
            .description
            .as_ref()
            .map(|d| RoomLimits::description(d.as_deref()))
            .transpose()?;
        let max_participants = self
            .max_participants
            .map(RoomLimits::max_participants)
            .transpose()?;
        let settings = self.settings.map(RoomLimits::settings).transpose()?;

        if let Some(name) = name {
            room.set_name(name);
        }
        if let Some(description) = description {
            room.set_description(description);
        }
        if let Some(is_public) = self.is_public {
            room.set_visibility(is_public);
        }
        if let Some(max) = max_participants {
            room.set_max_participants(max);
        }
        if let Some(is_persistent) = self.is_persistent {
            room.set_persistent(is_persistent);
        }
        if let Some(settings) = settings {
            room.set_settings(settings);
        }
        Ok(())
    }
}

/// Room together with its live participant count
#[derive(Debug, Clone, PartialEq)]
pub struct RoomWithCount {
    pub room: Room,
    pub participant_count: i64,
}
