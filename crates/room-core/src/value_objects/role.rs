//! Participant role - closed set of membership roles
//!
//! Transition rules:
//! - `owner` is assigned once, when the room is created, and never changes
//! - `guest` is assigned only by redeeming an invite token
//! - `member` <-> `moderator` is the only edge, and only the room owner may walk it

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Role of a participant inside a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Owner,
    Moderator,
    #[default]
    Member,
    Guest,
}

impl ParticipantRole {
    /// Database / wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Moderator => "moderator",
            Self::Member => "member",
            Self::Guest => "guest",
        }
    }

    /// Roles the owner may hand out directly (add, invite, role update)
    #[inline]
    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Member | Self::Moderator)
    }

    /// Check that a role can be granted when adding a participant
    pub fn ensure_assignable(self) -> Result<Self, DomainError> {
        if self.is_assignable() {
            Ok(self)
        } else {
            Err(DomainError::InvalidRoleTransition {
                from: None,
                to: self,
            })
        }
    }

    /// Validate a role change from `self` to `target`
    ///
    /// Only `member` and `moderator` may change role, and only into each other.
    /// Setting the role a participant already holds is accepted as a no-op.
    pub fn transition_to(self, target: Self) -> Result<Self, DomainError> {
        if self.is_assignable() && target.is_assignable() {
            Ok(target)
        } else {
            Err(DomainError::InvalidRoleTransition {
                from: Some(self),
                to: target,
            })
        }
    }

    /// The opposite side of the member/moderator toggle
    pub const fn toggled(self) -> Option<Self> {
        match self {
            Self::Member => Some(Self::Moderator),
            Self::Moderator => Some(Self::Member),
            Self::Owner | Self::Guest => None,
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParticipantRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "moderator" => Ok(Self::Moderator),
            "member" => Ok(Self::Member),
            "guest" => Ok(Self::Guest),
            other => Err(DomainError::ValidationError(format!(
                "unknown participant role: {other}"
            ))),
        }
    }
}
