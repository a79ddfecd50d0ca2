//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ParticipantRole, RoomId, TokenId, UserId};

/// Coarse classification of failures, shared by every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAuthenticated,
    Unauthorized,
    NotFound,
    Validation,
    DuplicateMembership,
    InvalidRoleTransition,
    TokenInvalid,
    Conflict,
    Database,
    Timeout,
    Internal,
}

impl ErrorKind {
    /// Infrastructure kinds are never the caller's fault
    pub const fn is_infrastructure(self) -> bool {
        matches!(self, Self::Database | Self::Timeout | Self::Internal)
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Room not found: /{0}")]
    RoomSlugNotFound(String),

    #[error("Participant not found in room")]
    ParticipantNotFound,

    #[error("Invite token not found: {0}")]
    TokenNotFound(TokenId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not room owner")]
    NotRoomOwner,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User is already a participant of this room")]
    DuplicateMembership,

    #[error("Slug already taken: {0}")]
    SlugTaken(String),

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Invalid role transition to {to}")]
    InvalidRoleTransition {
        from: Option<ParticipantRole>,
        to: ParticipantRole,
    },

    #[error("Cannot remove the room owner")]
    CannotRemoveOwner,

    #[error("Cannot change your own role")]
    CannotChangeOwnRole,

    #[error("Invite token is invalid, expired or exhausted")]
    TokenInvalid,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) | Self::RoomSlugNotFound(_) => "UNKNOWN_ROOM",
            Self::ParticipantNotFound => "UNKNOWN_PARTICIPANT",
            Self::TokenNotFound(_) => "UNKNOWN_TOKEN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail(_) => "INVALID_EMAIL",

            // Authorization
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NotRoomOwner => "NOT_ROOM_OWNER",
            Self::AccessDenied(_) => "ACCESS_DENIED",

            // Conflict
            Self::DuplicateMembership => "DUPLICATE_MEMBERSHIP",
            Self::SlugTaken(_) => "SLUG_TAKEN",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Business Rules
            Self::InvalidRoleTransition { .. } => "INVALID_ROLE_TRANSITION",
            Self::CannotRemoveOwner => "CANNOT_REMOVE_OWNER",
            Self::CannotChangeOwnRole => "CANNOT_CHANGE_OWN_ROLE",
            Self::TokenInvalid => "TOKEN_INVALID",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Map onto the shared error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_)
            | Self::RoomNotFound(_)
            | Self::RoomSlugNotFound(_)
            | Self::ParticipantNotFound
            | Self::TokenNotFound(_) => ErrorKind::NotFound,

            Self::ValidationError(_) | Self::InvalidEmail(_) => ErrorKind::Validation,

            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::NotRoomOwner | Self::AccessDenied(_) => ErrorKind::Unauthorized,

            Self::DuplicateMembership => ErrorKind::DuplicateMembership,
            Self::SlugTaken(_) | Self::EmailAlreadyExists => ErrorKind::Conflict,

            Self::InvalidRoleTransition { .. }
            | Self::CannotRemoveOwner
            | Self::CannotChangeOwnRole => ErrorKind::InvalidRoleTransition,
            Self::TokenInvalid => ErrorKind::TokenInvalid,

            Self::DatabaseError(_) => ErrorKind::Database,
            Self::Timeout => ErrorKind::Timeout,
            Self::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Unauthorized | ErrorKind::NotAuthenticated
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::DuplicateMembership
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::RoomNotFound(RoomId::generate());
        assert_eq!(err.code(), "UNKNOWN_ROOM");

        let err = DomainError::RoomSlugNotFound("standup".to_string());
        assert_eq!(err.code(), "UNKNOWN_ROOM");

        assert_eq!(DomainError::TokenInvalid.code(), "TOKEN_INVALID");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DomainError::NotRoomOwner.kind(), ErrorKind::Unauthorized);
        assert_eq!(DomainError::NotAuthenticated.kind(), ErrorKind::NotAuthenticated);
        assert_eq!(
            DomainError::DuplicateMembership.kind(),
            ErrorKind::DuplicateMembership
        );
        assert_eq!(
            DomainError::CannotRemoveOwner.kind(),
            ErrorKind::InvalidRoleTransition
        );
        assert!(DomainError::Timeout.kind().is_infrastructure());
        assert!(!DomainError::TokenInvalid.kind().is_infrastructure());
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::UserNotFound(UserId::generate()).is_not_found());
        assert!(DomainError::ParticipantNotFound.is_not_found());
        assert!(!DomainError::DuplicateMembership.is_not_found());
    }

    #[test]
    fn test_is_authorization() {
        assert!(DomainError::NotRoomOwner.is_authorization());
        assert!(DomainError::NotAuthenticated.is_authorization());
        assert!(!DomainError::ParticipantNotFound.is_authorization());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidRoleTransition {
            from: Some(ParticipantRole::Member),
            to: ParticipantRole::Owner,
        };
        assert_eq!(err.to_string(), "Invalid role transition to owner");

        let err = DomainError::RoomSlugNotFound("daily-standup".to_string());
        assert_eq!(err.to_string(), "Room not found: /daily-standup");
    }
}
