//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Methods documented as atomic must commit
//! all of their writes or none of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{InviteToken, Participant, ParticipantWithUser, Room, RoomWithCount, User};
use crate::error::DomainError;
use crate::value_objects::{ParticipantId, ParticipantRole, RoomId, TokenHash, TokenId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find every user whose email is in `emails` (lower-cased)
    async fn find_by_emails(&self, emails: &[String]) -> RepoResult<Vec<User>>;

    /// Insert the user, or update email/name/avatar if the id exists
    async fn upsert(&self, user: &User) -> RepoResult<User>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>>;

    /// Find room by slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Room>>;

    /// Slugs currently in use that equal `base` or look like `base-<n>`
    async fn taken_slugs(&self, base: &str) -> RepoResult<Vec<String>>;

    /// Insert a room and its owner participant row (atomic).
    ///
    /// Fails with `SlugTaken` when the slug is already in use.
    async fn create_with_owner(&self, room: &Room, owner: &Participant) -> RepoResult<()>;

    /// Rooms owned by a user with live participant counts, newest first
    async fn find_by_owner_with_counts(&self, owner_id: UserId) -> RepoResult<Vec<RoomWithCount>>;

    /// Public rooms plus rooms the user participates in, newest first
    async fn find_accessible(&self, user_id: UserId) -> RepoResult<Vec<Room>>;

    /// Update mutable room fields (owner and slug are never written)
    async fn update(&self, room: &Room) -> RepoResult<()>;

    /// Delete the room with its participants and tokens (atomic).
    ///
    /// Returns `false` when the room did not exist.
    async fn delete(&self, id: RoomId) -> RepoResult<bool>;
}

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find participant by ID
    async fn find_by_id(&self, id: ParticipantId) -> RepoResult<Option<Participant>>;

    /// Find the participant row of a user in a room
    async fn find_by_room_and_user(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>>;

    /// List participants with user profile fields, newest-joined first
    async fn list_with_users(&self, room_id: RoomId) -> RepoResult<Vec<ParticipantWithUser>>;

    /// Insert a participant. Fails with `DuplicateMembership` if (room, user) exists.
    async fn create(&self, participant: &Participant) -> RepoResult<()>;

    /// Delete a non-owner participant row of a user.
    ///
    /// Returns `false` when no such row existed.
    async fn delete_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool>;

    /// Set the role of a participant
    async fn update_role(&self, id: ParticipantId, role: ParticipantRole) -> RepoResult<()>;

    /// Record activity
    async fn touch(&self, id: ParticipantId, at: DateTime<Utc>) -> RepoResult<()>;

    /// Count participants in a room
    async fn count_by_room(&self, room_id: RoomId) -> RepoResult<i64>;
}

// ============================================================================
// Invite Token Repository
// ============================================================================

/// Outcome of a successful redemption
#[derive(Debug, Clone)]
pub struct Redemption {
    /// Token state after the use was counted
    pub token: InviteToken,
    /// Guest participant created for this use
    pub participant: Participant,
}

#[async_trait]
pub trait InviteTokenRepository: Send + Sync {
    /// Insert a new token
    async fn create(&self, token: &InviteToken) -> RepoResult<()>;

    /// Find token by ID
    async fn find_by_id(&self, id: TokenId) -> RepoResult<Option<InviteToken>>;

    /// List tokens of a room, newest first
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<InviteToken>>;

    /// Consume one use of the token with this hash and admit a guest (atomic).
    ///
    /// The use is counted only if the token is active, unexpired at `now`
    /// and not exhausted; concurrent callers never push `current_uses` past
    /// `max_uses`. Returns `None` when the token is unknown or unusable.
    async fn redeem(&self, hash: &TokenHash, now: DateTime<Utc>) -> RepoResult<Option<Redemption>>;

    /// Mark a token inactive. Returns `false` if it was already inactive or missing.
    async fn deactivate(&self, id: TokenId) -> RepoResult<bool>;

    /// Deactivate every active token that is expired at `now` or exhausted
    async fn sweep(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
