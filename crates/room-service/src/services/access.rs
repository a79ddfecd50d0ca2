//! Access service
//!
//! Loads rooms on behalf of a caller and applies the access policy, so every
//! other service sees either a room the caller may use or a typed failure.

use room_core::entities::{Participant, Room};
use room_core::error::DomainError;
use room_core::policy;
use room_core::value_objects::{RoomId, UserId};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A room the caller is allowed to read, with the caller's membership row
#[derive(Debug, Clone)]
pub struct RoomAccess {
    pub room: Room,
    pub membership: Option<Participant>,
}

impl RoomAccess {
    pub fn is_participant(&self) -> bool {
        self.membership.is_some()
    }
}

/// Policy checks backed by the repositories
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    /// Create a new AccessService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a room by id and check that `caller` may read it.
    ///
    /// Hidden rooms are reported exactly like missing ones.
    #[instrument(skip(self))]
    pub async fn readable_room(
        &self,
        room_id: RoomId,
        caller: Option<UserId>,
    ) -> ServiceResult<RoomAccess> {
        let room = self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        let access = self.with_membership(room, caller).await?;
        policy::ensure_readable(&access.room, caller, access.is_participant())?;
        Ok(access)
    }

    /// Load a room by slug and check that `caller` may read it
    #[instrument(skip(self))]
    pub async fn readable_room_by_slug(
        &self,
        slug: &str,
        caller: Option<UserId>,
    ) -> ServiceResult<RoomAccess> {
        let not_found = || DomainError::RoomSlugNotFound(slug.to_string());

        let room = self
            .ctx
            .room_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(not_found)?;

        let access = self.with_membership(room, caller).await?;
        if !policy::can_read_room(&access.room, caller, access.is_participant()) {
            debug!(room_id = %access.room.id, "Room hidden from caller");
            return Err(not_found().into());
        }
        Ok(access)
    }

    /// Load a room the caller must own.
    ///
    /// Fails with not-found when the room is invisible to the caller and
    /// with `NotRoomOwner` when it is visible but owned by someone else.
    #[instrument(skip(self))]
    pub async fn owned_room(&self, room_id: RoomId, caller: UserId) -> ServiceResult<Room> {
        let access = self.readable_room(room_id, Some(caller)).await?;
        policy::ensure_owner(&access.room, caller)?;
        Ok(access.room)
    }

    /// Attach the caller's participant row (if any) to a loaded room
    async fn with_membership(
        &self,
        room: Room,
        caller: Option<UserId>,
    ) -> ServiceResult<RoomAccess> {
        let membership = match caller {
            Some(user_id) => {
                self.ctx
                    .participant_repo()
                    .find_by_room_and_user(room.id, user_id)
                    .await?
            }
            None => None,
        };
        Ok(RoomAccess { room, membership })
    }
}
