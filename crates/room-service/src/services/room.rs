//! Room service
//!
//! Handles room creation, lookup, settings and deletion.

use room_core::entities::{Participant, Room, RoomLimits, RoomPatch};
use room_core::error::DomainError;
use room_core::value_objects::{next_available_slug, slug_base, RoomId};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateRoomRequest, RoomResponse, RoomWithCountResponse, UpdateRoomRequest};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::Session;
use super::user::UserService;

/// How many slug candidates `create_room` tries before giving up
const SLUG_ATTEMPTS: u32 = 8;

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
    session: &'a Session,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext, session: &'a Session) -> Self {
        Self { ctx, session }
    }

    /// Create a room owned by the caller.
    ///
    /// The slug is derived from the name; when a concurrent insert claims the
    /// same candidate the next free one is computed and the insert retried.
    #[instrument(skip(self, request))]
    pub async fn create_room(&self, request: CreateRoomRequest) -> ServiceResult<RoomResponse> {
        let owner = UserService::new(self.ctx, self.session)
            .ensure_profile()
            .await?;
        request.validate()?;

        let name = RoomLimits::name(&request.name)?;
        let description = RoomLimits::description(request.description.as_deref())?;
        let base = slug_base(&name);

        for attempt in 1..=SLUG_ATTEMPTS {
            let taken = self.ctx.room_repo().taken_slugs(&base).await?;
            let slug = next_available_slug(&base, &taken);

            let room = Room::new(RoomId::generate(), owner.id, name.clone(), slug)
                .with_description(description.clone());
            let owner_row = Participant::owner(room.id, owner.id);

            match self.ctx.room_repo().create_with_owner(&room, &owner_row).await {
                Ok(()) => {
                    info!(room_id = %room.id, slug = %room.slug, owner_id = %owner.id, "Room created");
                    return Ok(RoomResponse::from(&room));
                }
                Err(DomainError::SlugTaken(slug)) => {
                    warn!(attempt, slug = %slug, "Slug claimed concurrently, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::internal(format!(
            "no free slug for '{base}' after {SLUG_ATTEMPTS} attempts"
        )))
    }

    /// Rooms owned by the caller with live participant counts, newest first
    #[instrument(skip(self))]
    pub async fn get_rooms_for_owner(&self) -> ServiceResult<Vec<RoomWithCountResponse>> {
        let owner_id = self.session.require_user_id()?;
        let rooms = self
            .ctx
            .room_repo()
            .find_by_owner_with_counts(owner_id)
            .await?;

        Ok(rooms.into_iter().map(RoomWithCountResponse::from).collect())
    }

    /// Public rooms plus every room the caller participates in, newest first
    #[instrument(skip(self))]
    pub async fn list_accessible_rooms(&self) -> ServiceResult<Vec<RoomResponse>> {
        let user_id = self.session.require_user_id()?;
        let rooms = self.ctx.room_repo().find_accessible(user_id).await?;

        Ok(rooms.iter().map(RoomResponse::from).collect())
    }

    /// Look a room up by slug. Rooms the caller may not read are not found.
    #[instrument(skip(self))]
    pub async fn get_room_by_slug(&self, slug: &str) -> ServiceResult<RoomResponse> {
        let access = AccessService::new(self.ctx)
            .readable_room_by_slug(slug, self.session.user_id())
            .await?;

        Ok(RoomResponse::from(access.room))
    }

    /// Look a room up by id. Rooms the caller may not read are not found.
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: RoomId) -> ServiceResult<RoomResponse> {
        let access = AccessService::new(self.ctx)
            .readable_room(room_id, self.session.user_id())
            .await?;

        Ok(RoomResponse::from(access.room))
    }

    /// Whether the caller owns the room
    #[instrument(skip(self))]
    pub async fn is_room_owner(&self, room_id: RoomId) -> ServiceResult<bool> {
        let caller = self.session.user_id();
        let access = AccessService::new(self.ctx)
            .readable_room(room_id, caller)
            .await?;

        Ok(caller.is_some_and(|id| access.room.is_owner(id)))
    }

    /// Update room settings (owner only). The slug never changes.
    #[instrument(skip(self, request))]
    pub async fn update_room(
        &self,
        room_id: RoomId,
        request: UpdateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let caller = self.session.require_user_id()?;
        let mut room = AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;
        request.validate()?;

        let patch = RoomPatch::from(request);
        if patch.is_empty() {
            return Ok(RoomResponse::from(room));
        }

        patch.apply(&mut room)?;
        self.ctx.room_repo().update(&room).await?;

        info!(room_id = %room_id, "Room updated");
        Ok(RoomResponse::from(room))
    }

    /// Delete a room with all participants and tokens (owner only)
    #[instrument(skip(self))]
    pub async fn delete_room(&self, room_id: RoomId) -> ServiceResult<()> {
        let caller = self.session.require_user_id()?;
        AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;

        if !self.ctx.room_repo().delete(room_id).await? {
            return Err(DomainError::RoomNotFound(room_id).into());
        }

        info!(room_id = %room_id, owner_id = %caller, "Room deleted");
        Ok(())
    }
}
