//! Participant service
//!
//! Handles room membership: adding users, email invites, removal, role
//! changes, listing and activity.

use chrono::Utc;
use room_core::entities::{Participant, ParticipantWithUser};
use room_core::error::DomainError;
use room_core::policy;
use room_core::value_objects::{parse_email_list, ParticipantId, ParticipantRole, RoomId, UserId};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    AddParticipantRequest, InviteByEmailRequest, InviteReport, ParticipantResponse,
    UpdateRoleRequest,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::Session;

/// Participant service
pub struct ParticipantService<'a> {
    ctx: &'a ServiceContext,
    session: &'a Session,
}

impl<'a> ParticipantService<'a> {
    /// Create a new ParticipantService
    pub fn new(ctx: &'a ServiceContext, session: &'a Session) -> Self {
        Self { ctx, session }
    }

    /// Add a registered user to a room (owner only)
    #[instrument(skip(self, request))]
    pub async fn add_participant(
        &self,
        room_id: RoomId,
        request: AddParticipantRequest,
    ) -> ServiceResult<ParticipantResponse> {
        let caller = self.session.require_user_id()?;
        let room = AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;
        let role = request.role.ensure_assignable()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(request.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.user_id))?;

        let participant = Participant::member(room.id, user.id, role);
        self.ctx.participant_repo().create(&participant).await?;

        info!(room_id = %room.id, user_id = %user.id, role = %role, "Participant added");

        Ok(ParticipantResponse::from(ParticipantWithUser {
            participant,
            name: user.name,
            email: Some(user.email),
            avatar_url: user.avatar_url,
        }))
    }

    /// Add every known address from a pasted list (owner only).
    ///
    /// Nothing is delivered; unknown addresses are only reported.
    #[instrument(skip(self, request))]
    pub async fn invite_by_email(
        &self,
        room_id: RoomId,
        request: InviteByEmailRequest,
    ) -> ServiceResult<InviteReport> {
        let caller = self.session.require_user_id()?;
        let room = AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;
        request.validate()?;
        let role = request.role.ensure_assignable()?;

        let list = parse_email_list(&request.emails);
        if list.valid.is_empty() && list.invalid.is_empty() {
            return Err(
                DomainError::ValidationError("no email addresses given".to_string()).into(),
            );
        }

        let users = self.ctx.user_repo().find_by_emails(&list.valid).await?;
        let mut report = InviteReport {
            invalid: list.invalid,
            ..Default::default()
        };

        for email in list.valid {
            let Some(user) = users.iter().find(|u| u.email.eq_ignore_ascii_case(&email)) else {
                report.unknown.push(email);
                continue;
            };

            match self
                .ctx
                .participant_repo()
                .create(&Participant::member(room.id, user.id, role))
                .await
            {
                Ok(()) => report.added.push(email),
                Err(DomainError::DuplicateMembership) => report.already_members.push(email),
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            room_id = %room.id,
            added = report.added.len(),
            already_members = report.already_members.len(),
            unknown = report.unknown.len(),
            invalid = report.invalid.len(),
            "Email invites processed"
        );
        Ok(report)
    }

    /// Remove a user from a room.
    ///
    /// The owner may remove anyone but themselves; other participants may
    /// only remove themselves. Returns `false` when there was nothing to remove.
    #[instrument(skip(self))]
    pub async fn remove_participant(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> ServiceResult<bool> {
        let caller = self.session.require_user_id()?;
        let access = AccessService::new(self.ctx)
            .readable_room(room_id, Some(caller))
            .await?;

        if caller != user_id {
            policy::ensure_owner(&access.room, caller)?;
        }
        if access.room.is_owner(user_id) {
            return Err(DomainError::CannotRemoveOwner.into());
        }

        let removed = self
            .ctx
            .participant_repo()
            .delete_member(room_id, user_id)
            .await?;

        if removed {
            info!(room_id = %room_id, user_id = %user_id, by = %caller, "Participant removed");
        }
        Ok(removed)
    }

    /// Set a participant's role to `member` or `moderator` (owner only)
    #[instrument(skip(self, request))]
    pub async fn update_participant_role(
        &self,
        room_id: RoomId,
        request: UpdateRoleRequest,
    ) -> ServiceResult<ParticipantResponse> {
        let target = request.role;
        self.change_role(room_id, request.participant_id, |current| {
            current.transition_to(target)
        })
        .await
    }

    /// Flip a participant between `member` and `moderator` (owner only)
    #[instrument(skip(self))]
    pub async fn toggle_participant_role(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
    ) -> ServiceResult<ParticipantResponse> {
        self.change_role(room_id, participant_id, |current| {
            current
                .toggled()
                .ok_or(DomainError::InvalidRoleTransition {
                    from: Some(current),
                    to: current,
                })
        })
        .await
    }

    /// List participants with profile fields, newest-joined first.
    ///
    /// Visible to the owner and to participants of the room.
    #[instrument(skip(self))]
    pub async fn list_participants(
        &self,
        room_id: RoomId,
    ) -> ServiceResult<Vec<ParticipantResponse>> {
        let caller = self.session.require_user_id()?;
        let access = AccessService::new(self.ctx)
            .readable_room(room_id, Some(caller))
            .await?;

        if !policy::can_list_participants(&access.room, caller, access.is_participant()) {
            return Err(DomainError::AccessDenied(
                "only participants may list participants".to_string(),
            )
            .into());
        }

        let participants = self.ctx.participant_repo().list_with_users(room_id).await?;
        Ok(participants.into_iter().map(ParticipantResponse::from).collect())
    }

    /// Record that the caller is active in the room (the "join" action)
    #[instrument(skip(self))]
    pub async fn record_activity(&self, room_id: RoomId) -> ServiceResult<ParticipantResponse> {
        let caller = self.session.require_user_id()?;
        let access = AccessService::new(self.ctx)
            .readable_room(room_id, Some(caller))
            .await?;

        let mut participant = access.membership.ok_or(DomainError::ParticipantNotFound)?;
        let now = Utc::now();
        self.ctx.participant_repo().touch(participant.id, now).await?;
        participant.touch(now);

        Ok(ParticipantResponse::from(participant))
    }

    async fn change_role<F>(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
        next_role: F,
    ) -> ServiceResult<ParticipantResponse>
    where
        F: FnOnce(ParticipantRole) -> Result<ParticipantRole, DomainError>,
    {
        let caller = self.session.require_user_id()?;
        let room = AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;

        let mut participant = self
            .ctx
            .participant_repo()
            .find_by_id(participant_id)
            .await?
            .filter(|p| p.room_id == room.id)
            .ok_or(DomainError::ParticipantNotFound)?;

        if participant.is_user(caller) {
            return Err(DomainError::CannotChangeOwnRole.into());
        }

        let role = next_role(participant.role)?;
        if role != participant.role {
            self.ctx
                .participant_repo()
                .update_role(participant.id, role)
                .await?;
            info!(
                room_id = %room.id,
                participant_id = %participant.id,
                from = %participant.role,
                to = %role,
                "Participant role changed"
            );
            participant.role = role;
        }

        Ok(ParticipantResponse::from(participant))
    }
}
