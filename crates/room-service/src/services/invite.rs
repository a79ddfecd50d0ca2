//! Invite service
//!
//! Issues, redeems, lists, revokes and sweeps guest invite tokens. Only the
//! SHA-256 hash of a token's secret is stored; the plaintext is returned once
//! from `issue_token`.

use chrono::Utc;
use room_core::entities::{InviteToken, TokenLimits};
use room_core::error::DomainError;
use room_core::value_objects::{RoomId, TokenId, TokenSecret};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    IssueTokenRequest, IssuedTokenResponse, ParticipantResponse, RedeemTokenRequest,
    RedemptionResponse, RoomResponse, SweepResponse, TokenResponse,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::Session;

/// Invite service
pub struct InviteService<'a> {
    ctx: &'a ServiceContext,
    session: &'a Session,
}

impl<'a> InviteService<'a> {
    /// Create a new InviteService
    pub fn new(ctx: &'a ServiceContext, session: &'a Session) -> Self {
        Self { ctx, session }
    }

    /// Create a guest link for a room (owner only)
    #[instrument(skip(self, request))]
    pub async fn issue_token(
        &self,
        room_id: RoomId,
        request: IssueTokenRequest,
    ) -> ServiceResult<IssuedTokenResponse> {
        let caller = self.session.require_user_id()?;
        let room = AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;
        request.validate()?;

        let settings = self.ctx.invite_settings();
        let label = TokenLimits::label(request.label.as_deref())?;
        let max_uses = TokenLimits::max_uses(request.max_uses)?;
        let ttl = TokenLimits::ttl(request.ttl(settings.default_ttl)?, settings.max_ttl)?;

        let secret = TokenSecret::generate();
        let token = InviteToken::new(room.id, caller, label, secret.hash(), max_uses, ttl);
        self.ctx.token_repo().create(&token).await?;

        info!(
            token_id = %token.id,
            room_id = %room.id,
            max_uses,
            expires_at = %token.expires_at,
            "Invite token issued"
        );

        Ok(IssuedTokenResponse {
            token: TokenResponse::from(&token),
            secret: secret.into_plaintext(),
        })
    }

    /// Exchange a link secret for a guest seat. Needs no identity.
    ///
    /// Unknown, revoked, expired and used-up tokens all fail the same way.
    #[instrument(skip(self, request))]
    pub async fn redeem_token(
        &self,
        request: RedeemTokenRequest,
    ) -> ServiceResult<RedemptionResponse> {
        let secret = TokenSecret::from_plaintext(request.token);
        if secret.expose().trim().is_empty() {
            return Err(DomainError::TokenInvalid.into());
        }

        let Some(redemption) = self.ctx.token_repo().redeem(&secret.hash(), Utc::now()).await?
        else {
            warn!("Rejected invite token redemption");
            return Err(DomainError::TokenInvalid.into());
        };

        let room_id = redemption.token.room_id;
        let room = self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        info!(
            token_id = %redemption.token.id,
            room_id = %room_id,
            participant_id = %redemption.participant.id,
            uses = redemption.token.current_uses,
            "Invite token redeemed"
        );

        Ok(RedemptionResponse {
            participant: ParticipantResponse::from(redemption.participant),
            room: RoomResponse::from(room),
        })
    }

    /// Tokens of a room, newest first (owner only)
    #[instrument(skip(self))]
    pub async fn list_tokens(&self, room_id: RoomId) -> ServiceResult<Vec<TokenResponse>> {
        let caller = self.session.require_user_id()?;
        AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;

        let tokens = self.ctx.token_repo().find_by_room(room_id).await?;
        Ok(tokens.iter().map(TokenResponse::from).collect())
    }

    /// Deactivate a token (owner only). Returns `false` if it already was.
    #[instrument(skip(self))]
    pub async fn revoke_token(&self, room_id: RoomId, token_id: TokenId) -> ServiceResult<bool> {
        let caller = self.session.require_user_id()?;
        AccessService::new(self.ctx)
            .owned_room(room_id, caller)
            .await?;

        self.ctx
            .token_repo()
            .find_by_id(token_id)
            .await?
            .filter(|t| t.room_id == room_id)
            .ok_or(DomainError::TokenNotFound(token_id))?;

        let revoked = self.ctx.token_repo().deactivate(token_id).await?;
        if revoked {
            info!(token_id = %token_id, room_id = %room_id, "Invite token revoked");
        }
        Ok(revoked)
    }

    /// Deactivate every expired or used-up token. Safe to run repeatedly.
    #[instrument(skip(self))]
    pub async fn sweep_expired_tokens(&self) -> ServiceResult<SweepResponse> {
        let now = Utc::now();
        let deactivated = self.ctx.token_repo().sweep(now).await?;

        info!(deactivated, "Token sweep finished");
        Ok(SweepResponse {
            deactivated,
            swept_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CreateRoomRequest;
    use crate::services::{InviteSettings, RoomService};
    use room_common::Identity;
    use room_core::value_objects::{ParticipantRole, UserId};
    use room_core::ErrorKind;
    use room_db::MemoryStore;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        ctx: ServiceContext,
        owner: Session,
        room_id: RoomId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContext::in_memory(store.clone(), InviteSettings::default());
        let owner = Session::authenticated(Identity::new(UserId::generate(), "owner@corp.com"));
        let room = RoomService::new(&ctx, &owner)
            .create_room(CreateRoomRequest::new("Guest Room"))
            .await
            .unwrap();
        Fixture {
            store,
            ctx,
            owner,
            room_id: room.id,
        }
    }

    fn redeem(secret: &str) -> RedeemTokenRequest {
        RedeemTokenRequest {
            token: secret.to_string(),
        }
    }

    #[tokio::test]
    async fn test_issue_stores_only_hash() {
        let f = fixture().await;
        let issued = InviteService::new(&f.ctx, &f.owner)
            .issue_token(f.room_id, IssueTokenRequest::default())
            .await
            .unwrap();

        assert_eq!(issued.token.label, "Invite link");
        assert_eq!(issued.token.max_uses, 10);

        let stored = f.store.tokens_for_room(f.room_id);
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].token_hash.as_str(), issued.secret);
        assert_eq!(stored[0].token_hash, TokenSecret::from_plaintext(issued.secret).hash());
    }

    #[tokio::test]
    async fn test_single_use_token() {
        let f = fixture().await;
        let issued = InviteService::new(&f.ctx, &f.owner)
            .issue_token(
                f.room_id,
                IssueTokenRequest {
                    max_uses: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let guest = Session::anonymous();
        let service = InviteService::new(&f.ctx, &guest);
        let first = service.redeem_token(redeem(&issued.secret)).await.unwrap();
        assert_eq!(first.participant.role, ParticipantRole::Guest);
        assert_eq!(first.room.id, f.room_id);

        let err = service.redeem_token(redeem(&issued.secret)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);

        let err = service.redeem_token(redeem("not-a-token")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_limits() {
        let f = fixture().await;
        let service = InviteService::new(&f.ctx, &f.owner);

        for request in [
            IssueTokenRequest {
                max_uses: 0,
                ..Default::default()
            },
            IssueTokenRequest {
                ttl_secs: Some(0),
                ..Default::default()
            },
            IssueTokenRequest {
                ttl_secs: Some(31 * 24 * 3600),
                ..Default::default()
            },
            IssueTokenRequest {
                ttl_secs: Some(i64::MAX),
                ..Default::default()
            },
            IssueTokenRequest {
                ttl_secs: Some(i64::MIN),
                ..Default::default()
            },
        ] {
            let err = service.issue_token(f.room_id, request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_tokens_are_owner_only() {
        let f = fixture().await;
        let stranger = Session::authenticated(Identity::new(UserId::generate(), "x@corp.com"));

        let err = InviteService::new(&f.ctx, &stranger)
            .issue_token(f.room_id, IssueTokenRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = InviteService::new(&f.ctx, &Session::anonymous())
            .list_tokens(f.room_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_revoke_then_redeem_fails() {
        let f = fixture().await;
        let service = InviteService::new(&f.ctx, &f.owner);
        let issued = service
            .issue_token(f.room_id, IssueTokenRequest::default())
            .await
            .unwrap();

        assert!(service.revoke_token(f.room_id, issued.token.id).await.unwrap());
        assert!(!service.revoke_token(f.room_id, issued.token.id).await.unwrap());

        let err = service.redeem_token(redeem(&issued.secret)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);

        let listed = service.list_tokens(f.room_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].is_active);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let f = fixture().await;
        let service = InviteService::new(&f.ctx, &f.owner);
        let issued = service
            .issue_token(
                f.room_id,
                IssueTokenRequest {
                    max_uses: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service.redeem_token(redeem(&issued.secret)).await.unwrap();

        assert_eq!(service.sweep_expired_tokens().await.unwrap().deactivated, 1);
        assert_eq!(service.sweep_expired_tokens().await.unwrap().deactivated, 0);
    }
}
