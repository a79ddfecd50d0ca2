//! User service
//!
//! Mirrors identity-provider profiles into the user table.

use room_core::entities::User;
use room_core::error::DomainError;
use room_core::policy;
use room_core::value_objects::UserId;
use tracing::{debug, info, instrument};

use crate::dto::UserResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::Session;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
    session: &'a Session,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext, session: &'a Session) -> Self {
        Self { ctx, session }
    }

    /// Create the caller's user row on first login, or refresh email, name
    /// and avatar from the identity afterwards
    #[instrument(skip(self))]
    pub async fn sync_profile(&self) -> ServiceResult<UserResponse> {
        let identity = self.session.require_identity()?;

        let user = match self.ctx.user_repo().find_by_id(identity.id).await? {
            Some(mut user) => {
                let changed = user.sync_profile(
                    &identity.email,
                    identity.name.as_deref(),
                    identity.avatar_url.as_deref(),
                );
                if changed {
                    let user = self.ctx.user_repo().upsert(&user).await?;
                    info!(user_id = %user.id, "User profile updated");
                    user
                } else {
                    debug!(user_id = %user.id, "User profile unchanged");
                    user
                }
            }
            None => {
                let user = Self::from_identity(self.session)?;
                let user = self.ctx.user_repo().upsert(&user).await?;
                info!(user_id = %user.id, "User created");
                user
            }
        };

        Ok(UserResponse::from(&user))
    }

    /// The caller's user row, created from the identity if it does not exist yet
    #[instrument(skip(self))]
    pub async fn ensure_profile(&self) -> ServiceResult<User> {
        let user_id = self.session.require_user_id()?;
        if let Some(user) = self.ctx.user_repo().find_by_id(user_id).await? {
            return Ok(user);
        }

        let user = Self::from_identity(self.session)?;
        let user = self.ctx.user_repo().upsert(&user).await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Get a user record. Callers may only read their own.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let caller = self.session.require_user_id()?;
        if !policy::can_access_user(caller, user_id) {
            return Err(DomainError::AccessDenied(
                "users may only read their own profile".to_string(),
            )
            .into());
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(UserResponse::from(&user))
    }

    /// Get the caller's own profile
    pub async fn current_user(&self) -> ServiceResult<UserResponse> {
        let caller = self.session.require_user_id()?;
        self.get_user(caller).await
    }

    fn from_identity(session: &Session) -> Result<User, DomainError> {
        let identity = session.require_identity()?;
        Ok(User::new(identity.id, identity.email.clone())
            .with_name(identity.name.clone())
            .with_avatar_url(identity.avatar_url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InviteSettings, ServiceError};
    use room_common::Identity;
    use room_db::MemoryStore;
    use std::sync::Arc;

    fn ctx() -> ServiceContext {
        ServiceContext::in_memory(Arc::new(MemoryStore::new()), InviteSettings::default())
    }

    #[tokio::test]
    async fn test_sync_creates_then_updates() {
        let ctx = ctx();
        let identity = Identity::new(UserId::generate(), "ana@corp.com").with_name("Ana");
        let session = Session::authenticated(identity.clone());

        let created = UserService::new(&ctx, &session).sync_profile().await.unwrap();
        assert_eq!(created.display_name, "Ana");

        let renamed = Session::authenticated(identity.with_name("Ana Lima"));
        let updated = UserService::new(&ctx, &renamed).sync_profile().await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name.as_deref(), Some("Ana Lima"));
    }

    #[tokio::test]
    async fn test_users_read_only_themselves() {
        let ctx = ctx();
        let session = Session::authenticated(Identity::new(UserId::generate(), "a@corp.com"));
        let service = UserService::new(&ctx, &session);
        service.sync_profile().await.unwrap();

        assert!(service.current_user().await.is_ok());
        let err = service.get_user(UserId::generate()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_sync_requires_identity() {
        let ctx = ctx();
        let session = Session::anonymous();
        let err = UserService::new(&ctx, &session).sync_profile().await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotAuthenticated)));
    }
}
