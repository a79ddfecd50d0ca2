//! Service context - dependency container for services
//!
//! Holds the repositories and invite settings every service needs. It is
//! built explicitly (no globals) and cloned cheaply into request handlers.

use std::sync::Arc;

use chrono::Duration;
use room_common::InviteConfig;
use room_core::traits::{
    InviteTokenRepository, ParticipantRepository, RoomRepository, UserRepository,
};
use room_core::TokenLimits;
use room_db::{
    MemoryStore, PgInviteTokenRepository, PgParticipantRepository, PgPool, PgRoomRepository,
    PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Lifetimes applied when issuing invite tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteSettings {
    /// Used when a request names no lifetime
    pub default_ttl: Duration,
    /// Upper bound for any requested lifetime
    pub max_ttl: Duration,
}

impl Default for InviteSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::days(7),
            max_ttl: TokenLimits::max_ttl(),
        }
    }
}

impl From<&InviteConfig> for InviteSettings {
    fn from(config: &InviteConfig) -> Self {
        Self {
            default_ttl: Duration::seconds(config.default_ttl_secs),
            max_ttl: Duration::seconds(config.max_ttl_secs).min(TokenLimits::max_ttl()),
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    room_repo: Arc<dyn RoomRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    token_repo: Arc<dyn InviteTokenRepository>,

    invite_settings: InviteSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        room_repo: Arc<dyn RoomRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        token_repo: Arc<dyn InviteTokenRepository>,
        invite_settings: InviteSettings,
    ) -> Self {
        Self {
            user_repo,
            room_repo,
            participant_repo,
            token_repo,
            invite_settings,
        }
    }

    /// Context backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, invite_settings: InviteSettings) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgRoomRepository::new(pool.clone())),
            Arc::new(PgParticipantRepository::new(pool.clone())),
            Arc::new(PgInviteTokenRepository::new(pool)),
            invite_settings,
        )
    }

    /// Context where every repository is the same in-memory store
    pub fn in_memory(store: Arc<MemoryStore>, invite_settings: InviteSettings) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            invite_settings,
        )
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the participant repository
    pub fn participant_repo(&self) -> &dyn ParticipantRepository {
        self.participant_repo.as_ref()
    }

    /// Get the invite token repository
    pub fn token_repo(&self) -> &dyn InviteTokenRepository {
        self.token_repo.as_ref()
    }

    // === Settings ===

    pub fn invite_settings(&self) -> &InviteSettings {
        &self.invite_settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("invite_settings", &self.invite_settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    participant_repo: Option<Arc<dyn ParticipantRepository>>,
    token_repo: Option<Arc<dyn InviteTokenRepository>>,
    invite_settings: Option<InviteSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn participant_repo(mut self, repo: Arc<dyn ParticipantRepository>) -> Self {
        self.participant_repo = Some(repo);
        self
    }

    pub fn token_repo(mut self, repo: Arc<dyn InviteTokenRepository>) -> Self {
        self.token_repo = Some(repo);
        self
    }

    pub fn invite_settings(mut self, settings: InviteSettings) -> Self {
        self.invite_settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing or the
    /// invite lifetimes are inconsistent
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let invite_settings = self.invite_settings.unwrap_or_default();
        if invite_settings.default_ttl <= Duration::zero()
            || invite_settings.default_ttl > invite_settings.max_ttl
        {
            return Err(ServiceError::validation(
                "default invite lifetime must be positive and within the maximum",
            ));
        }

        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.participant_repo
                .ok_or_else(|| ServiceError::validation("participant_repo is required"))?,
            self.token_repo
                .ok_or_else(|| ServiceError::validation("token_repo is required"))?,
            invite_settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_repositories() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("user_repo is required"));
    }

    #[test]
    fn test_builder_with_store() {
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContextBuilder::new()
            .user_repo(store.clone())
            .room_repo(store.clone())
            .participant_repo(store.clone())
            .token_repo(store)
            .build()
            .unwrap();
        assert_eq!(ctx.invite_settings().default_ttl, Duration::days(7));
    }

    #[test]
    fn test_builder_rejects_inverted_ttls() {
        let store = Arc::new(MemoryStore::new());
        let err = ServiceContextBuilder::new()
            .user_repo(store.clone())
            .room_repo(store.clone())
            .participant_repo(store.clone())
            .token_repo(store)
            .invite_settings(InviteSettings {
                default_ttl: Duration::days(10),
                max_ttl: Duration::days(1),
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_settings_from_config_are_capped() {
        let config = InviteConfig {
            default_ttl_secs: 3600,
            max_ttl_secs: 90 * 24 * 3600,
        };
        let settings = InviteSettings::from(&config);
        assert_eq!(settings.default_ttl, Duration::hours(1));
        assert_eq!(settings.max_ttl, TokenLimits::max_ttl());
    }
}
