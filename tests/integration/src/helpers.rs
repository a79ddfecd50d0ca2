//! Test helpers for integration tests
//!
//! Wires the services over a fresh in-memory store and provides shortcuts
//! for the setup most scenarios share.

use std::sync::Arc;

use anyhow::Result;
use room_core::{ErrorKind, ParticipantRole};
use room_db::MemoryStore;
use room_service::dto::{AddParticipantRequest, ParticipantResponse, RoomResponse};
use room_service::{
    InviteSettings, ParticipantService, RoomService, ServiceContext, ServiceResult, Session,
    UserService,
};

use crate::fixtures::{signed_token, test_verifier, unique_identity, unique_room};

/// Service context over an isolated store
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub ctx: Arc<ServiceContext>,
}

impl TestApp {
    /// Start with an empty store and default invite settings
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let ctx = Arc::new(ServiceContext::in_memory(
            store.clone(),
            InviteSettings::default(),
        ));
        Self { store, ctx }
    }

    /// Sign a new user in through a bearer token and mirror their profile
    pub async fn sign_in(&self) -> Result<Session> {
        let identity = unique_identity();
        let header = format!("Bearer {}", signed_token(&identity)?);
        let session = Session::from_authorization(&test_verifier(), Some(&header))?;
        UserService::new(&self.ctx, &session).sync_profile().await?;
        Ok(session)
    }

    /// Create a uniquely named room owned by `owner`
    pub async fn create_room(&self, owner: &Session) -> Result<RoomResponse> {
        Ok(RoomService::new(&self.ctx, owner)
            .create_room(unique_room())
            .await?)
    }

    /// Add `user` to `room` on behalf of its owner
    pub async fn add_member(
        &self,
        owner: &Session,
        room: &RoomResponse,
        user: &Session,
        role: ParticipantRole,
    ) -> Result<ParticipantResponse> {
        let user_id = user
            .user_id()
            .ok_or_else(|| anyhow::anyhow!("session is anonymous"))?;
        Ok(ParticipantService::new(&self.ctx, owner)
            .add_participant(room.id, AddParticipantRequest { user_id, role })
            .await?)
    }

    /// Rows left behind in (users, rooms, participants, tokens)
    pub fn row_counts(&self) -> (usize, usize, usize, usize) {
        self.store.row_counts()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that a service call failed with the given kind
pub fn assert_kind<T: std::fmt::Debug>(result: ServiceResult<T>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("expected {expected:?}, got Ok({value:?})"),
        Err(e) => assert_eq!(e.kind(), expected, "unexpected error: {e}"),
    }
}

/// Slugs are lowercase alphanumerics separated by single hyphens
pub fn is_slug(value: &str) -> bool {
    room_core::value_objects::is_valid_slug(value)
}
