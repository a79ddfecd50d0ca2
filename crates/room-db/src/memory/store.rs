//! In-memory implementation of every repository trait
//!
//! All tables live behind one lock, so each trait method runs as a single
//! critical section and multi-row operations (room + owner insert, cascade
//! delete, redeem + guest insert) are atomic exactly like their Postgres
//! transactions. Unique and foreign-key constraints of the migration are
//! checked here as well.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::instrument;

use room_core::entities::{
    InviteToken, Participant, ParticipantWithUser, Room, RoomWithCount, User,
};
use room_core::error::DomainError;
use room_core::traits::{
    InviteTokenRepository, ParticipantRepository, Redemption, RepoResult, RoomRepository,
    UserRepository,
};
use room_core::value_objects::{
    ParticipantId, ParticipantRole, RoomId, TokenHash, TokenId, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    rooms: HashMap<RoomId, Room>,
    participants: HashMap<ParticipantId, Participant>,
    tokens: HashMap<TokenId, InviteToken>,
}

fn fk_violation(what: &str) -> DomainError {
    DomainError::DatabaseError(format!("foreign key violation: {what}"))
}

impl Tables {
    fn email_taken_by_other(&self, email: &str, id: UserId) -> bool {
        self.users
            .values()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
    }

    fn membership_exists(&self, room_id: RoomId, user_id: UserId) -> bool {
        self.participants
            .values()
            .any(|p| p.room_id == room_id && p.is_user(user_id))
    }

    fn insert_participant(&mut self, participant: &Participant) -> RepoResult<()> {
        if !self.rooms.contains_key(&participant.room_id) {
            return Err(fk_violation("room_participants.room_id"));
        }
        if let Some(user_id) = participant.user_id {
            if !self.users.contains_key(&user_id) {
                return Err(fk_violation("room_participants.user_id"));
            }
            if self.membership_exists(participant.room_id, user_id) {
                return Err(DomainError::DuplicateMembership);
            }
        }
        if let Some(token_id) = participant.guest_token_id {
            if !self.tokens.contains_key(&token_id) {
                return Err(fk_violation("room_participants.guest_token_id"));
            }
        }
        self.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    fn participant_count(&self, room_id: RoomId) -> i64 {
        self.participants
            .values()
            .filter(|p| p.room_id == room_id)
            .count() as i64
    }
}

/// Newest first; ties broken by id so equal timestamps order consistently
fn newest_rooms_first(rooms: &mut [Room]) {
    rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

/// Repository backend holding all rows in process memory
///
/// Intended for tests and local tooling. Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in each table (users, rooms, participants, tokens)
    pub fn row_counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.tables.read();
        (
            tables.users.len(),
            tables.rooms.len(),
            tables.participants.len(),
            tables.tokens.len(),
        )
    }

    /// Tokens of a room regardless of caller, for assertions in tests
    pub fn tokens_for_room(&self, room_id: RoomId) -> Vec<InviteToken> {
        self.tables
            .read()
            .tokens
            .values()
            .filter(|t| t.room_id == room_id)
            .cloned()
            .collect()
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_emails(&self, emails: &[String]) -> RepoResult<Vec<User>> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .values()
            .filter(|u| emails.iter().any(|e| u.email.eq_ignore_ascii_case(e)))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn upsert(&self, user: &User) -> RepoResult<User> {
        let mut tables = self.tables.write();
        if tables.email_taken_by_other(&user.email, user.id) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let stored = match tables.users.get_mut(&user.id) {
            Some(existing) => {
                existing.email.clone_from(&user.email);
                existing.name.clone_from(&user.name);
                existing.avatar_url.clone_from(&user.avatar_url);
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => {
                tables.users.insert(user.id, user.clone());
                user.clone()
            }
        };
        Ok(stored)
    }
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        Ok(self.tables.read().rooms.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Room>> {
        Ok(self
            .tables
            .read()
            .rooms
            .values()
            .find(|r| r.slug == slug)
            .cloned())
    }

    async fn taken_slugs(&self, base: &str) -> RepoResult<Vec<String>> {
        let prefix = format!("{base}-");
        Ok(self
            .tables
            .read()
            .rooms
            .values()
            .filter(|r| r.slug == base || r.slug.starts_with(&prefix))
            .map(|r| r.slug.clone())
            .collect())
    }

    #[instrument(skip(self, room, owner), fields(room_id = %room.id, slug = %room.slug))]
    async fn create_with_owner(&self, room: &Room, owner: &Participant) -> RepoResult<()> {
        let mut tables = self.tables.write();

        if !tables.users.contains_key(&room.owner_id) {
            return Err(fk_violation("rooms.owner_id"));
        }
        if tables.rooms.values().any(|r| r.slug == room.slug) {
            return Err(DomainError::SlugTaken(room.slug.clone()));
        }
        if tables.rooms.contains_key(&room.id) {
            return Err(DomainError::DatabaseError("duplicate room id".to_string()));
        }

        tables.rooms.insert(room.id, room.clone());
        if let Err(e) = tables.insert_participant(owner) {
            // Undo the room insert so the pair stays all-or-nothing
            tables.rooms.remove(&room.id);
            return Err(e);
        }
        Ok(())
    }

    async fn find_by_owner_with_counts(&self, owner_id: UserId) -> RepoResult<Vec<RoomWithCount>> {
        let tables = self.tables.read();
        let mut rooms: Vec<Room> = tables
            .rooms
            .values()
            .filter(|r| r.is_owner(owner_id))
            .cloned()
            .collect();
        newest_rooms_first(&mut rooms);

        Ok(rooms
            .into_iter()
            .map(|room| RoomWithCount {
                participant_count: tables.participant_count(room.id),
                room,
            })
            .collect())
    }

    async fn find_accessible(&self, user_id: UserId) -> RepoResult<Vec<Room>> {
        let tables = self.tables.read();
        let mut rooms: Vec<Room> = tables
            .rooms
            .values()
            .filter(|r| {
                r.is_public || r.is_owner(user_id) || tables.membership_exists(r.id, user_id)
            })
            .cloned()
            .collect();
        newest_rooms_first(&mut rooms);
        Ok(rooms)
    }

    async fn update(&self, room: &Room) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .rooms
            .get_mut(&room.id)
            .ok_or(DomainError::RoomNotFound(room.id))?;

        stored.name.clone_from(&room.name);
        stored.description.clone_from(&room.description);
        stored.is_public = room.is_public;
        stored.max_participants = room.max_participants;
        stored.is_persistent = room.is_persistent;
        stored.settings.clone_from(&room.settings);
        stored.updated_at = room.updated_at;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RoomId) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        if tables.rooms.remove(&id).is_none() {
            return Ok(false);
        }
        tables.participants.retain(|_, p| p.room_id != id);
        tables.tokens.retain(|_, t| t.room_id != id);
        Ok(true)
    }
}

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
impl ParticipantRepository for MemoryStore {
    async fn find_by_id(&self, id: ParticipantId) -> RepoResult<Option<Participant>> {
        Ok(self.tables.read().participants.get(&id).cloned())
    }

    async fn find_by_room_and_user(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>> {
        Ok(self
            .tables
            .read()
            .participants
            .values()
            .find(|p| p.room_id == room_id && p.is_user(user_id))
            .cloned())
    }

    async fn list_with_users(&self, room_id: RoomId) -> RepoResult<Vec<ParticipantWithUser>> {
        let tables = self.tables.read();
        let mut rows: Vec<ParticipantWithUser> = tables
            .participants
            .values()
            .filter(|p| p.room_id == room_id)
            .map(|p| {
                let user = p.user_id.and_then(|id| tables.users.get(&id));
                ParticipantWithUser {
                    participant: p.clone(),
                    name: user.and_then(|u| u.name.clone()),
                    email: user.map(|u| u.email.clone()),
                    avatar_url: user.and_then(|u| u.avatar_url.clone()),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.participant
                .joined_at
                .cmp(&a.participant.joined_at)
                .then_with(|| b.participant.id.cmp(&a.participant.id))
        });
        Ok(rows)
    }

    async fn create(&self, participant: &Participant) -> RepoResult<()> {
        self.tables.write().insert_participant(participant)
    }

    async fn delete_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.participants.len();
        tables
            .participants
            .retain(|_, p| !(p.room_id == room_id && p.is_user(user_id) && !p.is_owner()));
        Ok(tables.participants.len() < before)
    }

    async fn update_role(&self, id: ParticipantId, role: ParticipantRole) -> RepoResult<()> {
        let mut tables = self.tables.write();
        match tables.participants.get_mut(&id) {
            Some(p) if p.role.is_assignable() => {
                p.role = role;
                Ok(())
            }
            _ => Err(DomainError::ParticipantNotFound),
        }
    }

    async fn touch(&self, id: ParticipantId, at: DateTime<Utc>) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let participant = tables
            .participants
            .get_mut(&id)
            .ok_or(DomainError::ParticipantNotFound)?;
        participant.touch(at);
        Ok(())
    }

    async fn count_by_room(&self, room_id: RoomId) -> RepoResult<i64> {
        Ok(self.tables.read().participant_count(room_id))
    }
}

// ============================================================================
// Invite Token Repository
// ============================================================================

#[async_trait]
impl InviteTokenRepository for MemoryStore {
    async fn create(&self, token: &InviteToken) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.rooms.contains_key(&token.room_id) {
            return Err(fk_violation("guest_tokens.room_id"));
        }
        if tables.tokens.values().any(|t| t.token_hash == token.token_hash) {
            return Err(DomainError::InternalError("token hash collision".to_string()));
        }
        tables.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TokenId) -> RepoResult<Option<InviteToken>> {
        Ok(self.tables.read().tokens.get(&id).cloned())
    }

    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<InviteToken>> {
        let mut tokens = self.tokens_for_room(room_id);
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(tokens)
    }

    #[instrument(skip(self, hash))]
    async fn redeem(&self, hash: &TokenHash, now: DateTime<Utc>) -> RepoResult<Option<Redemption>> {
        let mut tables = self.tables.write();

        let Some(token) = tables.tokens.values_mut().find(|t| &t.token_hash == hash) else {
            return Ok(None);
        };
        if token.redeem_at(now).is_err() {
            return Ok(None);
        }
        let token = token.clone();

        let participant = Participant::guest(token.room_id, token.id);
        if let Err(e) = tables.insert_participant(&participant) {
            // Give the use back so the redemption stays all-or-nothing
            if let Some(stored) = tables.tokens.get_mut(&token.id) {
                stored.current_uses -= 1;
            }
            return Err(e);
        }

        Ok(Some(Redemption { token, participant }))
    }

    async fn deactivate(&self, id: TokenId) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        match tables.tokens.get_mut(&id) {
            Some(token) if token.is_active => {
                token.deactivate();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn sweep(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut tables = self.tables.write();
        let mut swept = 0;
        for token in tables.tokens.values_mut().filter(|t| t.should_sweep_at(now)) {
            token.deactivate();
            swept += 1;
        }
        Ok(swept)
    }
}
