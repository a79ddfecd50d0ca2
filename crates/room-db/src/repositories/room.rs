//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use room_core::entities::{Participant, Room, RoomWithCount};
use room_core::error::DomainError;
use room_core::traits::{RepoResult, RoomRepository};
use room_core::value_objects::{RoomId, UserId};

use crate::mappers::settings_json;
use crate::models::{RoomModel, RoomWithCountModel};

use super::error::{map_db_error, map_unique_violation, room_not_found, violated_constraint};

const ROOM_COLUMNS: &str = "r.id, r.owner_id, r.name, r.description, r.slug, r.is_public, \
     r.max_participants, r.is_persistent, r.settings, r.created_at, r.updated_at";

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r WHERE r.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r WHERE r.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn taken_slugs(&self, base: &str) -> RepoResult<Vec<String>> {
        // Bases only contain [a-z0-9-], so they carry no LIKE wildcards
        let slugs = sqlx::query_scalar::<_, String>(
            r"
            SELECT slug FROM rooms
            WHERE slug = $1 OR slug LIKE $2
            ",
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(slugs)
    }

    #[instrument(skip(self, room, owner), fields(room_id = %room.id, slug = %room.slug))]
    async fn create_with_owner(&self, room: &Room, owner: &Participant) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO rooms (id, owner_id, name, description, slug, is_public,
                               max_participants, is_persistent, settings, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(room.id.into_inner())
        .bind(room.owner_id.into_inner())
        .bind(&room.name)
        .bind(&room.description)
        .bind(&room.slug)
        .bind(room.is_public)
        .bind(room.max_participants)
        .bind(room.is_persistent)
        .bind(settings_json(room))
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let on_slug = violated_constraint(&e).is_some_and(|c| c.contains("slug"));
            map_unique_violation(e, || {
                if on_slug {
                    DomainError::SlugTaken(room.slug.clone())
                } else {
                    DomainError::DatabaseError("duplicate room id".to_string())
                }
            })
        })?;

        sqlx::query(
            r"
            INSERT INTO room_participants (id, room_id, user_id, role, joined_at, last_seen)
            VALUES ($1, $2, $3, 'owner', $4, $5)
            ",
        )
        .bind(owner.id.into_inner())
        .bind(room.id.into_inner())
        .bind(owner.user_id.map(UserId::into_inner))
        .bind(owner.joined_at)
        .bind(owner.last_seen)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!("Room and owner row inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_owner_with_counts(&self, owner_id: UserId) -> RepoResult<Vec<RoomWithCount>> {
        let results = sqlx::query_as::<_, RoomWithCountModel>(&format!(
            r"
            SELECT {ROOM_COLUMNS}, COUNT(p.id) AS participant_count
            FROM rooms r
            LEFT JOIN room_participants p ON p.room_id = r.id
            WHERE r.owner_id = $1
            GROUP BY r.id
            ORDER BY r.created_at DESC, r.id DESC
            "
        ))
        .bind(owner_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RoomWithCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_accessible(&self, user_id: UserId) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(&format!(
            r"
            SELECT {ROOM_COLUMNS}
            FROM rooms r
            WHERE r.is_public
               OR r.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM room_participants p
                   WHERE p.room_id = r.id AND p.user_id = $1
               )
            ORDER BY r.created_at DESC, r.id DESC
            "
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Room::from).collect())
    }

    #[instrument(skip(self, room), fields(room_id = %room.id))]
    async fn update(&self, room: &Room) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE rooms
            SET name = $2, description = $3, is_public = $4, max_participants = $5,
                is_persistent = $6, settings = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.is_public)
        .bind(room.max_participants)
        .bind(room.is_persistent)
        .bind(settings_json(room))
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(room_not_found(room.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RoomId) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let participants = sqlx::query("DELETE FROM room_participants WHERE room_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let tokens = sqlx::query("DELETE FROM guest_tokens WHERE room_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let room = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if room.rows_affected() == 0 {
            // Nothing to delete; discard the (empty) child deletes
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(
            participants = participants.rows_affected(),
            tokens = tokens.rows_affected(),
            "Room deleted with dependents"
        );
        Ok(true)
    }
}
