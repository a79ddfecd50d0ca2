//! PostgreSQL implementation of ParticipantRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use room_core::entities::{Participant, ParticipantWithUser};
use room_core::error::DomainError;
use room_core::traits::{ParticipantRepository, RepoResult};
use room_core::value_objects::{ParticipantId, ParticipantRole, RoomId, TokenId, UserId};

use crate::models::{ParticipantModel, ParticipantWithUserModel};

use super::error::{map_db_error, map_unique_violation, participant_not_found};

const PARTICIPANT_COLUMNS: &str =
    "p.id, p.room_id, p.user_id, p.role::text AS role, p.joined_at, p.last_seen, p.guest_token_id";

/// PostgreSQL implementation of ParticipantRepository
#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    /// Create a new PgParticipantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ParticipantId) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM room_participants p WHERE p.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Participant::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_room_and_user(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM room_participants p \
             WHERE p.room_id = $1 AND p.user_id = $2"
        ))
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Participant::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_with_users(&self, room_id: RoomId) -> RepoResult<Vec<ParticipantWithUser>> {
        let results = sqlx::query_as::<_, ParticipantWithUserModel>(&format!(
            r"
            SELECT {PARTICIPANT_COLUMNS},
                   u.name AS user_name, u.email AS user_email, u.avatar_url AS user_avatar_url
            FROM room_participants p
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.room_id = $1
            ORDER BY p.joined_at DESC, p.id DESC
            "
        ))
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(ParticipantWithUser::try_from)
            .collect()
    }

    #[instrument(skip(self, participant), fields(participant_id = %participant.id, role = %participant.role))]
    async fn create(&self, participant: &Participant) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO room_participants (id, room_id, user_id, role, joined_at, last_seen, guest_token_id)
            VALUES ($1, $2, $3, $4::participant_role, $5, $6, $7)
            ",
        )
        .bind(participant.id.into_inner())
        .bind(participant.room_id.into_inner())
        .bind(participant.user_id.map(UserId::into_inner))
        .bind(participant.role.as_str())
        .bind(participant.joined_at)
        .bind(participant.last_seen)
        .bind(participant.guest_token_id.map(TokenId::into_inner))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateMembership))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM room_participants
            WHERE room_id = $1 AND user_id = $2 AND role <> 'owner'
            ",
        )
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn update_role(&self, id: ParticipantId, role: ParticipantRole) -> RepoResult<()> {
        // The role guard keeps owner and guest rows fixed even under races
        let result = sqlx::query(
            r"
            UPDATE room_participants
            SET role = $2::participant_role
            WHERE id = $1 AND role IN ('member', 'moderator')
            ",
        )
        .bind(id.into_inner())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(participant_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: ParticipantId, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE room_participants
            SET last_seen = GREATEST(last_seen, $2)
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(participant_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_by_room(&self, room_id: RoomId) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM room_participants WHERE room_id = $1
            ",
        )
        .bind(room_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
