//! PostgreSQL implementation of InviteTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use room_core::entities::{InviteToken, Participant};
use room_core::error::DomainError;
use room_core::traits::{InviteTokenRepository, Redemption, RepoResult};
use room_core::value_objects::{RoomId, TokenHash, TokenId};

use crate::models::InviteTokenModel;

use super::error::{map_db_error, map_unique_violation};

const TOKEN_COLUMNS: &str = "id, room_id, created_by, name, token_hash, max_uses, current_uses, \
     expires_at, is_active, created_at";

/// PostgreSQL implementation of InviteTokenRepository
#[derive(Clone)]
pub struct PgInviteTokenRepository {
    pool: PgPool,
}

impl PgInviteTokenRepository {
    /// Create a new PgInviteTokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteTokenRepository for PgInviteTokenRepository {
    #[instrument(skip(self, token), fields(token_id = %token.id, room_id = %token.room_id))]
    async fn create(&self, token: &InviteToken) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guest_tokens (id, room_id, created_by, name, token_hash, max_uses,
                                      current_uses, expires_at, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(token.id.into_inner())
        .bind(token.room_id.into_inner())
        .bind(token.created_by.into_inner())
        .bind(&token.label)
        .bind(token.token_hash.as_str())
        .bind(token.max_uses)
        .bind(token.current_uses)
        .bind(token.expires_at)
        .bind(token.is_active)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::InternalError("token hash collision".to_string())
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: TokenId) -> RepoResult<Option<InviteToken>> {
        let result = sqlx::query_as::<_, InviteTokenModel>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM guest_tokens WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(InviteToken::from))
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<InviteToken>> {
        let results = sqlx::query_as::<_, InviteTokenModel>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM guest_tokens WHERE room_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(InviteToken::from).collect())
    }

    #[instrument(skip(self, hash))]
    async fn redeem(&self, hash: &TokenHash, now: DateTime<Utc>) -> RepoResult<Option<Redemption>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Conditional increment: the row lock serializes concurrent redeemers,
        // and the predicate is re-checked after the lock is taken
        let claimed = sqlx::query_as::<_, InviteTokenModel>(&format!(
            r"
            UPDATE guest_tokens
            SET current_uses = current_uses + 1
            WHERE token_hash = $1
              AND is_active
              AND expires_at > $2
              AND current_uses < max_uses
            RETURNING {TOKEN_COLUMNS}
            "
        ))
        .bind(hash.as_str())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(model) = claimed else {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(None);
        };

        let token = InviteToken::from(model);
        let participant = Participant::guest(token.room_id, token.id);

        sqlx::query(
            r"
            INSERT INTO room_participants (id, room_id, user_id, role, joined_at, last_seen, guest_token_id)
            VALUES ($1, $2, NULL, 'guest', $3, $4, $5)
            ",
        )
        .bind(participant.id.into_inner())
        .bind(participant.room_id.into_inner())
        .bind(participant.joined_at)
        .bind(participant.last_seen)
        .bind(token.id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(token_id = %token.id, uses = token.current_uses, "Token use recorded");
        Ok(Some(Redemption { token, participant }))
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: TokenId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE guest_tokens SET is_active = FALSE
            WHERE id = $1 AND is_active
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn sweep(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE guest_tokens SET is_active = FALSE
            WHERE is_active
              AND (expires_at <= $1 OR current_uses >= max_uses)
            ",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgInviteTokenRepository>();
    }
}
