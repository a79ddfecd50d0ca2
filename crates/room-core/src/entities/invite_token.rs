//! Invite token entity - a hashed, use- and time-limited guest pass

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::value_objects::{RoomId, TokenHash, TokenId, UserId};

/// Bounds on token fields
pub struct TokenLimits;

impl TokenLimits {
    pub const LABEL_MAX: usize = 100;
    pub const DEFAULT_LABEL: &'static str = "Invite link";
    pub const MAX_USES_MIN: i32 = 1;
    pub const MAX_USES_MAX: i32 = 1000;

    /// Longest lifetime a token may be issued with
    pub fn max_ttl() -> Duration {
        InviteExpiry::ThirtyDays.duration()
    }

    /// Trim a label; blank falls back to the default
    pub fn label(label: Option<&str>) -> Result<String, DomainError> {
        let label = label.map(str::trim).filter(|l| !l.is_empty());
        match label {
            None => Ok(Self::DEFAULT_LABEL.to_string()),
            Some(l) if l.chars().count() <= Self::LABEL_MAX => Ok(l.to_string()),
            Some(_) => Err(DomainError::ValidationError(format!(
                "label must be at most {} characters",
                Self::LABEL_MAX
            ))),
        }
    }

    pub fn max_uses(max_uses: i32) -> Result<i32, DomainError> {
        if (Self::MAX_USES_MIN..=Self::MAX_USES_MAX).contains(&max_uses) {
            Ok(max_uses)
        } else {
            Err(DomainError::ValidationError(format!(
                "max uses must be between {} and {}",
                Self::MAX_USES_MIN,
                Self::MAX_USES_MAX
            )))
        }
    }

    /// TTL must be positive and no longer than `ceiling`
    pub fn ttl(ttl: Duration, ceiling: Duration) -> Result<Duration, DomainError> {
        if ttl <= Duration::zero() {
            return Err(DomainError::ValidationError(
                "token lifetime must be positive".to_string(),
            ));
        }
        if ttl > ceiling {
            return Err(DomainError::ValidationError(format!(
                "token lifetime must be at most {} hours",
                ceiling.num_hours()
            )));
        }
        Ok(ttl)
    }
}

/// Expiry presets offered when issuing a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InviteExpiry {
    OneHour,
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
}

impl InviteExpiry {
    pub fn duration(self) -> Duration {
        match self {
            Self::OneHour => Duration::hours(1),
            Self::OneDay => Duration::hours(24),
            Self::SevenDays => Duration::days(7),
            Self::ThirtyDays => Duration::days(30),
        }
    }

    /// Parse the short form used in forms and CLIs (`1h`, `24h`, `7d`, `30d`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1h" => Some(Self::OneHour),
            "24h" | "1d" => Some(Self::OneDay),
            "7d" => Some(Self::SevenDays),
            "30d" => Some(Self::ThirtyDays),
            _ => None,
        }
    }
}

/// Invite token entity. Holds the hash only; the plaintext is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteToken {
    pub id: TokenId,
    pub room_id: RoomId,
    pub created_by: UserId,
    pub label: String,
    pub token_hash: TokenHash,
    pub max_uses: i32,
    pub current_uses: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl InviteToken {
    /// Create a fresh, unused token expiring `ttl` from now
    pub fn new(
        room_id: RoomId,
        created_by: UserId,
        label: String,
        token_hash: TokenHash,
        max_uses: i32,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TokenId::generate(),
            room_id,
            created_by,
            label,
            token_hash,
            max_uses,
            current_uses: 0,
            expires_at: now + ttl,
            is_active: true,
            created_at: now,
        }
    }

    /// Expired once `now` reaches `expires_at`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current_uses >= self.max_uses
    }

    /// Whether a redemption at `now` would be accepted
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now) && !self.is_exhausted()
    }

    /// Whether the sweep should deactivate this token
    pub fn should_sweep_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && (self.is_expired_at(now) || self.is_exhausted())
    }

    pub fn remaining_uses(&self) -> i32 {
        (self.max_uses - self.current_uses).max(0)
    }

    /// Consume one use. Fails without side effects when not redeemable.
    pub fn redeem_at(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_redeemable_at(now) {
            return Err(DomainError::TokenInvalid);
        }
        self.current_uses += 1;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
