//! User entity - an account known to the identity provider

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// User entity, mirrored from the identity provider's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: UserId, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style display name
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Builder-style avatar
    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    /// Name to show in participant lists (falls back to the email local part)
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    /// Apply a profile sync from the identity provider.
    ///
    /// Returns `true` when anything changed.
    pub fn sync_profile(
        &mut self,
        email: &str,
        name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> bool {
        let changed = self.email != email
            || self.name.as_deref() != name
            || self.avatar_url.as_deref() != avatar_url;

        if changed {
            self.email = email.to_string();
            self.name = name.map(str::to_string);
            self.avatar_url = avatar_url.map(str::to_string);
            self.updated_at = Utc::now();
        }
        changed
    }
}
