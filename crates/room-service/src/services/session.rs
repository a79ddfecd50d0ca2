//! Per-request caller identity

use room_common::{AppError, Identity, IdentityVerifier};
use room_core::{DomainError, UserId};

/// Who is calling: a verified identity, or nobody
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Session without a caller (guests redeeming a link)
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Resolve the caller from an optional `Authorization` header.
    ///
    /// A missing header yields an anonymous session; a present but invalid one
    /// is an error.
    pub fn from_authorization(
        verifier: &IdentityVerifier,
        header: Option<&str>,
    ) -> Result<Self, AppError> {
        match header {
            None => Ok(Self::anonymous()),
            Some(value) => verifier.verify_bearer(value).map(Self::authenticated),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|i| i.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The caller's identity, or `NotAuthenticated`
    pub fn require_identity(&self) -> Result<&Identity, DomainError> {
        self.identity.as_ref().ok_or(DomainError::NotAuthenticated)
    }

    pub fn require_user_id(&self) -> Result<UserId, DomainError> {
        self.require_identity().map(|i| i.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use room_common::ProviderClaims;

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(matches!(
            session.require_user_id(),
            Err(DomainError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_from_authorization() {
        let verifier = IdentityVerifier::new("test-secret", "authenticated");
        let user_id = UserId::generate();
        let claims = ProviderClaims::new(user_id, "dev@corp.com", "authenticated", Duration::hours(1));
        let token = verifier.sign(&claims).unwrap();

        let session =
            Session::from_authorization(&verifier, Some(&format!("Bearer {token}"))).unwrap();
        assert_eq!(session.user_id(), Some(user_id));

        let anonymous = Session::from_authorization(&verifier, None).unwrap();
        assert!(!anonymous.is_authenticated());

        assert!(Session::from_authorization(&verifier, Some("Bearer garbage")).is_err());
    }
}
