//! Identity provider access tokens
//!
//! The OAuth provider signs HS256 access tokens whose subject is the user's
//! UUID. Profile fields ride along in `user_metadata`. Verification checks the
//! signature, expiry and audience; the provider already restricted sign-in to
//! the company domain, so the email is taken as given.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use room_core::UserId;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Profile fields the provider attaches to its tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Claims of a provider access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderClaims {
    /// Subject (user UUID)
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl ProviderClaims {
    /// Claims for a user, valid for `ttl` from now
    #[must_use]
    pub fn new(user_id: UserId, email: &str, audience: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            aud: audience.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            email: Some(email.to_string()),
            user_metadata: UserMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: UserMetadata) -> Self {
        self.user_metadata = metadata;
        self
    }

    /// Get the subject as a user id
    ///
    /// # Errors
    /// Returns an error if the subject is not a UUID
    pub fn user_id(&self) -> Result<UserId, AppError> {
        UserId::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// A verified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
            avatar_url: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl TryFrom<ProviderClaims> for Identity {
    type Error = AppError;

    fn try_from(claims: ProviderClaims) -> Result<Self, Self::Error> {
        let id = claims.user_id()?;
        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(AppError::InvalidToken)?;
        let UserMetadata {
            full_name,
            name,
            avatar_url,
        } = claims.user_metadata;

        Ok(Self {
            id,
            email,
            name: full_name.or(name).filter(|n| !n.trim().is_empty()),
            avatar_url: avatar_url.filter(|a| !a.trim().is_empty()),
        })
    }
}

/// Verifies provider tokens and turns them into identities
#[derive(Clone)]
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: String,
}

impl IdentityVerifier {
    /// Create a verifier for the given shared secret and audience
    #[must_use]
    pub fn new(secret: &str, audience: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, &config.jwt_audience)
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns `TokenExpired` for expired tokens and `InvalidToken` for
    /// anything else that fails validation
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);

        let token_data =
            decode::<ProviderClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Identity::try_from(token_data.claims)
    }

    /// Verify an `Authorization` header value
    ///
    /// # Errors
    /// Returns `MissingAuth` when the header is not a bearer credential
    pub fn verify_bearer(&self, header: &str) -> Result<Identity, AppError> {
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingAuth)?;
        self.verify(token)
    }

    /// Sign claims with the shared secret (local tooling and tests)
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn sign(&self, claims: &ProviderClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
