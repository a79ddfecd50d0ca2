//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;
use room_common::{Identity, IdentityVerifier, ProviderClaims, UserMetadata};
use room_core::UserId;
use room_service::dto::{CreateRoomRequest, IssueTokenRequest};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Secret and audience shared by `test_verifier` and `signed_token`
pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_JWT_AUDIENCE: &str = "authenticated";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Identity of a fresh company user
pub fn unique_identity() -> Identity {
    let suffix = unique_suffix();
    Identity::new(UserId::generate(), format!("user{suffix}@corp.example"))
        .with_name(format!("Test User {suffix}"))
}

/// Room creation request with a unique name
pub fn unique_room() -> CreateRoomRequest {
    CreateRoomRequest::new(format!("Test Room {}", unique_suffix()))
        .with_description("A test room")
}

/// Guest link allowing `max_uses` redemptions
pub fn token_request(max_uses: i32) -> IssueTokenRequest {
    IssueTokenRequest {
        label: Some(format!("Link {}", unique_suffix())),
        max_uses,
        ..Default::default()
    }
}

/// Verifier matching the tokens produced by `signed_token`
pub fn test_verifier() -> IdentityVerifier {
    IdentityVerifier::new(TEST_JWT_SECRET, TEST_JWT_AUDIENCE)
}

/// Provider access token for `identity`, valid for an hour
pub fn signed_token(identity: &Identity) -> anyhow::Result<String> {
    let claims = ProviderClaims::new(
        identity.id,
        &identity.email,
        TEST_JWT_AUDIENCE,
        Duration::hours(1),
    )
    .with_metadata(UserMetadata {
        full_name: identity.name.clone(),
        ..Default::default()
    });
    Ok(test_verifier().sign(&claims)?)
}
