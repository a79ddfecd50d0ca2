//! Authentication utilities

mod identity;

pub use identity::{Identity, IdentityVerifier, ProviderClaims, UserMetadata};
