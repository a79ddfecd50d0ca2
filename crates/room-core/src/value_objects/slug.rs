//! Room slug generation
//!
//! A slug is derived deterministically from the room name:
//! lower-cased, every run of characters outside `[a-z0-9]` collapsed to a
//! single `-`, leading/trailing dashes trimmed. Names that leave nothing
//! behind fall back to `room`. Collisions are resolved by appending `-2`,
//! `-3`, ... to the base.
//!
//! These functions only compute candidates. Uniqueness is decided by the
//! store's unique constraint; callers retry with a fresh candidate when the
//! insert reports a conflict.

use std::collections::HashSet;

/// Base used when a name contains no usable characters
pub const FALLBACK_SLUG: &str = "room";

/// Compute the collision-free base slug for a room name
pub fn slug_base(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Candidate number `n` for a base; `n <= 1` is the bare base
pub fn slug_candidate(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// First candidate for `base` that does not appear in `taken`
pub fn next_available_slug<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    let taken: HashSet<&str> = taken.iter().map(AsRef::as_ref).collect();
    (1..)
        .map(|n| slug_candidate(base, n))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// Check whether a string is a well-formed slug (`[a-z0-9]` runs joined by single dashes)
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
