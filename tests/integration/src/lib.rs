//! Integration test utilities for the room service
//!
//! This crate provides helpers for running end-to-end scenarios through the
//! service layer against the in-memory store.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
