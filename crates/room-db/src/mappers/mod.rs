//! Entity to model mappers
//!
//! Conversions between domain entities (room-core) and database models.
//! - `From<Model> for Entity`: rows that always map cleanly
//! - `TryFrom<Model> for Entity`: rows carrying an enum stored as text

mod invite_token;
mod participant;
mod room;
mod user;

pub use room::settings_json;
