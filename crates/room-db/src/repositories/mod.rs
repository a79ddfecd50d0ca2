//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in room-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod invite_token;
mod participant;
mod room;
mod user;

pub use invite_token::PgInviteTokenRepository;
pub use participant::PgParticipantRepository;
pub use room::PgRoomRepository;
pub use user::PgUserRepository;
