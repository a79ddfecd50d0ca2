//! Domain entities - core business objects

mod invite_token;
mod participant;
mod room;
mod user;

pub use invite_token::{InviteExpiry, InviteToken, TokenLimits};
pub use participant::{Participant, ParticipantWithUser};
pub use room::{Room, RoomLimits, RoomPatch, RoomWithCount};
pub use user::User;
