//! Database models - SQLx-compatible structs for PostgreSQL tables

mod invite_token;
mod participant;
mod room;
mod user;

pub use invite_token::InviteTokenModel;
pub use participant::{ParticipantModel, ParticipantWithUserModel};
pub use room::{RoomModel, RoomWithCountModel};
pub use user::UserModel;
