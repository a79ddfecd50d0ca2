//! Business logic services
//!
//! Every service borrows the shared [`ServiceContext`] and the caller's
//! [`Session`], checks the access policy and then drives the repositories.

pub mod access;
pub mod context;
pub mod error;
pub mod invite;
pub mod participant;
pub mod room;
pub mod session;
pub mod user;

// Re-export all services for convenience
pub use access::{AccessService, RoomAccess};
pub use context::{InviteSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use invite::InviteService;
pub use participant::ParticipantService;
pub use room::RoomService;
pub use session::Session;
pub use user::UserService;
