//! # room-service
//!
//! Application layer containing the room, participant, invite and user
//! services, the per-request [`Session`] and the DTOs they exchange.
//!
//! ```rust,ignore
//! use room_service::{RoomService, ServiceContext, Session};
//!
//! let ctx = ServiceContext::postgres(pool, InviteSettings::default());
//! let session = Session::authenticated(identity);
//! let room = RoomService::new(&ctx, &session).create_room(request).await?;
//! ```

pub mod dto;
pub mod services;

pub use services::{
    InviteService, InviteSettings, ParticipantService, RoomService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, Session, UserService,
};
