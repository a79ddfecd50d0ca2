//! # room-core
//!
//! Domain layer containing entities, value objects, the access policy and
//! repository traits. This crate has zero dependencies on infrastructure
//! (database, identity provider, runtime).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    InviteExpiry, InviteToken, Participant, ParticipantWithUser, Room, RoomLimits, RoomPatch,
    RoomWithCount, TokenLimits, User,
};
pub use error::{DomainError, ErrorKind};
pub use traits::{
    InviteTokenRepository, ParticipantRepository, Redemption, RepoResult, RoomRepository,
    UserRepository,
};
pub use value_objects::{
    next_available_slug, parse_email_list, slug_base, slug_candidate, EmailList, IdParseError,
    ParticipantId, ParticipantRole, RoomId, TokenHash, TokenId, TokenSecret, UserId,
};
