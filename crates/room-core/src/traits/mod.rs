//! Repository traits (ports)

mod repositories;

pub use repositories::{
    InviteTokenRepository, ParticipantRepository, Redemption, RepoResult, RoomRepository,
    UserRepository,
};
