//! Value objects - immutable types that represent domain concepts

mod email_list;
mod ids;
mod role;
mod slug;
mod token_secret;

pub use email_list::{parse_email_list, EmailList};
pub use ids::{IdParseError, ParticipantId, RoomId, TokenId, UserId};
pub use role::ParticipantRole;
pub use slug::{is_valid_slug, next_available_slug, slug_base, slug_candidate, FALLBACK_SLUG};
pub use token_secret::{TokenHash, TokenSecret, SECRET_BYTES};
