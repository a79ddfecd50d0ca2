//! Access policy
//!
//! Pure decisions over already-loaded rows. Services evaluate these before
//! every read or mutation; the Postgres migration carries the equivalent
//! row-level security policies for other clients of the same database.
//!
//! | Resource     | Read                                    | Write        |
//! |--------------|-----------------------------------------|--------------|
//! | User         | self                                    | self         |
//! | Room         | owner, any caller if public, participant | owner        |
//! | Participants | owner, participants of the room         | owner        |
//! | Invite token | owner                                   | owner        |

use crate::entities::Room;
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Users may only see and edit their own record
#[inline]
pub fn can_access_user(caller: UserId, target: UserId) -> bool {
    caller == target
}

/// Whether `caller` may see the room at all
pub fn can_read_room(room: &Room, caller: Option<UserId>, is_participant: bool) -> bool {
    match caller {
        Some(user_id) if room.is_owner(user_id) => true,
        Some(_) if room.is_public => true,
        _ => is_participant,
    }
}

/// Only the owner may edit or delete a room, manage its participants
/// or manage its invite tokens
#[inline]
pub fn can_manage_room(room: &Room, caller: UserId) -> bool {
    room.is_owner(caller)
}

/// Participant lists are visible to the owner and to members of the room
pub fn can_list_participants(room: &Room, caller: UserId, is_participant: bool) -> bool {
    room.is_owner(caller) || is_participant
}

/// Fail with `NotRoomOwner` unless `caller` owns the room
pub fn ensure_owner(room: &Room, caller: UserId) -> Result<(), DomainError> {
    if can_manage_room(room, caller) {
        Ok(())
    } else {
        Err(DomainError::NotRoomOwner)
    }
}

/// Fail with not-found when the room is hidden from `caller`, so private
/// rooms are indistinguishable from missing ones
pub fn ensure_readable(
    room: &Room,
    caller: Option<UserId>,
    is_participant: bool,
) -> Result<(), DomainError> {
    if can_read_room(room, caller, is_participant) {
        Ok(())
    } else {
        Err(DomainError::RoomNotFound(room.id))
    }
}
