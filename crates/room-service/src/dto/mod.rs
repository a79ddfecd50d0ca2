//! Data transfer objects for service requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for caller input
//! - Response DTOs for serializing service output
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddParticipantRequest, CreateRoomRequest, InviteByEmailRequest, IssueTokenRequest,
    RedeemTokenRequest, UpdateRoleRequest, UpdateRoomRequest,
};

pub use responses::{
    InviteReport, IssuedTokenResponse, ParticipantResponse, RedemptionResponse, RoomResponse,
    RoomWithCountResponse, SweepResponse, TokenResponse, UserResponse,
};
