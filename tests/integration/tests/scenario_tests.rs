//! Service-level scenarios
//!
//! Each test drives the public services over a fresh in-memory store.
//!
//! Run with: cargo test -p integration-tests --test scenario_tests

use chrono::{Duration, Utc};
use integration_tests::{assert_kind, fixtures::*, is_slug, TestApp};
use room_core::{ErrorKind, InviteToken, ParticipantRole, TokenSecret};
use room_service::dto::{
    AddParticipantRequest, CreateRoomRequest, InviteByEmailRequest, RedeemTokenRequest, UpdateRoleRequest,
    UpdateRoomRequest,
};
use room_service::{InviteService, ParticipantService, RoomService, Session};

fn redeem(secret: &str) -> RedeemTokenRequest {
    RedeemTokenRequest {
        token: secret.to_string(),
    }
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_colliding_names_get_distinct_slugs() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let rooms = RoomService::new(&app.ctx, &owner);

    let first = rooms
        .create_room(CreateRoomRequest::new("My Awesome Room!"))
        .await
        .unwrap();
    let second = rooms
        .create_room(CreateRoomRequest::new("My Awesome Room!"))
        .await
        .unwrap();

    assert!(first.slug.starts_with("my-awesome-room"));
    assert!(second.slug.starts_with("my-awesome-room"));
    assert_ne!(first.slug, second.slug);
    assert!(is_slug(&first.slug) && is_slug(&second.slug));
    assert_eq!(first.path, format!("/rooms/{}", first.slug));

    let standup = rooms
        .create_room(CreateRoomRequest::new("Daily Standup 2024"))
        .await
        .unwrap();
    assert_eq!(standup.slug, "daily-standup-2024");

    let symbols = rooms
        .create_room(CreateRoomRequest::new("!!!@@@###"))
        .await
        .unwrap();
    assert_eq!(symbols.slug, "room");

    assert_kind(
        rooms.create_room(CreateRoomRequest::new("")).await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_non_owner_update_leaves_room_unchanged() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let moderator = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    app.add_member(&owner, &room, &moderator, ParticipantRole::Moderator)
        .await
        .unwrap();

    assert_kind(
        RoomService::new(&app.ctx, &moderator)
            .update_room(
                room.id,
                UpdateRoomRequest {
                    name: Some("Taken Over".to_string()),
                    is_public: Some(true),
                    ..Default::default()
                },
            )
            .await,
        ErrorKind::Unauthorized,
    );

    let current = RoomService::new(&app.ctx, &owner)
        .get_room(room.id)
        .await
        .unwrap();
    assert_eq!(current.name, room.name);
    assert!(!current.is_public);
    assert_eq!(current.updated_at, room.updated_at);
}

#[tokio::test]
async fn test_private_rooms_visible_only_to_participants() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let stranger = app.sign_in().await.unwrap();
    let member = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    app.add_member(&owner, &room, &member, ParticipantRole::Member)
        .await
        .unwrap();

    assert_kind(
        RoomService::new(&app.ctx, &stranger)
            .get_room_by_slug(&room.slug)
            .await,
        ErrorKind::NotFound,
    );
    assert!(RoomService::new(&app.ctx, &stranger)
        .list_accessible_rooms()
        .await
        .unwrap()
        .is_empty());

    let seen = RoomService::new(&app.ctx, &member)
        .get_room_by_slug(&room.slug)
        .await
        .unwrap();
    assert_eq!(seen.id, room.id);

    RoomService::new(&app.ctx, &owner)
        .update_room(
            room.id,
            UpdateRoomRequest {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = RoomService::new(&app.ctx, &stranger)
        .list_accessible_rooms()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, room.id);
}

#[tokio::test]
async fn test_delete_room_removes_all_rows() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let member = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    app.add_member(&owner, &room, &member, ParticipantRole::Member)
        .await
        .unwrap();

    let invites = InviteService::new(&app.ctx, &owner);
    let issued = invites
        .issue_token(room.id, token_request(5))
        .await
        .unwrap();
    invites.redeem_token(redeem(&issued.secret)).await.unwrap();
    invites
        .issue_token(room.id, token_request(1))
        .await
        .unwrap();
    assert_eq!(app.row_counts(), (2, 1, 3, 2));

    RoomService::new(&app.ctx, &owner)
        .delete_room(room.id)
        .await
        .unwrap();

    assert_eq!(app.row_counts(), (2, 0, 0, 0));
    assert_kind(
        RoomService::new(&app.ctx, &owner)
            .get_room_by_slug(&room.slug)
            .await,
        ErrorKind::NotFound,
    );
}

// ============================================================================
// Participants
// ============================================================================

#[tokio::test]
async fn test_role_updates_follow_transition_rules() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let member = app.sign_in().await.unwrap();
    let moderator = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    let target = app
        .add_member(&owner, &room, &member, ParticipantRole::Member)
        .await
        .unwrap();
    app.add_member(&owner, &room, &moderator, ParticipantRole::Moderator)
        .await
        .unwrap();

    let as_owner = ParticipantService::new(&app.ctx, &owner);
    for role in [ParticipantRole::Owner, ParticipantRole::Guest] {
        assert_kind(
            as_owner
                .update_participant_role(
                    room.id,
                    UpdateRoleRequest {
                        participant_id: target.id,
                        role,
                    },
                )
                .await,
            ErrorKind::InvalidRoleTransition,
        );
    }

    assert_kind(
        ParticipantService::new(&app.ctx, &moderator)
            .update_participant_role(
                room.id,
                UpdateRoleRequest {
                    participant_id: target.id,
                    role: ParticipantRole::Moderator,
                },
            )
            .await,
        ErrorKind::Unauthorized,
    );

    let promoted = as_owner
        .update_participant_role(
            room.id,
            UpdateRoleRequest {
                participant_id: target.id,
                role: ParticipantRole::Moderator,
            },
        )
        .await
        .unwrap();
    assert_eq!(promoted.role, ParticipantRole::Moderator);

    let toggled = as_owner
        .toggle_participant_role(room.id, target.id)
        .await
        .unwrap();
    assert_eq!(toggled.role, ParticipantRole::Member);

    // The owner row cannot be re-roled, not even by its owner
    let owner_row = as_owner
        .list_participants(room.id)
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.role == ParticipantRole::Owner)
        .unwrap();
    assert_kind(
        as_owner.toggle_participant_role(room.id, owner_row.id).await,
        ErrorKind::InvalidRoleTransition,
    );
}

#[tokio::test]
async fn test_membership_removal_rules() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let member = app.sign_in().await.unwrap();
    let other = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    app.add_member(&owner, &room, &member, ParticipantRole::Member)
        .await
        .unwrap();
    app.add_member(&owner, &room, &other, ParticipantRole::Member)
        .await
        .unwrap();

    assert_kind(
        ParticipantService::new(&app.ctx, &owner)
            .add_participant(
                room.id,
                AddParticipantRequest {
                    user_id: member.user_id().unwrap(),
                    role: ParticipantRole::Moderator,
                },
            )
            .await,
        ErrorKind::DuplicateMembership,
    );

    let as_member = ParticipantService::new(&app.ctx, &member);
    assert_kind(
        as_member
            .remove_participant(room.id, other.user_id().unwrap())
            .await,
        ErrorKind::Unauthorized,
    );
    assert_kind(
        ParticipantService::new(&app.ctx, &owner)
            .remove_participant(room.id, owner.user_id().unwrap())
            .await,
        ErrorKind::InvalidRoleTransition,
    );

    assert!(as_member
        .remove_participant(room.id, member.user_id().unwrap())
        .await
        .unwrap());
    assert_kind(
        RoomService::new(&app.ctx, &member).get_room(room.id).await,
        ErrorKind::NotFound,
    );

    let remaining = ParticipantService::new(&app.ctx, &owner)
        .list_participants(room.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn test_invite_by_email_reports_each_address() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let colleague = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();

    let colleague_email = colleague.identity().unwrap().email.clone();
    let owner_email = owner.identity().unwrap().email.clone();
    let report = ParticipantService::new(&app.ctx, &owner)
        .invite_by_email(
            room.id,
            InviteByEmailRequest {
                emails: format!("{colleague_email}, {owner_email}\nnobody@corp.example, not-an-email"),
                role: ParticipantRole::Member,
            },
        )
        .await
        .unwrap();

    assert_eq!(report.added, vec![colleague_email]);
    assert_eq!(report.already_members, vec![owner_email]);
    assert_eq!(report.unknown, vec!["nobody@corp.example".to_string()]);
    assert_eq!(report.invalid, vec!["not-an-email".to_string()]);
}

// ============================================================================
// Invite tokens
// ============================================================================

#[tokio::test]
async fn test_single_use_token_admits_one_guest() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    let issued = InviteService::new(&app.ctx, &owner)
        .issue_token(room.id, token_request(1))
        .await
        .unwrap();

    let anonymous = Session::anonymous();
    let guest_service = InviteService::new(&app.ctx, &anonymous);
    let admitted = guest_service
        .redeem_token(redeem(&issued.secret))
        .await
        .unwrap();
    assert_eq!(admitted.participant.role, ParticipantRole::Guest);
    assert_eq!(admitted.participant.user_id, None);
    assert_eq!(admitted.room.id, room.id);

    assert_kind(
        guest_service.redeem_token(redeem(&issued.secret)).await,
        ErrorKind::TokenInvalid,
    );

    let tokens = InviteService::new(&app.ctx, &owner)
        .list_tokens(room.id)
        .await
        .unwrap();
    assert_eq!(tokens[0].current_uses, 1);
    assert_eq!(tokens[0].remaining_uses, 0);

    // The secret never appears in listings
    let listed = serde_json::to_string(&tokens).unwrap();
    assert!(!listed.contains(&issued.secret));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redemptions_respect_max_uses() {
    const MAX_USES: i32 = 3;
    const ATTEMPTS: usize = 16;

    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    let issued = InviteService::new(&app.ctx, &owner)
        .issue_token(room.id, token_request(MAX_USES))
        .await
        .unwrap();

    let handles: Vec<_> = (0..ATTEMPTS)
        .map(|_| {
            let ctx = app.ctx.clone();
            let secret = issued.secret.clone();
            tokio::spawn(async move {
                let session = Session::anonymous();
                InviteService::new(&ctx, &session)
                    .redeem_token(redeem(&secret))
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::TokenInvalid),
        }
    }
    assert_eq!(admitted, MAX_USES);

    let rooms = RoomService::new(&app.ctx, &owner)
        .get_rooms_for_owner()
        .await
        .unwrap();
    assert_eq!(rooms[0].participant_count, 1 + i64::from(MAX_USES));
}

#[tokio::test]
async fn test_expired_tokens_rejected_and_swept_once() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();

    let secret = TokenSecret::generate();
    let mut stale = InviteToken::new(
        room.id,
        owner.user_id().unwrap(),
        "Old link".to_string(),
        secret.hash(),
        10,
        Duration::hours(1),
    );
    stale.expires_at = Utc::now() - Duration::minutes(5);
    app.ctx.token_repo().create(&stale).await.unwrap();

    let invites = InviteService::new(&app.ctx, &owner);
    let live = invites
        .issue_token(room.id, token_request(10))
        .await
        .unwrap();

    assert_kind(
        invites.redeem_token(redeem(secret.expose())).await,
        ErrorKind::TokenInvalid,
    );

    assert_eq!(invites.sweep_expired_tokens().await.unwrap().deactivated, 1);
    assert_eq!(invites.sweep_expired_tokens().await.unwrap().deactivated, 0);

    // Sweeping leaves live tokens untouched
    invites.redeem_token(redeem(&live.secret)).await.unwrap();
}

#[tokio::test]
async fn test_only_owner_manages_tokens() {
    let app = TestApp::new();
    let owner = app.sign_in().await.unwrap();
    let moderator = app.sign_in().await.unwrap();
    let room = app.create_room(&owner).await.unwrap();
    app.add_member(&owner, &room, &moderator, ParticipantRole::Moderator)
        .await
        .unwrap();

    let as_moderator = InviteService::new(&app.ctx, &moderator);
    assert_kind(
        as_moderator.issue_token(room.id, token_request(1)).await,
        ErrorKind::Unauthorized,
    );
    assert_kind(as_moderator.list_tokens(room.id).await, ErrorKind::Unauthorized);

    let other_room = app.create_room(&owner).await.unwrap();
    let foreign = InviteService::new(&app.ctx, &owner)
        .issue_token(other_room.id, token_request(1))
        .await
        .unwrap();
    assert_kind(
        InviteService::new(&app.ctx, &owner)
            .revoke_token(room.id, foreign.token.id)
            .await,
        ErrorKind::NotFound,
    );
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_bearer_sessions() {
    let verifier = test_verifier();
    let identity = unique_identity();

    let header = format!("Bearer {}", signed_token(&identity).unwrap());
    let session = Session::from_authorization(&verifier, Some(&header)).unwrap();
    assert_eq!(session.user_id(), Some(identity.id));
    assert_eq!(session.identity().unwrap().name, identity.name);

    assert!(!Session::from_authorization(&verifier, None)
        .unwrap()
        .is_authenticated());
    assert!(Session::from_authorization(&verifier, Some("Bearer garbage")).is_err());

    let app = TestApp::new();
    assert_kind(
        RoomService::new(&app.ctx, &Session::anonymous())
            .create_room(unique_room())
            .await,
        ErrorKind::NotAuthenticated,
    );
}
