//! Full club lifecycle
//!
//! Sign-up with a new club, role assignment and its effect on permissions,
//! sign-up through a service invite, log-out, game scheduling with role-based
//! invites, invite responses and teardown of everything created.

#[macro_use]
mod common;

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use clubhouse_client::{
    GameInviteEntry, InviteReply, InviteResponse, LocationKind, NewGame, NewTeam, NewUser, Role,
    RoleAssignment, UserInviteResponse, UserSummary,
};
use common::{access_denied, assert_rejected, NOT_LOGGED_IN};
use reqwest::StatusCode;
use uuid::Uuid;

const OPPONENT: &str = "some-opp";
const LOCATION: &str = "some place with address";

fn throwaway_user() -> NewUser {
    NewUser {
        username: format!("test-delete-pls-{}", Uuid::new_v4()),
        password: "cckwmckwekcrk".to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_full_club_cycle() -> Result<()> {
    let ctx = require_backend!();
    let denied = access_denied(&[Role::ClubAdmin, Role::SuperAdmin]);

    let admin_name = ctx.unique("admin-user");
    let regular_name = ctx.unique("regular");
    let invited_name = ctx.unique("invited");

    // === Club admin ===

    let admin_login = ctx.sign_up_club_admin(&admin_name, &admin_name).await?;
    let admin = ctx.client(&admin_login)?;
    let admin_id = admin_login.own_id.clone();

    assert_eq!(admin.list_own_roles().await?, vec![Role::ClubAdmin]);
    assert_eq!(
        admin.list_roles().await?,
        HashMap::from([(admin_id.clone(), vec![Role::ClubAdmin])])
    );

    // === Regular user without roles ===

    let regular_id = admin
        .create_user(&NewUser {
            username: regular_name.clone(),
            password: regular_name.clone(),
        })
        .await?;

    let regular_login = ctx.log_in(&regular_name, &regular_name).await?;
    assert_eq!(regular_login.own_id, regular_id);
    let regular = ctx.client(&regular_login)?;

    assert_eq!(regular.list_own_roles().await?, Vec::<Role>::new());
    assert_rejected(
        regular.create_user(&throwaway_user()).await,
        StatusCode::FORBIDDEN,
        &denied,
    );
    assert_rejected(
        regular.delete_user_by_id("jdjdjjd").await,
        StatusCode::FORBIDDEN,
        &denied,
    );

    let mut users = admin.list_users().await?;
    users.sort_by(|a, b| a.username.cmp(&b.username));
    let mut expected = vec![
        UserSummary {
            id: admin_id.clone(),
            username: admin_name.clone(),
        },
        UserSummary {
            id: regular_id.clone(),
            username: regular_name.clone(),
        },
    ];
    expected.sort_by(|a, b| a.username.cmp(&b.username));
    assert_eq!(users, expected);

    // === Granting and revoking club_admin ===

    let promote = RoleAssignment {
        user_id: regular_id.clone(),
        role: Role::ClubAdmin,
    };
    admin.assign_role(&promote).await?;

    assert_eq!(regular.list_own_roles().await?, vec![Role::ClubAdmin]);
    assert_eq!(
        admin.list_roles().await?,
        HashMap::from([
            (admin_id.clone(), vec![Role::ClubAdmin]),
            (regular_id.clone(), vec![Role::ClubAdmin]),
        ])
    );

    let id = regular.create_user(&throwaway_user()).await?;
    regular.delete_user_by_id(&id).await?;

    admin.unassign_role(&promote).await?;

    assert_eq!(regular.list_own_roles().await?, Vec::<Role>::new());
    let roles = admin.list_roles().await?;
    assert_eq!(roles.get(&admin_id), Some(&vec![Role::ClubAdmin]));
    assert!(roles.get(&regular_id).map_or(true, Vec::is_empty));

    assert_rejected(
        regular.create_user(&throwaway_user()).await,
        StatusCode::FORBIDDEN,
        &denied,
    );
    assert_rejected(
        regular.delete_user_by_id("jdjdjjd").await,
        StatusCode::FORBIDDEN,
        &denied,
    );

    // === Service invite ===

    let service_invite_id = admin.create_service_invite().await?;
    let invited_login = ctx
        .auth
        .sign_up_via_invite(
            &service_invite_id,
            &clubhouse_client::Credentials::new(invited_name.as_str(), regular_name.as_str()),
        )
        .await?;
    let invited = ctx.client(&invited_login)?;

    let listed = invited.list_users().await?;
    tracing::info!(count = listed.len(), "Invited user listed club users");
    assert!(listed.iter().any(|u| u.id == invited_login.own_id));

    // === Log-out ===

    regular.log_out().await?;
    // the server's force-expired cookie leaves the client without a session
    assert_eq!(regular.cookie_header(), None);
    assert_rejected(
        regular.list_users().await,
        StatusCode::UNAUTHORIZED,
        NOT_LOGGED_IN,
    );

    // === Games ===

    for role in [Role::Coach, Role::Player] {
        admin
            .assign_role(&RoleAssignment {
                user_id: regular_id.clone(),
                role,
            })
            .await?;
    }

    let regular = ctx.client(&ctx.log_in(&regular_name, &regular_name).await?)?;
    assert!(regular.list_own_invites().await?.is_empty());

    let team_id = admin
        .create_team(&NewTeam {
            name: ctx.unique("team"),
            slug: ctx.unique("slug"),
        })
        .await?;

    let now = Utc::now();
    let game_id = admin
        .create_game(&NewGame {
            team_id: team_id.clone(),
            opponent: OPPONENT.to_string(),
            start_time: now,
            stop_time: Some(now),
            location: LOCATION.to_string(),
            location_kind: LocationKind::Home,
            invited_roles: vec![Role::Player, Role::Coach],
        })
        .await?;

    let games = admin.list_games_for_team(&team_id).await?;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, game_id);
    assert_eq!(games[0].opponent, OPPONENT);
    assert_eq!(games[0].location, LOCATION);
    assert_eq!(games[0].location_kind, LocationKind::Home);

    // === Game invites ===

    let own_invites = regular.list_own_invites().await?;
    assert_eq!(own_invites.len(), 1);
    assert_eq!(own_invites[0].game_id, game_id);
    assert_eq!(own_invites[0].opponent, OPPONENT);
    assert_eq!(own_invites[0].response, InviteResponse::Pending);
    let invite_id = own_invites[0].invite_id.clone();

    let entry = |response: InviteResponse| GameInviteEntry {
        invite_id: invite_id.clone(),
        user_id: regular_id.clone(),
        username: regular_name.clone(),
        response,
    };

    assert_eq!(
        admin.list_invites_to_game(&game_id).await?,
        vec![entry(InviteResponse::Pending)]
    );

    for response in [
        UserInviteResponse::Unsure,
        UserInviteResponse::Declined,
        UserInviteResponse::Accepted,
    ] {
        regular
            .respond_to_invite(&InviteReply {
                invite_id: invite_id.clone(),
                response,
            })
            .await?;

        assert_eq!(
            admin.list_invites_to_game(&game_id).await?,
            vec![entry(response.into())]
        );
    }

    // === Cleanup ===

    admin.delete_game(&game_id).await?;
    admin.delete_team_by_id(&team_id).await?;
    admin.delete_service_invite_by_id(&service_invite_id).await?;
    invited.delete_own_user().await?;
    admin.delete_user_by_id(&regular_id).await?;
    admin.delete_own_org().await?;

    Ok(())
}
