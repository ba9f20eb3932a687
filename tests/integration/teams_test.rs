//! Team CRUD as a club admin and the permission check for plain users

#[macro_use]
mod common;

use anyhow::Result;
use clubhouse_client::{NewTeam, NewUser, Role, TeamUpdate};
use common::{access_denied, assert_rejected};
use reqwest::StatusCode;

#[test_log::test(tokio::test)]
async fn test_team_crud_and_permissions() -> Result<()> {
    let ctx = require_backend!();

    let admin_name = ctx.unique("admin");
    let admin_login = ctx
        .sign_up_club_admin(&admin_name, &ctx.unique("admin-pass"))
        .await?;
    let admin = ctx.client(&admin_login)?;

    // create
    let team_name = ctx.unique("team");
    let team_slug = ctx.unique("slug");
    let team_id = admin
        .create_team(&NewTeam {
            name: team_name.clone(),
            slug: team_slug.clone(),
        })
        .await?;

    // list
    let teams = admin.list_teams().await?;
    assert!(
        teams
            .iter()
            .any(|t| t.id == team_id && t.name == team_name && t.slug == team_slug),
        "created team missing from {:?}",
        teams
    );

    // get
    let team = admin.get_team(&team_id).await?;
    assert_eq!(team.id, team_id);
    assert_eq!(team.name, team_name);
    assert_eq!(team.slug, team_slug);

    // update
    let new_name = format!("{}-updated", team_name);
    let new_slug = format!("{}-updated", team_slug);
    let updated = admin
        .update_team(
            &team_id,
            &TeamUpdate {
                name: Some(new_name.clone()),
                slug: Some(new_slug.clone()),
            },
        )
        .await?;
    assert_eq!(updated.id, team_id);
    assert_eq!(updated.name, new_name);
    assert_eq!(updated.slug, new_slug);

    // delete
    admin.delete_team_by_id(&team_id).await?;
    let teams = admin.list_teams().await?;
    assert!(teams.iter().all(|t| t.id != team_id));

    // a user without roles cannot create teams
    let user_name = ctx.unique("user");
    let user_password = ctx.unique("user-pass");
    admin
        .create_user(&NewUser {
            username: user_name.clone(),
            password: user_password.clone(),
        })
        .await?;

    let user = ctx.client(&ctx.log_in(&user_name, &user_password).await?)?;
    assert_rejected(
        user.create_team(&NewTeam {
            name: ctx.unique("bad-team"),
            slug: ctx.unique("bad-slug"),
        })
        .await,
        StatusCode::FORBIDDEN,
        &access_denied(&[Role::SuperAdmin, Role::ClubAdmin]),
    );

    // cleanup
    user.delete_own_user().await?;
    admin.delete_own_org().await?;

    Ok(())
}
