//! Conductor access to the user list

#[macro_use]
mod common;

use anyhow::Result;

#[test_log::test(tokio::test)]
async fn test_conductor_lists_users() -> Result<()> {
    let ctx = require_conductor!();

    let login = ctx.log_in_conductor().await?;
    let client = ctx.client(&login)?;

    let users = client.list_users().await?;
    tracing::info!(count = users.len(), "Listed users");

    assert!(
        users.iter().any(|user| user.id == login.own_id),
        "conductor {} missing from {:?}",
        login.own_id,
        users
    );

    Ok(())
}
