//! Request and response types for the Clubhouse REST API
//!
//! Deserializing a response into these types is the client's shape check:
//! a missing field, an unexpected enum variant or a wrongly typed value
//! fails the call instead of leaking loosely typed JSON to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access-control role held by a user within their club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    /// Older backends called clubs "orgs"
    #[serde(alias = "org_admin")]
    ClubAdmin,
    Coach,
    Player,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::ClubAdmin, Role::Coach, Role::Player];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::ClubAdmin => "club_admin",
            Role::Coach => "coach",
            Role::Player => "player",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "club_admin" | "org_admin" => Ok(Role::ClubAdmin),
            "coach" => Ok(Role::Coach),
            "player" => Ok(Role::Player),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Where a game is played, from the club's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Home,
    Away,
    Other,
}

/// Current state of a game invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteResponse {
    Pending,
    Accepted,
    Declined,
    Unsure,
}

/// Answer a user may give to a game invite; there is no way back to pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInviteResponse {
    Accepted,
    Declined,
    Unsure,
}

impl From<UserInviteResponse> for InviteResponse {
    fn from(response: UserInviteResponse) -> Self {
        match response {
            UserInviteResponse::Accepted => InviteResponse::Accepted,
            UserInviteResponse::Declined => InviteResponse::Declined,
            UserInviteResponse::Unsure => InviteResponse::Unsure,
        }
    }
}

// === Requests ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Sign-up payload that creates a club with the new user as its admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClub {
    pub username: String,
    pub password: String,
    pub club_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    pub name: String,
    pub slug: String,
}

/// Partial team update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGame {
    pub team_id: String,
    pub opponent: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_time: Option<DateTime<Utc>>,
    pub location: String,
    pub location_kind: LocationKind,
    /// Users holding any of these roles receive a game invite
    pub invited_roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteReply {
    pub invite_id: String,
    pub response: UserInviteResponse,
}

// === Responses ===

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Role assignments of every user in the club, keyed by user id
pub type RoleAssignments = HashMap<String, Vec<Role>>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(alias = "club_id")]
    pub org_id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Game {
    pub id: String,
    pub team_id: String,
    pub opponent: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub stop_time: Option<DateTime<Utc>>,
    pub location: String,
    pub location_kind: LocationKind,
}

/// A game invite as seen by the invited user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OwnGameInvite {
    pub invite_id: String,
    pub game_id: String,
    pub opponent: String,
    pub response: InviteResponse,
}

/// A game invite as seen by the game's organisers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameInviteEntry {
    pub invite_id: String,
    pub user_id: String,
    pub username: String,
    pub response: InviteResponse,
}

/// Outcome of a successful log-in or sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub own_id: String,
    /// Raw `session_id` Set-Cookie value; `None` when a cookie jar holds the session
    pub cookie: Option<String>,
}
