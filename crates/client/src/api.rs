//! Session-bearing REST client, one method per endpoint

use std::sync::Arc;
use std::time::Duration;

use clubhouse_common::config::DEFAULT_REQUEST_TIMEOUT;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::session::{BrowserJar, ClientKind, Session};
use crate::transport::{check_status, endpoint, parse_base_url, read_id, read_json, Expect};
use crate::types::{
    Game, GameInviteEntry, InviteReply, NewGame, NewTeam, NewUser, OwnGameInvite, Role,
    RoleAssignment, RoleAssignments, Team, TeamUpdate, UserSummary,
};

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    api_url: String,
    kind: ClientKind,
    cookie: Option<String>,
    jar: Option<Arc<BrowserJar>>,
    own_id: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl ApiClientBuilder {
    pub fn kind(mut self, kind: ClientKind) -> Self {
        self.kind = kind;
        self
    }

    /// Raw session cookie for a headless client
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Cookie jar for a browser client; a fresh one is used if unset
    pub fn jar(mut self, jar: Arc<BrowserJar>) -> Self {
        self.jar = Some(jar);
        self
    }

    pub fn own_id(mut self, own_id: impl Into<String>) -> Self {
        self.own_id = Some(own_id.into());
        self
    }

    /// Header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ClientResult<ApiClient> {
        let api_url = parse_base_url(&self.api_url)?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            default_headers.insert(header_name, header_value);
        }

        let session = match (self.kind, self.cookie, self.jar) {
            (ClientKind::Headless, cookie, None) => Session::headless(cookie.as_deref()),
            (ClientKind::Browser, None, jar) => Session::browser(jar.unwrap_or_default()),
            (ClientKind::Headless, _, Some(_)) => {
                return Err(mismatch("a cookie jar needs a browser client"))
            }
            (ClientKind::Browser, Some(_), _) => {
                return Err(mismatch("an explicit cookie needs a headless client"))
            }
        };

        let builder = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(self.timeout);
        let http = session.configure(builder).build()?;

        tracing::debug!(api_url = %api_url, kind = %session.kind(), "API client created");

        Ok(ApiClient {
            http,
            api_url,
            session,
            own_id: self.own_id,
        })
    }
}

fn mismatch(message: &str) -> ClientError {
    ClientError::Config(clubhouse_common::Error::Configuration(message.to_string()))
}

/// Client for the session-protected API endpoints
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    api_url: Url,
    session: Session,
    own_id: Option<String>,
}

impl ApiClient {
    pub fn builder(api_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            api_url: api_url.into(),
            kind: ClientKind::default(),
            cookie: None,
            jar: None,
            own_id: None,
            headers: Vec::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Id of the user this client acts as, when known
    pub fn own_id(&self) -> Option<&str> {
        self.own_id.as_deref()
    }

    pub fn kind(&self) -> ClientKind {
        self.session.kind()
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// `Cookie` header the next request to the API will carry
    pub fn cookie_header(&self) -> Option<String> {
        self.session.cookie_header(&self.api_url)
    }

    // === Users ===

    /// Create a user in the caller's club, returning its id
    pub async fn create_user(&self, payload: &NewUser) -> ClientResult<String> {
        let response = self
            .send_json(Method::POST, &["users", "create"], payload)
            .await?;
        read_id(response, "POST users/create").await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<UserSummary>> {
        let response = self.send(Method::GET, &["users", "list"]).await?;
        read_json(response, "GET users/list").await
    }

    pub async fn delete_user_by_id(&self, id: &str) -> ClientResult<()> {
        self.send(Method::DELETE, &["users", "delete-by-id", id])
            .await?;
        Ok(())
    }

    pub async fn delete_own_user(&self) -> ClientResult<()> {
        self.send(Method::DELETE, &["users", "delete-own"]).await?;
        Ok(())
    }

    // === Roles ===

    /// Every role assignment in the caller's club
    pub async fn list_roles(&self) -> ClientResult<RoleAssignments> {
        let response = self.send(Method::GET, &["roles", "list"]).await?;
        read_json(response, "GET roles/list").await
    }

    pub async fn list_own_roles(&self) -> ClientResult<Vec<Role>> {
        let response = self.send(Method::GET, &["roles", "list-own"]).await?;
        read_json(response, "GET roles/list-own").await
    }

    pub async fn assign_role(&self, payload: &RoleAssignment) -> ClientResult<()> {
        self.send_json(Method::POST, &["roles", "assign"], payload)
            .await?;
        Ok(())
    }

    pub async fn unassign_role(&self, payload: &RoleAssignment) -> ClientResult<()> {
        self.send_json(Method::DELETE, &["roles", "unassign"], payload)
            .await?;
        Ok(())
    }

    // === Service invites ===

    /// Create an invite that lets a new user join the caller's club, returning its id
    pub async fn create_service_invite(&self) -> ClientResult<String> {
        let response = self
            .send(Method::POST, &["invites-to-org", "create"])
            .await?;
        read_id(response, "POST invites-to-org/create").await
    }

    pub async fn delete_service_invite_by_id(&self, id: &str) -> ClientResult<()> {
        self.send(Method::DELETE, &["invites-to-org", "delete-by-id", id])
            .await?;
        Ok(())
    }

    // === Teams ===

    pub async fn list_teams(&self) -> ClientResult<Vec<Team>> {
        let response = self.send(Method::GET, &["teams", "list"]).await?;
        read_json(response, "GET teams/list").await
    }

    pub async fn get_team(&self, id: &str) -> ClientResult<Team> {
        let response = self.send(Method::GET, &["teams", "get", id]).await?;
        read_json(response, "GET teams/get").await
    }

    pub async fn create_team(&self, payload: &NewTeam) -> ClientResult<String> {
        let response = self
            .send_json(Method::POST, &["teams", "create"], payload)
            .await?;
        read_id(response, "POST teams/create").await
    }

    pub async fn update_team(&self, id: &str, payload: &TeamUpdate) -> ClientResult<Team> {
        let response = self
            .send_json(Method::PUT, &["teams", "update", id], payload)
            .await?;
        read_json(response, "PUT teams/update").await
    }

    pub async fn delete_team_by_id(&self, id: &str) -> ClientResult<()> {
        self.send(Method::DELETE, &["teams", "delete-by-id", id])
            .await?;
        Ok(())
    }

    // === Games ===

    /// Schedule a game; users holding any invited role get a pending invite
    pub async fn create_game(&self, payload: &NewGame) -> ClientResult<String> {
        let response = self
            .send_json(Method::POST, &["games", "create"], payload)
            .await?;
        read_id(response, "POST games/create").await
    }

    pub async fn delete_game(&self, game_id: &str) -> ClientResult<()> {
        self.send(Method::DELETE, &["games", "delete-by-id", game_id])
            .await?;
        Ok(())
    }

    pub async fn list_games_for_team(&self, team_id: &str) -> ClientResult<Vec<Game>> {
        let response = self
            .send(Method::GET, &["games", "list-for-team", team_id])
            .await?;
        read_json(response, "GET games/list-for-team").await
    }

    // === Game invites ===

    pub async fn list_own_invites(&self) -> ClientResult<Vec<OwnGameInvite>> {
        let response = self
            .send(Method::GET, &["game-invites", "list-own"])
            .await?;
        read_json(response, "GET game-invites/list-own").await
    }

    pub async fn list_invites_to_game(&self, game_id: &str) -> ClientResult<Vec<GameInviteEntry>> {
        let response = self
            .send(Method::GET, &["game-invites", "list-to-game", game_id])
            .await?;
        read_json(response, "GET game-invites/list-to-game").await
    }

    pub async fn respond_to_invite(&self, payload: &InviteReply) -> ClientResult<()> {
        self.send_json(Method::POST, &["game-invites", "respond"], payload)
            .await?;
        Ok(())
    }

    // === Session & club ===

    /// End the session; the server answers with a force-expired cookie
    pub async fn log_out(&self) -> ClientResult<()> {
        self.send(Method::POST, &["log-out"]).await?;
        Ok(())
    }

    /// Delete the caller's club and everything in it
    pub async fn delete_own_org(&self) -> ClientResult<()> {
        let request = self.request(Method::DELETE, &["orgs", "delete-own"])?;
        self.execute(request, Expect::Exactly(StatusCode::NO_CONTENT))
            .await?;
        Ok(())
    }

    // === Plumbing ===

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = endpoint(&self.api_url, segments)?;
        Ok(self.http.request(method, url))
    }

    async fn send(&self, method: Method, segments: &[&str]) -> ClientResult<Response> {
        let request = self.request(method, segments)?;
        self.execute(request, Expect::Success).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &B,
    ) -> ClientResult<Response> {
        let request = self.request(method, segments)?.json(payload);
        self.execute(request, Expect::Success).await
    }

    async fn execute(&self, request: RequestBuilder, expect: Expect) -> ClientResult<Response> {
        let request = self.session.decorate(request).build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(%method, %url, "Sending API request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "API request error [may be expected]");
            e
        })?;

        self.session.absorb(response.headers());

        check_status(&method, &url, response, expect).await
    }
}
