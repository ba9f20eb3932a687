//! Unauthenticated auth endpoints: log-in and the two sign-up flows
//!
//! All calls live under `{api_url}/auth`. A successful call returns the
//! caller's user id and, for headless clients, the raw `session_id` cookie
//! needed to build an [`ApiClient`](crate::ApiClient).

use std::sync::Arc;

use clubhouse_common::{find_session_cookie, ApiConfig};
use reqwest::{Method, Url};
use serde::Serialize;

use crate::api::ApiClientBuilder;
use crate::error::{ClientError, ClientResult};
use crate::session::{BrowserJar, ClientKind, Session};
use crate::transport::{check_status, endpoint, parse_base_url, parse_id, set_cookie_values, Expect};
use crate::types::{Credentials, LoginResult, NewClub};

const AUTH_PREFIX: &str = "auth";

pub struct AuthClient {
    http: reqwest::Client,
    config: ApiConfig,
    api_url: Url,
    auth_url: Url,
    session: Session,
}

impl AuthClient {
    /// Create an auth client whose sessions are handed back to the caller
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        Self::with_session(config, Session::headless(None))
    }

    /// Create a headless auth client for the backend named by `BACKEND_URL`
    pub fn from_env() -> ClientResult<Self> {
        let config = ApiConfig::from_env()?;
        Self::new(&config)
    }

    /// Create an auth client that stores sessions in its own cookie jar
    pub fn browser(config: &ApiConfig) -> ClientResult<Self> {
        Self::with_session(config, Session::browser(Arc::new(BrowserJar::new())))
    }

    fn with_session(config: &ApiConfig, session: Session) -> ClientResult<Self> {
        let api_url = parse_base_url(&config.api_url)?;
        let auth_url = endpoint(&api_url, &[AUTH_PREFIX])?;

        let builder = reqwest::Client::builder().timeout(config.request_timeout);
        let http = session.configure(builder).build()?;

        Ok(Self {
            http,
            config: config.clone(),
            api_url,
            auth_url,
            session,
        })
    }

    pub fn kind(&self) -> ClientKind {
        self.session.kind()
    }

    /// Cookie jar shared with clients built from this one, browser kind only
    pub fn jar(&self) -> Option<Arc<BrowserJar>> {
        match &self.session {
            Session::Browser(jar) => Some(Arc::clone(jar)),
            Session::Headless(_) => None,
        }
    }

    pub async fn log_in(&self, credentials: &Credentials) -> ClientResult<LoginResult> {
        self.authenticate(&["log-in"], credentials, "log-in").await
    }

    /// Create a club and its first admin in one step
    pub async fn sign_up_with_new_club(&self, payload: &NewClub) -> ClientResult<LoginResult> {
        self.authenticate(
            &["sign-up-with-new-club"],
            payload,
            "sign-up with new club",
        )
        .await
    }

    /// Join the club that issued `invite_id`
    pub async fn sign_up_via_invite(
        &self,
        invite_id: &str,
        credentials: &Credentials,
    ) -> ClientResult<LoginResult> {
        self.authenticate(
            &["sign-up-via-invite", invite_id],
            credentials,
            "sign-up via invite",
        )
        .await
    }

    /// Start an [`ApiClient`](crate::ApiClient) acting as the user behind `login`
    pub fn client_for(&self, login: &LoginResult) -> ApiClientBuilder {
        let builder = crate::ApiClient::builder(&self.config.api_url)
            .timeout(self.config.request_timeout)
            .own_id(login.own_id.clone());

        match (&self.session, &login.cookie) {
            (Session::Browser(jar), _) => builder.kind(ClientKind::Browser).jar(Arc::clone(jar)),
            (Session::Headless(_), Some(cookie)) => builder.cookie(cookie.clone()),
            (Session::Headless(_), None) => builder,
        }
    }

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        payload: &B,
        context: &'static str,
    ) -> ClientResult<LoginResult> {
        let url = endpoint(&self.auth_url, segments)?;
        tracing::debug!(%url, kind = %self.kind(), "Authenticating");

        let response = self.http.post(url.clone()).json(payload).send().await?;

        let session_cookie = find_session_cookie(set_cookie_values(response.headers()))
            .map(str::to_string);

        let response = check_status(&Method::POST, &url, response, Expect::Success).await?;
        let body = response.text().await?;
        let own_id = parse_id(&body, context)?;

        let cookie = match &self.session {
            // the jar must hold a session it will actually send to the API
            Session::Browser(jar) if jar.has_session(&self.api_url) => None,
            Session::Browser(_) => return Err(ClientError::MissingSessionCookie(context)),
            Session::Headless(_) => {
                Some(session_cookie.ok_or(ClientError::MissingSessionCookie(context))?)
            }
        };

        tracing::info!(own_id = %own_id, context, "Authenticated");

        Ok(LoginResult { own_id, cookie })
    }
}
