//! Session credential handling
//!
//! Two ways of carrying the backend session:
//! - [`ClientKind::Headless`]: the caller hands over the cookie obtained at
//!   log-in; it is replayed as a `Cookie` header on every request, and every
//!   `Set-Cookie` the server sends back is absorbed into the stored set.
//! - [`ClientKind::Browser`]: a shared [`BrowserJar`] attached to the HTTP
//!   client receives and replays cookies, the way a browser would. The caller
//!   never sees the session cookie.

use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clubhouse_common::{CookieSet, SetCookie};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{ClientBuilder, RequestBuilder, Url};

use crate::transport::set_cookie_values;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientKind {
    #[default]
    Headless,
    Browser,
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::Headless => write!(f, "headless"),
            ClientKind::Browser => write!(f, "browser"),
        }
    }
}

/// Cookie jar for browser-mode sessions
///
/// Backed by reqwest's [`Jar`], with two adjustments applied to every
/// incoming cookie:
/// - on `http` loopback origins (`localhost`, `127.0.0.1`, `[::1]`) the
///   `Secure` flag is dropped, since browsers treat those origins as secure
/// - a cookie without `Path` is scoped to `/` so the session issued under
///   `/api/auth` covers the whole API
#[derive(Debug, Default)]
pub struct BrowserJar {
    jar: Jar,
}

impl BrowserJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw `Set-Cookie` value as if `url` had sent it
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            self.set_cookies(&mut std::iter::once(&value), url);
        }
    }

    /// Whether a `session_id` cookie would be sent to `url`
    pub fn has_session(&self, url: &Url) -> bool {
        self.cookies(url)
            .and_then(|value| value.to_str().ok().map(has_session_pair))
            .unwrap_or(false)
    }
}

impl CookieStore for BrowserJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let adjusted: Vec<HeaderValue> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| adjust_for_origin(raw, url))
            .collect();
        self.jar.set_cookies(&mut adjusted.iter(), url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

fn adjust_for_origin(raw: &str, url: &Url) -> Option<HeaderValue> {
    let mut cookie = match SetCookie::parse(raw) {
        Ok(cookie) => cookie.into_cookie(),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unparsable Set-Cookie header");
            return None;
        }
    };

    if cookie.path().is_none() {
        cookie.set_path("/");
    }
    if url.scheme() == "http" && is_loopback(url) && cookie.secure() == Some(true) {
        cookie.set_secure(false);
    }

    HeaderValue::from_str(&cookie.to_string()).ok()
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn has_session_pair(header: &str) -> bool {
    header
        .split(';')
        .any(|pair| pair.trim_start().starts_with("session_id="))
}

#[derive(Clone)]
pub enum Session {
    Headless(Arc<Mutex<CookieSet>>),
    Browser(Arc<BrowserJar>),
}

impl Session {
    /// Session carried explicitly, seeded from a raw cookie string
    pub fn headless(cookie: Option<&str>) -> Self {
        let cookies = cookie.map(CookieSet::from_cookie).unwrap_or_default();
        Session::Headless(Arc::new(Mutex::new(cookies)))
    }

    /// Session carried by a cookie jar, possibly shared with an auth client
    pub fn browser(jar: Arc<BrowserJar>) -> Self {
        Session::Browser(jar)
    }

    pub fn kind(&self) -> ClientKind {
        match self {
            Session::Headless(_) => ClientKind::Headless,
            Session::Browser(_) => ClientKind::Browser,
        }
    }

    /// Attach the jar to an HTTP client under construction
    pub(crate) fn configure(&self, builder: ClientBuilder) -> ClientBuilder {
        match self {
            Session::Headless(_) => builder,
            Session::Browser(jar) => builder.cookie_provider(Arc::clone(jar)),
        }
    }

    /// Add the stored cookies to an outgoing request
    pub(crate) fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Session::Headless(cookies) => match lock(cookies).header_value() {
                Some(value) => request.header(COOKIE, value),
                None => request,
            },
            // the jar is consulted by reqwest itself
            Session::Browser(_) => request,
        }
    }

    /// Take in the `Set-Cookie` headers of a response
    pub(crate) fn absorb(&self, headers: &HeaderMap) {
        if let Session::Headless(cookies) = self {
            let values = set_cookie_values(headers);
            if values.is_empty() {
                return;
            }
            let applied = lock(cookies).absorb(values);
            tracing::debug!(applied, "Absorbed Set-Cookie headers");
        }
    }

    /// `Cookie` header value that would be sent to `url`
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        match self {
            Session::Headless(cookies) => lock(cookies).header_value(),
            Session::Browser(jar) => jar
                .cookies(url)
                .and_then(|value| value.to_str().ok().map(str::to_string)),
        }
    }
}

impl fmt::Debug for Session {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Headless(cookies) => f
                .debug_struct("Session::Headless")
                .field("cookies", &format!("[{} REDACTED]", lock(cookies).len()))
                .finish(),
            Session::Browser(_) => f.debug_struct("Session::Browser").finish_non_exhaustive(),
        }
    }
}

fn lock(cookies: &Mutex<CookieSet>) -> MutexGuard<'_, CookieSet> {
    cookies.lock().unwrap_or_else(PoisonError::into_inner)
}
