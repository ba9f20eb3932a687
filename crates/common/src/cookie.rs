//! Session cookie extraction and accumulation
//!
//! The backend authenticates every protected endpoint through a
//! `session_id` cookie issued by the auth endpoints. Clients that carry the
//! cookie themselves (instead of relying on a cookie jar) use [`CookieSet`]
//! to replay what the server set and to follow refreshes and force-expiries.

use chrono::{DateTime, Duration, Utc};
use ::cookie::Cookie;

pub use ::cookie::SameSite;

use crate::error::{Error, Result};

/// Name of the cookie carrying the backend session
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// One parsed `Set-Cookie` header value
#[derive(Debug, Clone, PartialEq)]
pub struct SetCookie {
    cookie: Cookie<'static>,
    raw: String,
}

impl SetCookie {
    /// Parse a raw `Set-Cookie` header value
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let cookie = Cookie::parse(raw.to_string())
            .map_err(|e| Error::Cookie(format!("{}: '{}'", e, raw)))?;

        Ok(Self {
            cookie,
            raw: raw.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        self.cookie.name()
    }

    pub fn value(&self) -> &str {
        self.cookie.value()
    }

    pub fn http_only(&self) -> bool {
        self.cookie.http_only().unwrap_or(false)
    }

    pub fn secure(&self) -> bool {
        self.cookie.secure().unwrap_or(false)
    }

    pub fn same_site(&self) -> Option<SameSite> {
        self.cookie.same_site()
    }

    pub fn path(&self) -> Option<&str> {
        self.cookie.path()
    }

    /// `Expires` attribute; `None` for session cookies or unparsable dates
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        let expires = self.cookie.expires_datetime()?;
        DateTime::from_timestamp(expires.unix_timestamp(), expires.nanosecond())
    }

    /// `Max-Age` attribute
    pub fn max_age(&self) -> Option<Duration> {
        self.cookie
            .max_age()
            .map(|age| Duration::seconds(age.whole_seconds()))
    }

    /// Whether applying this cookie removes it from a client's store
    ///
    /// `Max-Age` takes precedence over `Expires`.
    pub fn is_removal(&self, now: DateTime<Utc>) -> bool {
        if self.value().is_empty() {
            return true;
        }
        match (self.max_age(), self.expires()) {
            (Some(age), _) => age <= Duration::zero(),
            (None, Some(expires)) => expires <= now,
            (None, None) => false,
        }
    }

    /// `name=value` as sent back in a `Cookie` request header
    pub fn pair(&self) -> String {
        format!("{}={}", self.name(), self.value())
    }

    /// The header value exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed cookie, for stores that need to rewrite attributes
    pub fn into_cookie(self) -> Cookie<'static> {
        self.cookie
    }
}

/// Find the raw session cookie among `Set-Cookie` header values
pub fn find_session_cookie<'a, I>(set_cookies: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    set_cookies.into_iter().find(|c| c.starts_with(&prefix))
}

/// Ordered name/value cookie store replayed on every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    cookies: Vec<(String, String)>,
}

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a raw cookie string such as a login `Set-Cookie` value
    pub fn from_cookie(raw: &str) -> Self {
        let mut set = Self::new();
        if raw.trim().is_empty() {
            return set;
        }

        match SetCookie::parse(raw) {
            Ok(cookie) if !cookie.value().is_empty() => {
                set.insert(cookie.name().to_string(), cookie.value().to_string())
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unparsable seed cookie"),
        }
        set
    }

    /// Apply `Set-Cookie` values from a response
    ///
    /// Cookies replace stored ones with the same name; empty or expired
    /// cookies delete them. Returns the number of changes applied.
    pub fn absorb<'a, I>(&mut self, set_cookies: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.absorb_at(set_cookies, Utc::now())
    }

    pub(crate) fn absorb_at<'a, I>(&mut self, set_cookies: I, now: DateTime<Utc>) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut applied = 0;

        for raw in set_cookies {
            let cookie = match SetCookie::parse(raw) {
                Ok(cookie) => cookie,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unparsable Set-Cookie header");
                    continue;
                }
            };

            if cookie.is_removal(now) {
                if self.remove(cookie.name()) {
                    tracing::debug!(cookie = %cookie.name(), "Cookie expired by server");
                    applied += 1;
                }
            } else {
                self.insert(cookie.name().to_string(), cookie.value().to_string());
                applied += 1;
            }
        }

        applied
    }

    pub fn insert(&mut self, name: String, value: String) {
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.cookies.len();
        self.cookies.retain(|(n, _)| n != name);
        self.cookies.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Value for a `Cookie` request header, `None` when nothing is stored
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
