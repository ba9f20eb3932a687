//! Shared utilities, configuration, and error handling for Clubhouse clients
//!
//! This crate provides the glue used by the API client and the end-to-end suites:
//! - Configuration loaded from the environment
//! - Error types
//! - Session cookie extraction and accumulation
//! - Per-run test identifiers

pub mod config;
pub mod cookie;
pub mod error;
pub mod testing;

pub use crate::config::ApiConfig;
pub use crate::cookie::{find_session_cookie, CookieSet, SetCookie, SESSION_COOKIE_NAME};
pub use crate::error::{Error, Result};
pub use crate::testing::{TestId, TEST_ID_HEADER};
