//! Clubhouse API Client
//!
//! Typed HTTP client for the Clubhouse club-management REST API:
//! - [`AuthClient`] for log-in and sign-up (no session required)
//! - [`ApiClient`] for users, roles, service invites, teams, games and game invites
//! - Headless (explicit cookie) and browser (cookie jar) session handling
//! - Response-shape validation through typed deserialization

pub mod api;
pub mod auth;
pub mod error;
pub mod session;
mod transport;
pub mod types;

pub use api::{ApiClient, ApiClientBuilder};
pub use auth::AuthClient;
pub use error::{ClientError, ClientResult};
pub use session::{BrowserJar, ClientKind, Session};
pub use types::*;
