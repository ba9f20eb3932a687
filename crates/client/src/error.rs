//! Client error types

use reqwest::{Method, StatusCode};
use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Unexpected response shape from {context}: {message}")]
    Schema {
        context: String,
        message: String,
        body: String,
    },

    #[error("Failed to retrieve session cookie from {0}")]
    MissingSessionCookie(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error(transparent)]
    Config(#[from] clubhouse_common::Error),
}

impl ClientError {
    /// HTTP status of a rejected response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Request(e) => e.status(),
            _ => None,
        }
    }

    /// Body of a rejected or malformed response
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Status { body, .. } | ClientError::Schema { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the server rejected the call with exactly this status and body
    pub fn is_status(&self, status: StatusCode, body: &str) -> bool {
        self.status() == Some(status) && self.body() == Some(body)
    }
}
