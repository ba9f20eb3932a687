//! Shared request plumbing: endpoint URLs, status checks, response parsing

use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// Which statuses count as success for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// Any 2xx
    Success,
    /// Exactly this status
    Exactly(StatusCode),
}

impl Expect {
    fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Expect::Success => status.is_success(),
            Expect::Exactly(expected) => status == *expected,
        }
    }
}

/// Parse and validate an API root such as `http://localhost:3333/api`
pub(crate) fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(format!(
            "{} cannot be used as an API root",
            raw
        )));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> ClientResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Raw `Set-Cookie` values of a response
pub(crate) fn set_cookie_values(headers: &HeaderMap) -> Vec<&str> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect()
}

/// Turn an unexpected status into [`ClientError::Status`], keeping the body
pub(crate) async fn check_status(
    method: &Method,
    url: &Url,
    response: Response,
    expect: Expect,
) -> ClientResult<Response> {
    let status = response.status();
    if expect.accepts(status) {
        tracing::debug!(%method, %url, %status, "API request succeeded");
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read response body".to_string());

    tracing::warn!(
        %method,
        %url,
        %status,
        body = %body,
        "API request failed [may be expected]"
    );

    Err(ClientError::Status {
        method: method.clone(),
        url: url.to_string(),
        status,
        body,
    })
}

/// Deserialize a JSON body into `T`, reporting shape mismatches with the raw body
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> ClientResult<T> {
    let body = response.text().await?;
    parse_json(&body, context)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, context: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Schema {
        context: context.to_string(),
        message: e.to_string(),
        body: body.to_string(),
    })
}

/// Read an entity id returned by a create/sign-up call
pub(crate) async fn read_id(response: Response, context: &str) -> ClientResult<String> {
    let body = response.text().await?;
    parse_id(&body, context)
}

/// Ids arrive either as a JSON string or as a bare text body
pub(crate) fn parse_id(body: &str, context: &str) -> ClientResult<String> {
    let schema_error = |message: String| ClientError::Schema {
        context: context.to_string(),
        message,
        body: body.to_string(),
    };

    let id = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(id)) => id,
        Ok(other) => {
            return Err(schema_error(format!(
                "expected a string id, got {}",
                json_kind(&other)
            )))
        }
        Err(_) => body.trim().to_string(),
    };

    if id.is_empty() {
        return Err(schema_error("expected a non-empty id".to_string()));
    }
    Ok(id)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
