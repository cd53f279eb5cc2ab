use std::fmt::Display;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::ParseError;

/// Result alias for client construction within the Harbor API crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Result alias for calls that reach (or try to reach) the registry.
pub type RemoteResult<T> = std::result::Result<T, RemoteFailure>;

/// Errors raised while preparing a client or a request, before anything is sent.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provided server URL is malformed.
    #[error("invalid Harbor server URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: ParseError,
    },

    /// The server URL cannot carry a path (e.g. `mailto:`).
    #[error("Harbor server URL '{0}' cannot be used as a base for API paths")]
    UnsupportedBaseUrl(String),

    /// Joining a path onto the API base failed.
    #[error("failed to join path '{path}' to base URL '{base}': {source}")]
    InvalidPath {
        base: String,
        path: String,
        #[source]
        source: ParseError,
    },

    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Closed set of failures the registry adapter can report.
///
/// Each HTTP status the GC endpoints document maps to one variant. Anything
/// else, including transport and decoding problems, lands in `Unknown` with
/// the underlying cause preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("internal server error: {message}")]
    InternalServerError { message: String },

    #[error("unexpected failure{}: {cause}", status_suffix(.status))]
    Unknown { status: Option<u16>, cause: String },
}

impl RemoteFailure {
    /// Classify a non-success response by status code and body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            StatusCode::BAD_REQUEST => RemoteFailure::BadRequest { message },
            StatusCode::UNAUTHORIZED => RemoteFailure::Unauthorized { message },
            StatusCode::FORBIDDEN => RemoteFailure::Forbidden { message },
            StatusCode::NOT_FOUND => RemoteFailure::NotFound { message },
            StatusCode::CONFLICT => RemoteFailure::Conflict { message },
            StatusCode::INTERNAL_SERVER_ERROR => RemoteFailure::InternalServerError { message },
            other => RemoteFailure::Unknown {
                status: Some(other.as_u16()),
                cause: message,
            },
        }
    }

    /// Failure that never produced an HTTP status (connection, TLS, decoding, URL).
    pub fn transport(cause: impl Display) -> Self {
        RemoteFailure::Unknown {
            status: None,
            cause: cause.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteFailure {
    fn from(error: reqwest::Error) -> Self {
        RemoteFailure::Unknown {
            status: error.status().map(|status| status.as_u16()),
            cause: error.to_string(),
        }
    }
}

impl From<ApiError> for RemoteFailure {
    fn from(error: ApiError) -> Self {
        RemoteFailure::transport(error)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Pull a readable message out of the registry's `{"errors": [...]}` envelope,
/// falling back to the raw body.
fn extract_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let messages: Vec<String> = parsed
            .errors
            .into_iter()
            .map(|item| match (item.code.is_empty(), item.message.is_empty()) {
                (false, false) => format!("{}: {}", item.code, item.message),
                (true, false) => item.message,
                _ => item.code,
            })
            .filter(|message| !message.is_empty())
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "<empty response body>".to_string()
    } else {
        trimmed.to_string()
    }
}
