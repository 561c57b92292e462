//! Evaluation output and its mapping onto an HTTP response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Error body returned to blocked clients.
pub const BLOCKED_MESSAGE: &str =
    "You have been blocked by DarkForest Protocol. Visit https://www.darkestforest.xyz/ to learn more.";

/// Status used when a blocked request is redirected (302 Found).
pub const REDIRECT_STATUS_CODE: u16 = 302;

/// Result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the request is blocked
    pub blocked: bool,

    /// HTTP status for the response (200 when allowed)
    pub status_code: u16,

    /// Redirect target for blocked requests, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Error message for blocked requests without a redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Decision {
    /// Let the request through.
    pub fn allow() -> Self {
        Self {
            blocked: false,
            status_code: 200,
            redirect_url: None,
            error_message: None,
        }
    }

    /// Block the request by redirecting it.
    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            blocked: true,
            status_code: REDIRECT_STATUS_CODE,
            redirect_url: Some(url.into()),
            error_message: None,
        }
    }

    /// Block the request with a status code and the fixed error message.
    pub fn deny(status_code: u16) -> Self {
        Self {
            blocked: true,
            status_code,
            redirect_url: None,
            error_message: Some(BLOCKED_MESSAGE.to_string()),
        }
    }

    /// What an adapter should do with its native response.
    pub fn action(&self) -> ResponseAction<'_> {
        if !self.blocked {
            return ResponseAction::Continue;
        }

        if let Some(location) = self.redirect_url.as_deref() {
            return ResponseAction::Redirect {
                status: REDIRECT_STATUS_CODE,
                location,
            };
        }

        let message = self.error_message.as_deref().unwrap_or(BLOCKED_MESSAGE);
        ResponseAction::Json {
            status: self.status_code,
            body: json!({ "error": message }),
        }
    }
}

/// Framework-neutral rendering of a [`Decision`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseAction<'a> {
    /// Hand the request to the next handler
    Continue,
    /// Send a redirect to `location`
    Redirect { status: u16, location: &'a str },
    /// Send `body` as JSON with `status`
    Json { status: u16, body: Value },
}
