//! API error normalization
//!
//! Backend failures arrive as `{errors, code, details}` bodies alongside an
//! HTTP status; transport failures and undecodable bodies arrive with
//! nothing usable at all. Every failure is normalized into `ApiError` so
//! callers always see the same shape, falling back to a per-operation code
//! and message when the backend gave none.

use serde::Deserialize;

/// Statuses that mark client faults a retry cannot fix
const NON_RETRYABLE_STATUSES: [u16; 3] = [401, 403, 404];

/// Fallback code and message for one API operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext {
    /// Machine-readable fallback code
    pub code: &'static str,
    /// Human-readable fallback message
    pub message: &'static str,
}

impl ErrorContext {
    pub const fn new(code: &'static str, message: &'static str) -> Self {
        Self { code, message }
    }
}

/// Failure body returned by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    #[serde(default)]
    pub errors: Option<String>,
    /// Machine-readable error code
    #[serde(default)]
    pub code: Option<String>,
    /// Operation-specific extra detail, passed through verbatim
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Normalized API error
///
/// `status` is `None` when the request never produced a usable response
/// (connection failure, timeout, undecodable success body).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} ({code})")]
pub struct ApiError {
    /// Error code from the body, or the operation's fallback code
    pub code: String,
    /// Message from the body, or the operation's fallback message
    pub message: String,
    /// Extra detail from the body
    pub details: Option<serde_json::Value>,
    /// HTTP status of the failure response, when one was received
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            status: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Normalize a failure response body
    ///
    /// Empty `code` and `errors` fields count as absent, matching how the
    /// backend emits them.
    pub fn from_response(status: u16, body: ErrorBody, ctx: ErrorContext) -> Self {
        Self {
            code: body
                .code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| ctx.code.to_string()),
            message: body
                .errors
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| ctx.message.to_string()),
            details: body.details,
            status: Some(status),
        }
    }

    /// Normalize a failure that produced no usable response
    pub fn fallback(ctx: ErrorContext) -> Self {
        Self {
            code: ctx.code.to_string(),
            message: ctx.message.to_string(),
            details: None,
            status: None,
        }
    }

    /// Whether a retry may help
    ///
    /// Authentication, authorization, and not-found failures are final;
    /// everything else is assumed transient. The check covers both the HTTP
    /// status and codes that are bare status numbers.
    pub fn is_retryable(&self) -> bool {
        if let Some(status) = self.status {
            if NON_RETRYABLE_STATUSES.contains(&status) {
                return false;
            }
        }
        !NON_RETRYABLE_STATUSES
            .iter()
            .any(|status| self.code == status.to_string())
    }
}
