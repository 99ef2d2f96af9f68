//! Domain-level error type.
//!
//! Every failure surfaced to a collaborator is normalised into a single
//! human-readable message plus a stable [`ErrorCode`]. The message is what a
//! page shows; the code is what a caller branches on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ports::ContentApiError;

/// Message used when neither the server nor the transport supplied one.
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur inattendue s'est produite";

/// Message raised by single-post lookups, whatever the underlying cause.
pub const POST_NOT_FOUND_MESSAGE: &str = "Article non trouvé";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Local validation rejected the input before any request was sent.
    InvalidRequest,
    /// The server rejected or expired the credential.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// No response arrived within the transport timeout.
    Timeout,
    /// No response arrived at all.
    Transport,
    /// The server refused the request for another reason.
    Rejected,
    /// The response body did not match the expected shape.
    Decode,
    /// The session store could not be read or written.
    Storage,
}

/// Normalised client error.
///
/// ## Invariants
/// - `message` is never blank; blank inputs become [`GENERIC_ERROR_MESSAGE`].
///
/// # Examples
/// ```
/// use content_client::domain::{ClientError, ErrorCode, GENERIC_ERROR_MESSAGE};
///
/// let err = ClientError::new(ErrorCode::Transport, "   ");
/// assert_eq!(err.message(), GENERIC_ERROR_MESSAGE);
/// assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    code: ErrorCode,
    message: String,
    status: Option<u16>,
}

impl ClientError {
    /// Create a new error, substituting the generic message for blank input.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let text = message.into();
        Self {
            code,
            message: if text.trim().is_empty() {
                GENERIC_ERROR_MESSAGE.to_owned()
            } else {
                text
            },
            status: None,
        }
    }

    /// Attach the HTTP status that produced this error.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message for display.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Storage`].
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}

impl From<ContentApiError> for ClientError {
    fn from(value: ContentApiError) -> Self {
        match value {
            ContentApiError::Transport { message } => Self::new(ErrorCode::Transport, message),
            ContentApiError::Timeout { message } => Self::new(ErrorCode::Timeout, message),
            ContentApiError::Unauthorized { message } => {
                Self::new(ErrorCode::Unauthorized, message).with_status(401)
            }
            ContentApiError::Forbidden { message } => {
                Self::new(ErrorCode::Forbidden, message).with_status(403)
            }
            ContentApiError::NotFound { message } => {
                Self::new(ErrorCode::NotFound, message).with_status(404)
            }
            ContentApiError::Rejected { status, message } => {
                Self::new(ErrorCode::Rejected, message).with_status(status)
            }
            ContentApiError::Decode { message } => Self::new(ErrorCode::Decode, message),
        }
    }
}
