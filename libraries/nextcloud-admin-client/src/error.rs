//! Error types for the Nextcloud admin client.

use crate::update::UpdateError;
use thiserror::Error;

/// OCS status code the server uses for "not found".
pub const OCS_NOT_FOUND: i32 = 998;

/// OCS status code the server uses for "already exists".
pub const OCS_ALREADY_EXISTS: i32 = 102;

/// OCS status code the server uses for rejected credentials.
pub const OCS_UNAUTHORISED: i32 = 997;

/// Errors that can occur when talking to the administration API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline, unreachable or timed out
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Server answered with a non-success HTTP status and no OCS envelope
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No authenticated session is available
    #[error("Unauthorized: login required")]
    Unauthorized,

    /// Credentials were rejected by the server
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The OCS envelope carried a non-success status code
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// An argument was rejected before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more fields of a bulk user update failed
    #[error(transparent)]
    Update(#[from] UpdateError),
}

impl ClientError {
    /// The OCS status code, if this is an application-level error.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            ClientError::Api(e) => Some(e.code),
            _ => None,
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            ClientError::ServerUnreachable(error.to_string())
        } else {
            ClientError::Request(error)
        }
    }
}

/// Application-level error taken from an envelope's `meta` block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API error ({code}): {message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == OCS_NOT_FOUND
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == OCS_ALREADY_EXISTS
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
