//! Shared primitives for all Rust crates in Rollcall.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Rollcall crates.
pub type AppResult<T> = Result<T, AppError>;

/// Process exit status reported for every fatal condition.
pub const FATAL_EXIT_CODE: u8 = 2;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Config(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Fatal error categories for a snapshot run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed required input. Raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Login or second-factor verification failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The acting user is not a member of the requested group.
    #[error("membership error: {0}")]
    Membership(String),

    /// Transport or API failure reported by the remote provider.
    #[error("provider error: {message}")]
    Provider {
        /// Human readable failure description.
        message: String,
        /// HTTP status code, when the failure carried one.
        status: Option<u16>,
    },

    /// The run was interrupted by the operator.
    #[error("run cancelled")]
    Cancelled,

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates a provider error without a status code.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a provider error carrying the HTTP status code.
    #[must_use]
    pub fn provider_status(message: impl Into<String>, status: u16) -> Self {
        Self::Provider {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Returns the status code attached to a provider error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns a stable label for the error category, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Membership(_) => "membership",
            Self::Provider { .. } => "provider",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Every fatal condition shares one code; callers should not branch on it.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        FATAL_EXIT_CODE
    }
}
