//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Variants map one-to-one onto the HTTP statuses the server layer emits:
/// Validation -> 400, Auth -> 401, NotFound/EntryNotFound -> 404,
/// Store/Dispatch -> 500.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}")]
    Validation {
        message: String,
        /// Optional machine-readable detail, surfaced in the API `error` field
        detail: Option<String>,
    },

    #[error("{0}")]
    Auth(String),

    /// Resource absent or not owned by the caller; the two cases share one
    /// variant and one message.
    #[error("{0}")]
    NotFound(String),

    #[error("Journal entry not found.")]
    EntryNotFound,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

impl Error {
    /// Create a validation error with a message only
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a validation error carrying a detail string
    pub fn invalid_input(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_uses_message_only() {
        let err = Error::invalid_input("Invalid plant data", "Plant name is required");
        assert_eq!(err.to_string(), "Invalid plant data");
    }

    #[test]
    fn test_entry_not_found_message() {
        assert_eq!(Error::EntryNotFound.to_string(), "Journal entry not found.");
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(Error::auth("nope"), Error::Auth(_)));
        assert!(matches!(Error::not_found("gone"), Error::NotFound(_)));
        assert!(matches!(Error::store("down"), Error::Store(_)));
    }
}
