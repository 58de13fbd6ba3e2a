//! Error types for the Slack exporter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Slack authentication failed: {0}")]
    AuthFailed(String),

    #[error("Slack API error from {method}: {reason}")]
    Api { method: String, reason: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_auth_failed() {
        let err = Error::AuthFailed("invalid_auth".to_string());
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("invalid_auth"));
    }

    #[test]
    fn test_error_display_api() {
        let err = Error::Api {
            method: "im.history".to_string(),
            reason: "channel_not_found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("im.history"));
        assert!(msg.contains("channel_not_found"));
    }

    #[test]
    fn test_error_display_invalid_argument() {
        let err = Error::InvalidArgument("API token is empty".to_string());
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_debug_impl() {
        let err = Error::AuthFailed("expired".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("AuthFailed"));
    }
}
