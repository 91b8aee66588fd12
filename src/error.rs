//! Unified error handling for route-recorder
//!
//! Every fallible operation in this crate returns [`RecorderError`]. The
//! variants follow the caller contract: lifecycle misuse and bad annotation
//! input are loud typed errors, while off-state location samples are a
//! defined no-op and never show up here (see
//! [`RouteRecorder::add_location`](crate::RouteRecorder::add_location)).

use thiserror::Error;

use crate::recorder::RecorderState;

/// Result type alias for route-recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Unified error type for all route-recorder operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecorderError {
    /// A lifecycle operation was called from a state that does not permit it
    #[error("invalid transition: cannot {operation} from state {from}")]
    InvalidTransition {
        from: RecorderState,
        operation: &'static str,
    },

    /// An annotation or sample field was rejected before insertion
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The route could not be turned into its transfer representation
    #[error("cannot serialize route: {message}")]
    Serialization { message: String },

    /// Route submission over HTTP failed
    #[error("http error: {message}")]
    Http {
        message: String,
        status: Option<u16>,
    },

    /// No recorder session is active in the process-wide slot
    #[error("no active recording session")]
    NoActiveSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = RecorderError::InvalidTransition {
            from: RecorderState::Stopped,
            operation: "pause",
        };
        assert_eq!(
            err.to_string(),
            "invalid transition: cannot pause from state stopped"
        );
    }

    #[test]
    fn test_validation_display() {
        let err = RecorderError::Validation {
            field: "title",
            message: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid title: must not be empty");
    }

    #[test]
    fn test_serialization_display() {
        let err = RecorderError::Serialization {
            message: "route name is unset".to_string(),
        };
        assert!(err.to_string().contains("cannot serialize route"));
    }

    #[test]
    fn test_http_error_keeps_status() {
        let err = RecorderError::Http {
            message: "server returned status 503".to_string(),
            status: Some(503),
        };
        assert!(matches!(
            err,
            RecorderError::Http {
                status: Some(503),
                ..
            }
        ));
    }
}
