use request_client::RequestError;
use thiserror::Error;

/// Failures surfaced to callers of the typed API
///
/// The retry layer absorbs the device's recoverable hiccups internally; what
/// reaches the caller is either a hard setup problem (`Auth`), a poll-cycle
/// failure worth reporting (`Protocol`, `Connection`, `Validation`), or a
/// caller mistake (`InvalidBand`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The device rejected the configured credentials
    #[error("authentication rejected by device")]
    Auth,

    /// The device answered outside the protocol's shape and reauthentication
    /// did not help
    #[error("protocol failure: {0}")]
    Protocol(String),

    /// A connection failure outside the recoverable signatures, or a
    /// recoverable one that outlived the retry budget
    #[error("connection failure: {0}")]
    Connection(String),

    /// Band index outside the supported set {1, 3, 7, 20}
    #[error("invalid band index: {0}")]
    InvalidBand(u32),

    /// A node value did not parse as the expected type
    #[error("invalid value {value:?} for {field}")]
    Validation { field: String, value: String },
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<RequestError> for ApiError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Auth => ApiError::Auth,
            RequestError::Parse(msg) => ApiError::Protocol(msg),
            RequestError::NodeCountMismatch { expected, actual } => ApiError::Protocol(format!(
                "node count mismatch: requested {expected}, device returned {actual}"
            )),
            RequestError::ConnectionDropped => {
                ApiError::Connection("connection dropped by device".to_string())
            }
            RequestError::Timeout => ApiError::Connection("request timed out".to_string()),
            RequestError::Network(msg) => ApiError::Connection(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_conversion() {
        assert!(matches!(ApiError::from(RequestError::Auth), ApiError::Auth));
        assert!(matches!(
            ApiError::from(RequestError::Parse("garbage".to_string())),
            ApiError::Protocol(_)
        ));
        assert!(matches!(
            ApiError::from(RequestError::NodeCountMismatch {
                expected: 8,
                actual: 3
            }),
            ApiError::Protocol(_)
        ));
        assert!(matches!(
            ApiError::from(RequestError::ConnectionDropped),
            ApiError::Connection(_)
        ));
        assert!(matches!(
            ApiError::from(RequestError::Timeout),
            ApiError::Connection(_)
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::InvalidBand(12);
        assert_eq!(format!("{err}"), "invalid band index: 12");

        let err = ApiError::Validation {
            field: "rsrp0".to_string(),
            value: "n/a".to_string(),
        };
        assert_eq!(format!("{err}"), "invalid value \"n/a\" for rsrp0");
    }
}
