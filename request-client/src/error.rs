//! Error types for the request client

use thiserror::Error;

/// Errors that can occur talking to the device's management interface
#[derive(Debug, Error)]
pub enum RequestError {
    /// Login rejected by the device (response carried the error marker)
    #[error("login rejected by device")]
    Auth,

    /// Response body could not be parsed as the expected XML
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// node-get answered with a different number of values than requested
    #[error("node count mismatch: requested {expected}, device returned {actual}")]
    NodeCountMismatch { expected: usize, actual: usize },

    /// Device closed the connection mid-request
    #[error("connection dropped by device")]
    ConnectionDropped,

    /// Request deadline elapsed
    #[error("request timed out")]
    Timeout,

    /// Any other network or HTTP failure
    #[error("network/HTTP error: {0}")]
    Network(String),
}

impl RequestError {
    /// Failure signatures the device recovers from on its own; callers retry
    /// these after a short pause.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionDropped | Self::Timeout)
    }

    /// Failure signatures that mean the session token is no longer honored.
    /// The device answers expired sessions with a non-XML page rather than an
    /// explicit status, so a parse failure is the expiry signal.
    pub fn is_session_loss(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::NodeCountMismatch { .. })
    }

    /// Classify an I/O error raised while reading a response body.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        classify_io_kind(err.kind()).unwrap_or_else(|| Self::Network(err.to_string()))
    }
}

impl From<ureq::Error> for RequestError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Network(format!("HTTP status {code}")),
            ureq::Error::Transport(transport) => {
                use std::error::Error as _;

                // The interesting detail (reset vs. timeout) lives in the
                // underlying io::Error, somewhere down the source chain.
                let mut source = transport.source();
                while let Some(inner) = source {
                    if let Some(io) = inner.downcast_ref::<std::io::Error>() {
                        if let Some(classified) = classify_io_kind(io.kind()) {
                            return classified;
                        }
                        break;
                    }
                    source = inner.source();
                }
                Self::Network(transport.to_string())
            }
        }
    }
}

fn classify_io_kind(kind: std::io::ErrorKind) -> Option<RequestError> {
    use std::io::ErrorKind::*;
    match kind {
        TimedOut | WouldBlock => Some(RequestError::Timeout),
        ConnectionReset | ConnectionAborted | BrokenPipe | UnexpectedEof => {
            Some(RequestError::ConnectionDropped)
        }
        _ => None,
    }
}
