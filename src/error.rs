//! Error types for the Node-RED display plugin.
//!
//! Errors only exist at the boundary (configuration, network, payload).
//! Layout parsing, value extraction and line rendering never fail.

use thiserror::Error;

/// Errors that can occur while preparing a render cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// Plugin settings are missing or invalid (URL, endpoint path, timeout)
    #[error("{0}")]
    Config(String),

    /// Request to Node-RED did not complete in time
    #[error("Request to Node-RED timed out after {secs} seconds.")]
    Timeout {
        /// Configured timeout in seconds
        secs: u64,
    },

    /// Node-RED could not be reached
    #[error("Failed to connect to Node-RED. Check the URL and ensure Node-RED is running.")]
    Connection(String),

    /// Node-RED answered with a non-success status code
    #[error("Node-RED returned HTTP error {status}.")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// Any other transport failure
    #[error("Failed to fetch data from Node-RED: {0}")]
    Request(String),

    /// Node-RED returned a body that is not valid JSON (JSON mode only)
    #[error("Node-RED returned invalid JSON data.")]
    InvalidJson(String),

    /// Settings text could not be decoded
    #[error("Invalid settings: {0}")]
    Serialization(String),
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::Http {
                status: status.as_u16(),
            }
        } else if err.is_connect() {
            Error::Connection(error_chain(&err))
        } else {
            Error::Request(error_chain(&err))
        }
    }
}

/// Render an error with all of its sources, outermost first.
#[cfg(feature = "fetch")]
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Timeout { secs: 10 };
        assert!(err.to_string().contains("timed out after 10 seconds"));

        let err = Error::Http { status: 503 };
        assert_eq!(err.to_string(), "Node-RED returned HTTP error 503.");

        let err = Error::Config("Node-RED URL is required.".to_string());
        assert_eq!(err.to_string(), "Node-RED URL is required.");
    }

    #[test]
    fn test_invalid_json_hides_parser_detail() {
        let err = Error::InvalidJson("expected value at line 1 column 1".to_string());
        assert_eq!(err.to_string(), "Node-RED returned invalid JSON data.");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
