//! Error types for MentorAI.
//!
//! Every failure a chat turn can hit is represented here.  The session converts each of them into
//! a visible assistant message via [`Error::turn_notice`], so none of them terminate a session.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for MentorAI.
#[derive(Clone, Debug)]
pub enum Error {
    /// The provider answered with a status other than 200.
    HttpStatus {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body, verbatim.
        body: String,
    },

    /// Connection error (refused, reset, DNS failure).
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The request timed out.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// HTTP client error that is neither a timeout nor a connection failure.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The provider answered 200 with a body of unexpected shape.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Invalid user input or configuration.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },

    /// A turn is already in flight for this session.
    Busy {
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates a new HTTP status error.
    pub fn http_status(status_code: u16, body: impl Into<String>) -> Self {
        Error::HttpStatus {
            status_code,
            body: body.into(),
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a new busy error.
    pub fn busy(message: impl Into<String>) -> Self {
        Error::Busy {
            message: message.into(),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Returns true if the provider answered with a non-200 status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Error::HttpStatus { .. })
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::Timeout { .. } | Error::HttpClient { .. }
        )
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns true if a successful response could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Serialization { .. })
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if a turn was rejected because another was in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::Busy { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Renders the assistant message shown in place of a reply when a turn fails.
    ///
    /// HTTP status errors render as `Error <code>: <body>` with the body verbatim.
    pub fn turn_notice(&self) -> String {
        match self {
            Error::HttpStatus { status_code, body } => format!("Error {status_code}: {body}"),
            Error::Connection { message, .. }
            | Error::Timeout { message, .. }
            | Error::HttpClient { message, .. } => {
                format!("Error: could not reach the model provider ({message})")
            }
            Error::Serialization { message, .. } => {
                format!("Error: unexpected response from the model provider ({message})")
            }
            Error::Validation { message, .. } => message.clone(),
            _ => format!("Error: {self}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HttpStatus { status_code, body } => {
                write!(f, "HTTP status {status_code}: {body}")
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
            Error::Busy { message } => {
                write!(f, "Busy: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for MentorAI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_notice_is_verbatim() {
        let err = Error::http_status(429, "rate limited");
        assert_eq!(err.turn_notice(), "Error 429: rate limited");
        assert_eq!(err.status_code(), Some(429));
        assert!(err.is_http_status());
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_kinds() {
        assert!(Error::connection("refused", None).is_transport());
        assert!(Error::timeout("slow", Some(1.0)).is_transport());
        assert!(Error::http_client("builder", None).is_transport());
        assert!(!Error::serialization("bad json", None).is_transport());

        assert!(Error::connection("refused", None).is_connection());
        assert!(!Error::timeout("slow", None).is_connection());
        assert!(Error::timeout("slow", None).is_timeout());
    }

    #[test]
    fn transport_notice_mentions_cause() {
        let notice = Error::connection("connection refused", None).turn_notice();
        assert!(notice.starts_with("Error: "));
        assert!(notice.contains("connection refused"));
    }

    #[test]
    fn parse_notice_differs_from_transport() {
        let notice = Error::serialization("missing choices", None).turn_notice();
        assert!(notice.contains("unexpected response"));
        assert!(notice.contains("missing choices"));
    }

    #[test]
    fn io_error_has_source() {
        let err: Error = io::Error::other("disk full").into();
        assert!(error::Error::source(&err).is_some());
    }
}
