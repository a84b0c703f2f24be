//! Classified outcome of a remote call.
//!
//! Every failure that crosses the data-source boundary is one of the
//! [`RemoteError`] variants below. Raw transport faults are converted by
//! [`safe_api_call`] and never observed above it.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::TransportFault;

/// Result of a remote call: success value or classified error.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Fallback text when an error body carries no usable message.
pub const DEFAULT_SERVER_MESSAGE: &str = "Something wrong happened";

/// JSON keys checked, in order, for a server-supplied error message.
const SERVER_MESSAGE_KEYS: [&str; 3] = ["error", "message", "Message"];

/// Identifier of the localised message shown for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// Device is offline or DNS failed.
    NoInternet,
    /// The server took too long to answer.
    TimedOut,
    /// Network I/O failed mid-request.
    IoError,
    /// The server answered with an error status.
    HttpError,
    /// Anything not covered above.
    UnknownError,
}

impl MessageKey {
    /// Stable identifier used by presentation layers for lookup.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoInternet => "no_internet",
            Self::TimedOut => "timed_out",
            Self::IoError => "io_error",
            Self::HttpError => "http_error",
            Self::UnknownError => "unknown_error",
        }
    }

    /// English default text for the identifier.
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::NoInternet => "No internet connection. Check your network and try again.",
            Self::TimedOut => "The request timed out. Please try again.",
            Self::IoError => "A network error occurred. Please try again.",
            Self::HttpError => "The server returned an error.",
            Self::UnknownError => "Something went wrong. Please try again.",
        }
    }
}

/// Closed taxonomy of remote call failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The API host could not be reached at all.
    #[error("no network connectivity")]
    NoConnectivity {
        #[source]
        cause: TransportFault,
    },
    /// Connect or read timeout.
    #[error("request timed out")]
    TimedOut {
        #[source]
        cause: TransportFault,
    },
    /// Other network I/O failure.
    #[error("network i/o failed")]
    IoFailure {
        #[source]
        cause: TransportFault,
    },
    /// Non-success HTTP status with the server's explanation.
    #[error("http {code}: {message}")]
    HttpFailure {
        #[source]
        cause: TransportFault,
        code: u16,
        message: String,
    },
    /// The API answered successfully but reported a logical failure.
    #[error("api reported failure: {message}")]
    ApplicationFailure { message: String },
    /// Failure that fits no other kind.
    #[error("unclassified remote failure")]
    Unclassified {
        #[source]
        cause: TransportFault,
    },
}

impl RemoteError {
    /// Classify a transport fault.
    ///
    /// # Examples
    ///
    /// ```
    /// use movie_search::domain::RemoteError;
    /// use movie_search::domain::ports::TransportFault;
    ///
    /// let error = RemoteError::classify(TransportFault::http_status(404, r#"{"message":"gone"}"#));
    /// assert!(matches!(
    ///     error,
    ///     RemoteError::HttpFailure { code: 404, ref message, .. } if message == "gone"
    /// ));
    /// ```
    pub fn classify(fault: TransportFault) -> Self {
        match fault {
            TransportFault::Timeout { .. } => Self::TimedOut { cause: fault },
            TransportFault::UnresolvedHost { .. } => Self::NoConnectivity { cause: fault },
            TransportFault::Io { .. } => Self::IoFailure { cause: fault },
            TransportFault::HttpStatus { code, ref body } => {
                let message = extract_server_message(body);
                Self::HttpFailure {
                    cause: fault,
                    code,
                    message,
                }
            }
            TransportFault::Other { .. } => Self::Unclassified { cause: fault },
        }
    }

    /// Build an [`RemoteError::ApplicationFailure`].
    pub fn application_failure(message: impl Into<String>) -> Self {
        Self::ApplicationFailure {
            message: message.into(),
        }
    }

    /// Message identifier for presentation layers.
    pub const fn message_key(&self) -> MessageKey {
        match self {
            Self::NoConnectivity { .. } => MessageKey::NoInternet,
            Self::TimedOut { .. } => MessageKey::TimedOut,
            Self::IoFailure { .. } => MessageKey::IoError,
            Self::HttpFailure { .. } => MessageKey::HttpError,
            Self::ApplicationFailure { .. } | Self::Unclassified { .. } => MessageKey::UnknownError,
        }
    }

    /// Text to show the user: the server's own words when it sent any,
    /// otherwise the default text for [`message_key`](Self::message_key).
    pub fn user_message(&self) -> &str {
        match self {
            Self::HttpFailure { message, .. } | Self::ApplicationFailure { message } => message,
            _ => self.message_key().default_text(),
        }
    }

    /// Transport fault this error was classified from, if any.
    pub const fn cause(&self) -> Option<&TransportFault> {
        match self {
            Self::NoConnectivity { cause }
            | Self::TimedOut { cause }
            | Self::IoFailure { cause }
            | Self::HttpFailure { cause, .. }
            | Self::Unclassified { cause } => Some(cause),
            Self::ApplicationFailure { .. } => None,
        }
    }
}

/// Await a transport call and classify any fault it reports.
///
/// # Examples
///
/// ```
/// use movie_search::domain::{RemoteError, safe_api_call};
/// use movie_search::domain::ports::TransportFault;
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let result: Result<u32, _> = runtime.block_on(safe_api_call(async {
///     Err(TransportFault::timeout("30s elapsed"))
/// }));
/// assert!(matches!(result, Err(RemoteError::TimedOut { .. })));
/// # Ok::<(), std::io::Error>(())
/// ```
pub async fn safe_api_call<T, F>(call: F) -> RemoteResult<T>
where
    F: Future<Output = Result<T, TransportFault>>,
{
    call.await.map_err(|fault| {
        let error = RemoteError::classify(fault);
        warn!(
            message_key = error.message_key().as_str(),
            error = %error,
            "remote call failed"
        );
        error
    })
}

/// Pull a human-readable message out of an error response body.
///
/// Checks the keys `error`, `message`, `Message` in that order and falls back
/// to [`DEFAULT_SERVER_MESSAGE`] for non-JSON bodies or bodies without any of
/// them.
pub fn extract_server_message(body: &str) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return DEFAULT_SERVER_MESSAGE.to_owned();
    };

    SERVER_MESSAGE_KEYS
        .iter()
        .find_map(|key| fields.get(*key))
        .map_or_else(
            || DEFAULT_SERVER_MESSAGE.to_owned(),
            |value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        )
}
