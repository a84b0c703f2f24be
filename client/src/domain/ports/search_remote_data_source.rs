//! Driven port for fetching one page of movie search results.
//!
//! Adapters own transport and wire decoding. They report failures as
//! [`TransportFault`] values and hand them to
//! [`safe_api_call`](crate::domain::safe_api_call), so callers only ever
//! observe a classified [`RemoteError`](crate::domain::RemoteError).

use async_trait::async_trait;

use crate::domain::{RemoteResult, SearchData};

/// Raw failure observed while calling the search API, before classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFault {
    /// The call exceeded its connect or read timeout.
    #[error("search request timed out: {message}")]
    Timeout { message: String },
    /// The API host name could not be resolved.
    #[error("search host could not be resolved: {message}")]
    UnresolvedHost { message: String },
    /// Connection or stream I/O failed.
    #[error("search transport failed: {message}")]
    Io { message: String },
    /// The API answered with a non-success HTTP status.
    #[error("search API returned status {code}")]
    HttpStatus { code: u16, body: String },
    /// Anything else, including undecodable payloads.
    #[error("search request failed: {message}")]
    Other { message: String },
}

impl TransportFault {
    /// Build a [`TransportFault::Timeout`].
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Build a [`TransportFault::UnresolvedHost`].
    pub fn unresolved_host(message: impl Into<String>) -> Self {
        Self::UnresolvedHost {
            message: message.into(),
        }
    }

    /// Build a [`TransportFault::Io`].
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Build a [`TransportFault::HttpStatus`].
    pub fn http_status(code: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            code,
            body: body.into(),
        }
    }

    /// Build a [`TransportFault::Other`].
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Port for querying the remote movie search API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchRemoteDataSource: Send + Sync {
    /// Fetch one page of results for `query`.
    ///
    /// A `Response: "False"` reply is still a success at this level; the
    /// repository decides what it means.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let source = OmdbHttpSource::new(base_url, api_key, timeout)?;
    /// let page = source.search_movies("jaws", 1).await?;
    /// assert!(page.total_results >= page.search_results.len() as u32);
    /// ```
    async fn search_movies(&self, query: &str, page: u32) -> RemoteResult<SearchData>;
}
