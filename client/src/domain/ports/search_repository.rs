//! Driving port consumed by the search session.

use async_trait::async_trait;

use crate::domain::{RemoteResult, SearchData};

/// Search entry point that only yields pages the API reported as successful.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Search for `query` and return page `page`.
    ///
    /// An API-level "no results" reply is surfaced as
    /// [`RemoteError::ApplicationFailure`](crate::domain::RemoteError::ApplicationFailure).
    async fn search(&self, query: &str, page: u32) -> RemoteResult<SearchData>;
}
