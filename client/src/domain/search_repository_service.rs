//! Search repository backed by the remote data source.
//!
//! Adds the single business rule layered above raw API semantics: a reply
//! whose success flag is `false` is an error, not an empty page.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{SearchRemoteDataSource, SearchRepository};
use crate::domain::{RemoteError, RemoteResult, SearchData};

/// [`SearchRepository`] implementation over a [`SearchRemoteDataSource`].
#[derive(Clone)]
pub struct SearchRepositoryService {
    data_source: Arc<dyn SearchRemoteDataSource>,
}

impl SearchRepositoryService {
    /// Wrap a remote data source.
    pub fn new(data_source: Arc<dyn SearchRemoteDataSource>) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl SearchRepository for SearchRepositoryService {
    async fn search(&self, query: &str, page: u32) -> RemoteResult<SearchData> {
        let data = self.data_source.search_movies(query, page).await?;
        if !data.response {
            debug!(page, error = %data.error, "search API reported a logical failure");
            return Err(RemoteError::application_failure(data.error));
        }
        Ok(data)
    }
}
