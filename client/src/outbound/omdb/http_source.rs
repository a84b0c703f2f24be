//! Reqwest-backed OMDb search adapter.
//!
//! This adapter owns transport details only: query string construction,
//! timeout and status mapping, and JSON decoding into domain records.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::SearchResponseDto;
use crate::domain::ports::{SearchRemoteDataSource, TransportFault};
use crate::domain::{RemoteResult, SearchData, safe_api_call};

const USER_AGENT: &str = concat!("movie-search/", env!("CARGO_PKG_VERSION"));

/// Resolver failures surface only as text inside hyper's error chain.
const UNRESOLVED_HOST_MARKERS: [&str; 2] = ["dns error", "failed to lookup address"];

/// OMDb source adapter issuing `GET <base>?s=<query>&page=<n>&apikey=<key>`.
pub struct OmdbHttpSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbHttpSource {
    /// Build an adapter whose connect and read phases each time out after
    /// `timeout`.
    /// ```rust,ignore
    /// let source = OmdbHttpSource::new(base_url, "248f795", Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn search_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("s", query)
            .append_pair("page", &page.to_string())
            .append_pair("apikey", &self.api_key);
        url
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<SearchData, TransportFault> {
        debug!(base_url = %self.base_url, query, page, "requesting search page");
        let response = self
            .client
            .get(self.search_url(query, page))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(TransportFault::http_status(status.as_u16(), body));
        }
        parse_search(&body)
    }
}

#[async_trait]
impl SearchRemoteDataSource for OmdbHttpSource {
    async fn search_movies(&self, query: &str, page: u32) -> RemoteResult<SearchData> {
        safe_api_call(self.fetch_page(query, page)).await
    }
}

fn parse_search(body: &str) -> Result<SearchData, TransportFault> {
    let decoded: SearchResponseDto = serde_json::from_str(body).map_err(|error| {
        TransportFault::other(format!("invalid OMDb JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain())
}

fn map_transport_error(error: reqwest::Error) -> TransportFault {
    // The request URL carries the API key.
    let error = error.without_url();
    let message = describe_chain(&error);
    if error.is_timeout() {
        TransportFault::timeout(message)
    } else if is_unresolved_host(&error) {
        TransportFault::unresolved_host(message)
    } else if error.is_builder() || error.is_decode() {
        TransportFault::other(message)
    } else {
        TransportFault::io(message)
    }
}

fn is_unresolved_host(error: &(dyn StdError + 'static)) -> bool {
    chain(error).any(|layer| {
        let text = layer.to_string().to_ascii_lowercase();
        UNRESOLVED_HOST_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
    })
}

fn describe_chain(error: &(dyn StdError + 'static)) -> String {
    chain(error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

fn chain<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |&layer| layer.source())
}
