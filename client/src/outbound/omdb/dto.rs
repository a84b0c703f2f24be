//! DTOs for decoding OMDb search responses.
//!
//! The adapter decodes into these wire shapes first, then maps them into
//! domain records in one total pass: absent or malformed fields become
//! defaults, never errors.

use serde::Deserialize;

use crate::domain::{Movie, SearchData};

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(rename = "Search", default)]
    pub(super) search: Option<Vec<MovieDto>>,
    #[serde(rename = "totalResults", default)]
    pub(super) total_results: Option<String>,
    #[serde(rename = "Response", default)]
    pub(super) response: String,
    #[serde(rename = "Error", default)]
    pub(super) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MovieDto {
    #[serde(rename = "imdbID", default)]
    pub(super) imdb_id: String,
    #[serde(rename = "Title", default)]
    pub(super) title: String,
    #[serde(rename = "Year", default)]
    pub(super) year: String,
    #[serde(rename = "Type", default)]
    pub(super) kind: String,
    #[serde(rename = "Poster", default)]
    pub(super) poster: String,
}

impl SearchResponseDto {
    pub(super) fn into_domain(self) -> SearchData {
        SearchData {
            search_results: self
                .search
                .unwrap_or_default()
                .into_iter()
                .map(MovieDto::into_domain)
                .collect(),
            total_results: self
                .total_results
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(0),
            response: self.response.eq_ignore_ascii_case("true"),
            error: self.error.unwrap_or_default(),
        }
    }
}

impl MovieDto {
    fn into_domain(self) -> Movie {
        Movie {
            imdb_id: self.imdb_id,
            title: self.title,
            year: self.year,
            kind: self.kind,
            poster_url: self.poster,
        }
    }
}
