//! Movie search records.
//!
//! These are the UI-facing shapes produced after wire decoding. They carry no
//! knowledge of the OMDb field names.

use serde::Serialize;

/// One movie search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// IMDb identifier, e.g. `tt0073195`.
    pub imdb_id: String,
    /// Display title.
    pub title: String,
    /// Release year as reported by the API (may be a range such as `2001–`).
    pub year: String,
    /// Entry kind: `movie`, `series`, `episode`, ...
    pub kind: String,
    /// Poster image URL, or `N/A` when the API has none.
    pub poster_url: String,
}

/// One page of search results.
///
/// `search_results` is only meaningful when `response` is `true`; a `false`
/// response carries the server explanation in `error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    /// Movies on this page, in server order.
    pub search_results: Vec<Movie>,
    /// Total hits across all pages.
    pub total_results: u32,
    /// Server success flag.
    pub response: bool,
    /// Server error text, empty when absent.
    pub error: String,
}
