use serde::{Deserialize, Serialize};
use crate::MovieId;

/// One movie returned by a title search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub release_date: String, // ISO date, empty when TMDB has none
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// First page of a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResults {
    pub total_results: u64,
    pub results: Vec<SearchResultItem>,
}
