use popcorn_models::{MovieDetail, MovieId, SearchResultItem, SearchResults};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: MovieId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: MovieId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

/// Body TMDB sends with 4xx/5xx responses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

impl From<TmdbMovie> for SearchResultItem {
    fn from(movie: TmdbMovie) -> Self {
        SearchResultItem {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date.unwrap_or_default(),
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
        }
    }
}

impl From<TmdbMovieDetail> for MovieDetail {
    fn from(detail: TmdbMovieDetail) -> Self {
        MovieDetail {
            id: detail.id,
            title: detail.title,
            release_date: detail.release_date.unwrap_or_default(),
            poster_path: detail.poster_path.filter(|p| !p.is_empty()),
            runtime_minutes: detail.runtime,
            overview: detail.overview.unwrap_or_default(),
            genres: detail.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

/// Build the search URL. The query is percent-encoded; an empty query is
/// sent as-is.
pub fn search_url(api_base_url: &str, api_key: &str, query: &str, include_adult: bool) -> String {
    format!(
        "{}/search/movie?query={}&include_adult={}&api_key={}",
        api_base_url.trim_end_matches('/'),
        urlencoding::encode(query),
        include_adult,
        urlencoding::encode(api_key)
    )
}

pub fn movie_url(api_base_url: &str, api_key: &str, id: MovieId) -> String {
    format!(
        "{}/movie/{}?api_key={}",
        api_base_url.trim_end_matches('/'),
        id,
        urlencoding::encode(api_key)
    )
}

/// Turn a non-2xx response into `SourceError::Api`, preferring TMDB's own
/// status message over the raw body.
async fn check_response(response: Response) -> Result<Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<TmdbErrorBody>(&body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or(body);
    warn!(status, "TMDB API error: {}", message);

    Err(SourceError::Api { status, message })
}

/// Search movies by title
pub async fn search_movies(
    client: &Client,
    api_base_url: &str,
    api_key: &str,
    query: &str,
    include_adult: bool,
) -> Result<SearchResults, SourceError> {
    debug!(query, "TMDB search request");

    let response = client
        .get(search_url(api_base_url, api_key, query, include_adult))
        .header("Accept", "application/json")
        .send()
        .await?;

    let response = check_response(response).await?;
    let body: TmdbSearchResponse = response
        .json()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))?;

    debug!(
        query,
        total_results = body.total_results,
        page_results = body.results.len(),
        "TMDB search response"
    );

    Ok(SearchResults {
        total_results: body.total_results,
        results: body.results.into_iter().map(SearchResultItem::from).collect(),
    })
}

/// Fetch full detail for one movie
pub async fn get_movie(
    client: &Client,
    api_base_url: &str,
    api_key: &str,
    id: MovieId,
) -> Result<MovieDetail, SourceError> {
    debug!(id, "TMDB movie detail request");

    let response = client
        .get(movie_url(api_base_url, api_key, id))
        .header("Accept", "application/json")
        .send()
        .await?;

    let response = check_response(response).await?;
    let body: TmdbMovieDetail = response
        .json()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(body.into())
}
