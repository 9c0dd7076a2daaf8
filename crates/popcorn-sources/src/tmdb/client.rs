use async_trait::async_trait;
use popcorn_config::TmdbConfig;
use popcorn_models::{MovieDetail, MovieId, SearchResults};
use reqwest::Client;
use std::sync::Arc;

use crate::error::SourceError;
use crate::tmdb::api;
use crate::traits::MovieSource;

/// Create the shared HTTP client used for TMDB requests
pub fn create_tmdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    api_base_url: String,
    include_adult: bool,
}

impl TmdbClient {
    pub fn new(api_key: String, config: &TmdbConfig) -> Self {
        Self {
            client: Arc::new(create_tmdb_client()),
            api_key,
            api_base_url: config.api_base_url.clone(),
            include_adult: config.include_adult,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(&self, query: &str) -> Result<SearchResults, SourceError> {
        api::search_movies(
            &self.client,
            &self.api_base_url,
            &self.api_key,
            query,
            self.include_adult,
        )
        .await
    }

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, SourceError> {
        api::get_movie(&self.client, &self.api_base_url, &self.api_key, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> TmdbClient {
        let config = TmdbConfig {
            api_base_url: server.url(),
            ..TmdbConfig::default()
        };
        TmdbClient::new("test-key".to_string(), &config)
    }

    #[tokio::test]
    async fn test_search_movies_sends_expected_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "Matrix".into()),
                Matcher::UrlEncoded("include_adult".into(), "false".into()),
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "page": 1,
                    "total_results": 2,
                    "total_pages": 1,
                    "results": [
                        {"id": 603, "title": "The Matrix", "release_date": "1999-03-30", "poster_path": "/a.jpg"},
                        {"id": 604, "title": "The Matrix Reloaded", "release_date": "2003-05-15", "poster_path": null}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let results = client_for(&server).search_movies("Matrix").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.total_results, 2);
        assert_eq!(results.results.len(), 2);
        assert_eq!(results.results[0].title, "The Matrix");
        assert_eq!(results.results[1].poster_path, None);
    }

    #[tokio::test]
    async fn test_movie_detail_flattens_genres() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/603")
            .match_query(Matcher::UrlEncoded("api_key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": 603,
                    "title": "The Matrix",
                    "release_date": "1999-03-30",
                    "runtime": 136,
                    "overview": "Set in the 22nd century...",
                    "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
                    "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"
                }"#,
            )
            .create_async()
            .await;

        let detail = client_for(&server).movie_detail(603).await.unwrap();

        mock.assert_async().await;
        assert_eq!(detail.title, "The Matrix");
        assert_eq!(detail.runtime_minutes, Some(136));
        assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_code": 7, "status_message": "Invalid API key: You must be granted a valid key.", "success": false}"#)
            .create_async()
            .await;

        let err = client_for(&server).search_movies("x").await.unwrap_err();
        match err {
            SourceError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).movie_detail(1).await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
