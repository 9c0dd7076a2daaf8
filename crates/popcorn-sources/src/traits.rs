use async_trait::async_trait;
use popcorn_models::{MovieDetail, MovieId, SearchResults};
use std::sync::Arc;

use crate::error::SourceError;

/// A remote catalogue that can search titles and describe a single movie.
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// First page of movies matching `query`. An empty query is a valid
    /// search.
    async fn search_movies(&self, query: &str) -> Result<SearchResults, SourceError>;

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, SourceError>;
}

#[async_trait]
impl<T: MovieSource + ?Sized> MovieSource for Arc<T> {
    fn source_name(&self) -> &str {
        (**self).source_name()
    }

    async fn search_movies(&self, query: &str) -> Result<SearchResults, SourceError> {
        (**self).search_movies(query).await
    }

    async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail, SourceError> {
        (**self).movie_detail(id).await
    }
}
