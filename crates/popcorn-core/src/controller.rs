//! Application state and the remote operations that feed it.
//!
//! [`AppController`] is the only writer of application state. Searches and
//! detail fetches run in spawned tasks that send their outcome back over a
//! channel; the controller applies an outcome only if the operation's
//! [`CancellationToken`] is still live. Changing the query or the selection
//! cancels the superseded operation, so a late response can never overwrite
//! newer state.

use popcorn_config::Config;
use popcorn_models::{
    Loadable, MovieDetail, MovieId, SearchResultItem, SearchResults, Selection, WatchedList,
    WatchedMovie,
};
use popcorn_sources::{MovieSource, SourceError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cancel::{run_cancellable, run_debounced};
use crate::store::WatchedStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Pause between the last query change and the search request
    pub debounce: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self { debounce: Duration::from_millis(500) }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self { debounce: Duration::from_millis(config.search.debounce_ms) }
    }
}

/// Outcome of a finished remote operation, sent back to the controller.
enum Update {
    Search {
        token: CancellationToken,
        query: String,
        result: Result<SearchResults, SourceError>,
    },
    Detail {
        token: CancellationToken,
        id: MovieId,
        result: Result<MovieDetail, SourceError>,
    },
}

/// What applying a finished operation did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    SearchResults { query: String, total_results: u64 },
    SearchFailed { query: String },
    DetailLoaded { id: MovieId },
    DetailFailed { id: MovieId },
    /// The operation was superseded before its result could be applied
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended; `persisted` is false when writing the snapshot failed
    Added { persisted: bool },
    AlreadyWatched,
}

/// Read-only snapshot of everything a front end renders.
#[derive(Debug, Serialize)]
pub struct ViewState<'a> {
    pub query: &'a str,
    pub total_results: u64,
    pub results: &'a [SearchResultItem],
    pub searching: bool,
    pub selection: Selection,
    pub detail: &'a Loadable<MovieDetail>,
    pub watched: &'a WatchedList,
}

impl ViewState<'_> {
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Whether the movie in the detail panel is already on the watched list
    pub fn is_selected_watched(&self) -> bool {
        self.selection
            .id()
            .map(|id| self.watched.contains(id))
            .unwrap_or(false)
    }
}

pub struct AppController<S> {
    source: Arc<S>,
    store: WatchedStore,
    options: ControllerOptions,

    query: String,
    search_results: Loadable<SearchResults>,
    selection: Selection,
    detail: Loadable<MovieDetail>,
    watched: WatchedList,

    session: CancellationToken,
    search_token: Option<CancellationToken>,
    detail_token: Option<CancellationToken>,
    updates_tx: mpsc::UnboundedSender<Update>,
    updates_rx: mpsc::UnboundedReceiver<Update>,
}

impl<S> AppController<S>
where
    S: MovieSource + 'static,
{
    /// Create the controller and hydrate the watched list from `store`.
    pub fn new(source: S, store: WatchedStore, options: ControllerOptions) -> Self {
        let watched = store.load();
        info!("Controller started with {} watched movies", watched.len());

        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            store,
            options,
            query: String::new(),
            search_results: Loadable::NotLoaded,
            selection: Selection::None,
            detail: Loadable::NotLoaded,
            watched,
            session: CancellationToken::new(),
            search_token: None,
            detail_token: None,
            updates_tx,
            updates_rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_results(&self) -> &Loadable<SearchResults> {
        &self.search_results
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn detail(&self) -> &Loadable<MovieDetail> {
        &self.detail
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }

    pub fn is_searching(&self) -> bool {
        self.search_token.is_some()
    }

    /// True while a search or detail fetch has yet to report back.
    pub fn has_pending(&self) -> bool {
        self.search_token.is_some() || self.detail_token.is_some()
    }

    pub fn view(&self) -> ViewState<'_> {
        let results = self.search_results.loaded();
        ViewState {
            query: &self.query,
            total_results: results.map(|r| r.total_results).unwrap_or(0),
            results: results.map(|r| r.results.as_slice()).unwrap_or(&[]),
            searching: self.is_searching(),
            selection: self.selection,
            detail: &self.detail,
            watched: &self.watched,
        }
    }

    /// Replace the query and schedule a debounced search for it, cancelling
    /// whatever search was scheduled or running for the previous query.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();

        if let Some(previous) = self.search_token.take() {
            previous.cancel();
        }

        let token = self.session.child_token();
        self.search_token = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.updates_tx.clone();
        let query = self.query.clone();
        let delay = self.options.debounce;

        tokio::spawn(async move {
            let outcome = run_debounced(&token, delay, source.search_movies(&query)).await;
            match outcome {
                Some(result) => {
                    let _ = tx.send(Update::Search { token, query, result });
                }
                None => debug!(query = %query, "Search superseded before completion"),
            }
        });
    }

    /// Select `id`, or clear the selection when `id` is already selected.
    pub fn toggle_selection(&mut self, id: MovieId) {
        let previous = self.selection;
        self.selection.toggle(id);
        self.selection_changed(previous);
    }

    /// Leave the detail view.
    pub fn clear_selection(&mut self) {
        let previous = self.selection;
        self.selection.clear();
        self.selection_changed(previous);
    }

    fn selection_changed(&mut self, previous: Selection) {
        if previous == self.selection {
            return;
        }

        if let Some(stale) = self.detail_token.take() {
            stale.cancel();
        }

        match self.selection {
            Selection::Selected(id) => {
                self.detail = Loadable::Loading;
                self.fetch_detail(id);
            }
            Selection::None => self.detail = Loadable::NotLoaded,
        }
    }

    fn fetch_detail(&mut self, id: MovieId) {
        let token = self.session.child_token();
        self.detail_token = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.updates_tx.clone();

        tokio::spawn(async move {
            match run_cancellable(&token, source.movie_detail(id)).await {
                Some(result) => {
                    let _ = tx.send(Update::Detail { token, id, result });
                }
                None => debug!(id, "Detail fetch superseded before completion"),
            }
        });
    }

    /// Add `movie` to the watched list unless its id is already there, then
    /// persist the whole list. A failed write is logged; the movie stays in
    /// memory either way.
    pub fn add_watched_movie(&mut self, movie: WatchedMovie) -> AddOutcome {
        let id = movie.id;
        if !self.watched.insert(movie) {
            debug!(id, "Movie already on the watched list");
            return AddOutcome::AlreadyWatched;
        }

        let persisted = match self.store.save(&self.watched) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist watched list to {:?}: {}", self.store.path(), e);
                false
            }
        };
        info!(id, total = self.watched.len(), "Added movie to watched list");

        AddOutcome::Added { persisted }
    }

    /// Add the movie shown in the detail panel and close the panel.
    ///
    /// Returns `None` when no detail is loaded. An already watched movie
    /// leaves the panel open.
    pub fn add_selected_to_watched(&mut self) -> Option<AddOutcome> {
        let movie = self.detail.loaded()?.to_watched();
        let outcome = self.add_watched_movie(movie);
        if matches!(outcome, AddOutcome::Added { .. }) {
            self.clear_selection();
        }
        Some(outcome)
    }

    /// Wait for the next finished operation and apply it.
    ///
    /// Cancel-safe. Superseded operations never report back, so this only
    /// resolves while [`has_pending`](Self::has_pending) is true or a result
    /// is already queued.
    pub async fn next_update(&mut self) -> StateChange {
        match self.updates_rx.recv().await {
            Some(update) => self.apply(update),
            None => StateChange::Discarded,
        }
    }

    /// Apply every finished operation without waiting. Returns how many were
    /// processed, discarded ones included.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, update: Update) -> StateChange {
        match update {
            Update::Search { token, query, result } => {
                if token.is_cancelled() {
                    debug!(query = %query, "Discarding superseded search result");
                    return StateChange::Discarded;
                }
                self.search_token = None;

                match result {
                    Ok(results) => {
                        let total_results = results.total_results;
                        debug!(query = %query, total_results, "Applying search results");
                        self.search_results = Loadable::Loaded(results);
                        StateChange::SearchResults { query, total_results }
                    }
                    Err(e) => {
                        // Previous results stay visible
                        warn!(query = %query, "Search failed: {}", e);
                        StateChange::SearchFailed { query }
                    }
                }
            }
            Update::Detail { token, id, result } => {
                if token.is_cancelled() || !self.selection.is_selected(id) {
                    debug!(id, "Discarding superseded movie detail");
                    return StateChange::Discarded;
                }
                self.detail_token = None;

                match result {
                    Ok(detail) => {
                        self.detail = Loadable::Loaded(detail);
                        StateChange::DetailLoaded { id }
                    }
                    Err(e) => {
                        warn!(id, "Movie detail fetch failed: {}", e);
                        self.detail = Loadable::NotLoaded;
                        StateChange::DetailFailed { id }
                    }
                }
            }
        }
    }

    /// Cancel every pending operation; their results are dropped silently.
    pub fn shutdown(&mut self) {
        self.session.cancel();
        self.search_token = None;
        self.detail_token = None;
    }
}

impl<S> Drop for AppController<S> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
