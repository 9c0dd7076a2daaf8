//! Presentation rules shared by every front end: truncation, year
//! extraction, poster resolution and when the result list is visible.

use popcorn_config::Config;
use popcorn_models::MovieDetail;
use serde::Serialize;

/// Bundled image shown when a movie has no poster.
pub const PLACEHOLDER_POSTER: &str = "no-image.jpg";

const ELLIPSIS: &str = "...";

/// Where a poster image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum PosterSource {
    Remote(String),
    Placeholder,
}

impl PosterSource {
    pub fn as_str(&self) -> &str {
        match self {
            PosterSource::Remote(url) => url,
            PosterSource::Placeholder => PLACEHOLDER_POSTER,
        }
    }
}

/// Text of `max_chars` characters or more is cut to its first `max_chars`
/// characters followed by an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None if text.chars().count() == max_chars => format!("{}{}", text, ELLIPSIS),
        None => text.to_string(),
    }
}

/// Year part of an ISO date, i.e. everything before the first `-`.
pub fn release_year(release_date: &str) -> &str {
    release_date.split('-').next().unwrap_or("")
}

pub fn genre_line(genres: &[String]) -> String {
    genres.join(" ")
}

pub fn runtime_line(detail: &MovieDetail) -> String {
    match detail.runtime_minutes {
        Some(minutes) => format!("{} * {} min", detail.release_date, minutes),
        None => format!("{} * ? min", detail.release_date),
    }
}

pub fn stats_line(watched_count: usize) -> String {
    format!("{} movies watched", watched_count)
}

pub fn poster_source(image_base_url: &str, poster_path: Option<&str>) -> PosterSource {
    match poster_path.map(|p| p.trim_start_matches('/')) {
        Some(path) if !path.is_empty() => PosterSource::Remote(format!(
            "{}/{}",
            image_base_url.trim_end_matches('/'),
            path
        )),
        _ => PosterSource::Placeholder,
    }
}

/// Limits and URLs the front end renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPolicy {
    pub title_max_chars: usize,
    pub overview_max_chars: usize,
    pub wide_viewport_min_width: u32,
    pub image_base_url: String,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DisplayPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title_max_chars: config.display.title_max_chars,
            overview_max_chars: config.display.overview_max_chars,
            wide_viewport_min_width: config.display.wide_viewport_min_width,
            image_base_url: config.tmdb.image_base_url.clone(),
        }
    }

    pub fn title(&self, title: &str) -> String {
        truncate_chars(title, self.title_max_chars)
    }

    pub fn overview(&self, overview: &str) -> String {
        truncate_chars(overview, self.overview_max_chars)
    }

    pub fn poster(&self, poster_path: Option<&str>) -> PosterSource {
        poster_source(&self.image_base_url, poster_path)
    }

    /// Wide viewports always show the result list; narrow ones only when
    /// there is something in it.
    pub fn show_search_results(&self, viewport_width: u32, result_count: usize) -> bool {
        viewport_width >= self.wide_viewport_min_width || result_count > 0
    }
}
