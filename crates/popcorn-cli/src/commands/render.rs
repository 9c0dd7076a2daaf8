use crate::output::Output;
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use popcorn_core::display::{genre_line, release_year, runtime_line, stats_line};
use popcorn_core::{DisplayPolicy, ViewState};
use popcorn_models::{MovieDetail, MovieId, SearchResultItem, Selection, WatchedList};
use serde_json::json;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn results_table(results: &[SearchResultItem], selection: Selection, display: &DisplayPolicy) -> String {
    let mut table = table();
    table.set_header(vec![
        Cell::new(""),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Id").add_attribute(Attribute::Bold),
    ]);
    for item in results {
        let marker = if selection.is_selected(item.id) { "▶" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(display.title(&item.title)),
            Cell::new(format!("📅 {}", release_year(&item.release_date))),
            Cell::new(item.id),
        ]);
    }
    table.to_string()
}

pub fn watched_table(watched: &WatchedList, display: &DisplayPolicy) -> String {
    let mut table = table();
    table.set_header(vec![
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Poster").add_attribute(Attribute::Bold),
    ]);
    for movie in watched {
        table.add_row(vec![
            Cell::new(display.title(&movie.title)),
            Cell::new(format!("📅 {}", release_year(&movie.release_date))),
            Cell::new(movie.id),
            Cell::new(display.poster(movie.poster_path.as_deref()).as_str()),
        ]);
    }
    table.to_string()
}

/// How the current front end adds the open movie to the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddHint {
    /// One-shot `popcorn watch <id>`
    Command,
    /// `:add` inside the interactive session
    Session,
}

impl AddHint {
    fn describe(self, id: MovieId) -> String {
        match self {
            AddHint::Command => format!("popcorn watch {}", id),
            AddHint::Session => ":add".to_string(),
        }
    }
}

pub fn detail_panel(detail: &MovieDetail, already_watched: bool, hint: AddHint, display: &DisplayPolicy) -> String {
    let action = if already_watched {
        "movie already watched".to_string()
    } else {
        format!("+ add movie to watched ({})", hint.describe(detail.id))
    };

    [
        display.title(&detail.title).bold().to_string(),
        runtime_line(detail),
        genre_line(&detail.genres),
        format!("poster: {}", display.poster(detail.poster_path.as_deref()).as_str()),
        String::new(),
        action.cyan().to_string(),
        String::new(),
        display.overview(&detail.overview),
    ]
    .join("\n")
}

pub fn print_search(output: &Output, view: &ViewState<'_>, display: &DisplayPolicy, viewport_width: u32) {
    if !output.is_human() {
        output.json(&search_payload(view));
        return;
    }

    output.block(format!("🍿 Found {} results", view.total_results.bold()));
    if display.show_search_results(viewport_width, view.results.len()) {
        output.block(results_table(view.results, view.selection, display));
    }
}

/// JSON form of the view after a search: the whole state tagged `search`.
fn search_payload(view: &ViewState<'_>) -> serde_json::Value {
    let mut payload = serde_json::to_value(view).unwrap_or_default();
    if let Some(fields) = payload.as_object_mut() {
        fields.insert("type".to_string(), json!("search"));
    }
    payload
}

pub fn print_detail(
    output: &Output,
    detail: &MovieDetail,
    already_watched: bool,
    hint: AddHint,
    display: &DisplayPolicy,
) {
    if !output.is_human() {
        output.json(&json!({
            "type": "detail",
            "movie": detail,
            "poster": display.poster(detail.poster_path.as_deref()),
            "watched": already_watched,
        }));
        return;
    }
    output.block(detail_panel(detail, already_watched, hint, display));
}

pub fn print_watched(output: &Output, watched: &WatchedList, display: &DisplayPolicy) {
    if !output.is_human() {
        output.json(&json!({
            "type": "watched",
            "count": watched.len(),
            "movies": watched,
        }));
        return;
    }

    output.block(format!("MOVIES YOU WATCHED\n🎥 {}", stats_line(watched.len())));
    if !watched.is_empty() {
        output.block(watched_table(watched, display));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_models::WatchedMovie;

    fn item(id: u64, title: &str) -> SearchResultItem {
        SearchResultItem {
            id,
            title: title.to_string(),
            release_date: "2003-05-15".to_string(),
            poster_path: None,
        }
    }

    #[test]
    fn test_results_table_truncates_and_marks_selection() {
        let display = DisplayPolicy::default();
        let results = vec![item(604, "The Matrix Reloaded And Then Some"), item(605, "Heat")];

        let rendered = results_table(&results, Selection::Selected(605), &display);

        assert!(rendered.contains("The Matrix Reloaded ..."));
        assert!(rendered.contains("2003"));
        assert!(!rendered.contains("2003-05-15"));
        assert!(rendered.contains("▶"));
    }

    #[test]
    fn test_watched_table_uses_placeholder_poster() {
        let display = DisplayPolicy::default();
        let watched: WatchedList = vec![WatchedMovie {
            id: 1,
            title: "X".to_string(),
            release_date: "2001-01-01".to_string(),
            poster_path: None,
        }]
        .into();

        let rendered = watched_table(&watched, &display);
        assert!(rendered.contains("no-image.jpg"));
    }

    #[test]
    fn test_search_payload_serializes_view() {
        let results = vec![item(604, "The Matrix Reloaded")];
        let watched = WatchedList::new();
        let detail = popcorn_models::Loadable::NotLoaded;
        let view = ViewState {
            query: "matrix",
            total_results: 1,
            results: &results,
            searching: false,
            selection: Selection::Selected(604),
            detail: &detail,
            watched: &watched,
        };

        let payload = search_payload(&view);

        assert_eq!(payload["type"], "search");
        assert_eq!(payload["query"], "matrix");
        assert_eq!(payload["total_results"], 1);
        assert_eq!(payload["results"][0]["id"], 604);
        assert_eq!(payload["watched"], json!([]));
    }

    #[test]
    fn test_detail_panel_watched_marker() {
        let display = DisplayPolicy::default();
        let detail = MovieDetail {
            id: 949,
            title: "Heat".to_string(),
            release_date: "1995-12-15".to_string(),
            poster_path: Some("/heat.jpg".to_string()),
            runtime_minutes: Some(170),
            overview: "Obsessive master thief Neil McCauley...".to_string(),
            genres: vec!["Action".to_string(), "Crime".to_string()],
        };

        let fresh = detail_panel(&detail, false, AddHint::Command, &display);
        assert!(fresh.contains("1995-12-15 * 170 min"));
        assert!(fresh.contains("Action Crime"));
        assert!(fresh.contains("https://image.tmdb.org/t/p/w500/heat.jpg"));
        assert!(fresh.contains("popcorn watch 949"));

        let in_session = detail_panel(&detail, false, AddHint::Session, &display);
        assert!(in_session.contains("(:add)"));
        assert!(!in_session.contains("popcorn watch"));

        let seen = detail_panel(&detail, true, AddHint::Session, &display);
        assert!(seen.contains("movie already watched"));
    }
}
