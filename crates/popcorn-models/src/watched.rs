use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use crate::MovieId;

/// A movie the user has marked as watched. Field names follow the TMDB
/// payload so the persisted list stays readable by other tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Watched movies in the order they were added, at most one entry per id.
///
/// Serialized as a plain JSON array. When an array with repeated ids is
/// deserialized, the first occurrence wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<WatchedMovie>", into = "Vec<WatchedMovie>")]
pub struct WatchedList {
    entries: Vec<WatchedMovie>,
    ids: HashSet<MovieId>,
}

impl WatchedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `movie` unless its id is already present. Returns whether the
    /// list changed.
    pub fn insert(&mut self, movie: WatchedMovie) -> bool {
        if !self.ids.insert(movie.id) {
            return false;
        }
        self.entries.push(movie);
        true
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: MovieId) -> Option<&WatchedMovie> {
        if !self.contains(id) {
            return None;
        }
        self.entries.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchedMovie> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[WatchedMovie] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for WatchedList {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for WatchedList {}

impl From<Vec<WatchedMovie>> for WatchedList {
    fn from(movies: Vec<WatchedMovie>) -> Self {
        movies.into_iter().collect()
    }
}

impl From<WatchedList> for Vec<WatchedMovie> {
    fn from(list: WatchedList) -> Self {
        list.entries
    }
}

impl FromIterator<WatchedMovie> for WatchedList {
    fn from_iter<I: IntoIterator<Item = WatchedMovie>>(iter: I) -> Self {
        let mut list = WatchedList::new();
        for movie in iter {
            list.insert(movie);
        }
        list
    }
}

impl<'a> IntoIterator for &'a WatchedList {
    type Item = &'a WatchedMovie;
    type IntoIter = std::slice::Iter<'a, WatchedMovie>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str) -> WatchedMovie {
        WatchedMovie {
            id,
            title: title.to_string(),
            release_date: "2003-05-15".to_string(),
            poster_path: None,
        }
    }

    #[test]
    fn test_insert_keeps_insertion_order() {
        let mut list = WatchedList::new();
        assert!(list.insert(movie(3, "C")));
        assert!(list.insert(movie(1, "A")));
        assert!(list.insert(movie(2, "B")));

        let ids: Vec<MovieId> = list.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_insert_duplicate_id_is_noop() {
        let mut list = WatchedList::new();
        assert!(list.insert(movie(1, "First")));
        assert!(!list.insert(movie(1, "Second")));

        assert_eq!(list.len(), 1);
        assert_eq!(list.get(1).map(|m| m.title.as_str()), Some("First"));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list: WatchedList = vec![movie(1, "X")].into();
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": 1,
                "title": "X",
                "release_date": "2003-05-15",
                "poster_path": null
            }])
        );
    }

    #[test]
    fn test_deserialize_drops_repeated_ids() {
        let json = r#"[
            {"id": 7, "title": "Seven", "release_date": "1995-09-22", "poster_path": "/a.jpg"},
            {"id": 7, "title": "Se7en", "release_date": "1995-09-22"},
            {"id": 8, "title": "Eight"}
        ]"#;
        let list: WatchedList = serde_json::from_str(json).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(7).unwrap().title, "Seven");
        assert_eq!(list.get(8).unwrap().release_date, "");
        assert!(list.get(8).unwrap().poster_path.is_none());
    }
}
