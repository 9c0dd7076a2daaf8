use serde::{Deserialize, Serialize};
use crate::watched::WatchedMovie;
use crate::MovieId;

/// Full record for one movie, fetched when it is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    pub release_date: String,
    pub poster_path: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub overview: String,
    pub genres: Vec<String>,
}

impl MovieDetail {
    /// The subset that is kept once the movie is marked as watched.
    pub fn to_watched(&self) -> WatchedMovie {
        WatchedMovie {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_watched_keeps_identity_fields() {
        let detail = MovieDetail {
            id: 603,
            title: "The Matrix".to_string(),
            release_date: "1999-03-30".to_string(),
            poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_string()),
            runtime_minutes: Some(136),
            overview: "Set in the 22nd century...".to_string(),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
        };

        let watched = detail.to_watched();
        assert_eq!(watched.id, 603);
        assert_eq!(watched.title, "The Matrix");
        assert_eq!(watched.release_date, "1999-03-30");
        assert_eq!(watched.poster_path.as_deref(), Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"));
    }
}
