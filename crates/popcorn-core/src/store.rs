use popcorn_models::WatchedList;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StorageError;

/// Directory-backed key-value store: each key is one JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Raw value stored under `key`, `None` when the key was never written.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the value under `key`.
    ///
    /// Writes to a temp file and renames it over the target, so readers see
    /// either the old or the new value, never a partial one.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        if let Err(e) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Persistence for the watched list under a single key.
#[derive(Debug, Clone)]
pub struct WatchedStore {
    store: LocalStore,
    key: String,
}

impl WatchedStore {
    pub fn new(store: LocalStore, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.store.path_for(&self.key)
    }

    /// Load the persisted list. Never fails: anything unreadable yields an
    /// empty list.
    pub fn load(&self) -> WatchedList {
        let content = match self.store.get(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("No watched list stored under '{}', starting empty", self.key);
                return WatchedList::new();
            }
            Err(e) => {
                warn!("Failed to read watched list from {:?}: {}", self.path(), e);
                return WatchedList::new();
            }
        };

        let content = match String::from_utf8(content) {
            Ok(content) => content,
            Err(e) => {
                self.backup_corrupt(&e);
                return WatchedList::new();
            }
        };

        if content.trim().is_empty() {
            return WatchedList::new();
        }

        match serde_json::from_str::<WatchedList>(&content) {
            Ok(list) => {
                info!("Loaded {} watched movies from {:?}", list.len(), self.path());
                list
            }
            Err(e) => {
                self.backup_corrupt(&e);
                WatchedList::new()
            }
        }
    }

    /// Serialize the full list and overwrite the stored value.
    pub fn save(&self, list: &WatchedList) -> Result<(), StorageError> {
        let content = serde_json::to_string(list)?;
        self.store.set(&self.key, &content)?;
        debug!("Saved {} watched movies to {:?}", list.len(), self.path());
        Ok(())
    }

    fn backup_corrupt(&self, error: &dyn std::fmt::Display) {
        let path = self.path();
        let backup_path = backup_path(&path);
        match std::fs::copy(&path, &backup_path) {
            Ok(_) => warn!(
                "Watched list at {:?} is unreadable ({}). Backed it up to {:?} and starting empty.",
                path, error, backup_path
            ),
            Err(backup_err) => warn!(
                "Watched list at {:?} is unreadable ({}) and could not be backed up: {}. Starting empty.",
                path, error, backup_err
            ),
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_models::WatchedMovie;

    fn store_in(dir: &Path) -> WatchedStore {
        WatchedStore::new(LocalStore::new(dir), "watchedMovies")
    }

    fn movie(id: u64, title: &str) -> WatchedMovie {
        WatchedMovie {
            id,
            title: title.to_string(),
            release_date: "1999-03-30".to_string(),
            poster_path: Some("/p.jpg".to_string()),
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(dir.path()).load().is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(store.path(), "").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty_and_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_empty());
        let backup = std::fs::read_to_string(backup_path(&store.path())).unwrap();
        assert_eq!(backup, "{not json");
    }

    #[test]
    fn test_load_invalid_utf8_is_backed_up_before_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(store.path(), [0xff, 0xfe]).unwrap();

        let mut list = store.load();
        assert!(list.is_empty());
        assert_eq!(std::fs::read(backup_path(&store.path())).unwrap(), vec![0xff, 0xfe]);

        list.insert(movie(1, "X"));
        store.save(&list).unwrap();
        assert_eq!(std::fs::read(backup_path(&store.path())).unwrap(), vec![0xff, 0xfe]);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&vec![movie(1, "A")].into()).unwrap();

        // A directory in the temp file's place makes the write fail
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();
        let result = store.save(&vec![movie(1, "A"), movie(2, "B")].into());

        assert!(result.is_err());
        let ids: Vec<u64> = store.load().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_save_then_reload_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let list: WatchedList = vec![movie(1, "X")].into();

        store.save(&list).unwrap();

        let reloaded = store_in(dir.path()).load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded, list);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.save(&vec![movie(1, "A")].into()).unwrap();
        store.save(&vec![movie(1, "A"), movie(2, "B")].into()).unwrap();

        let ids: Vec<u64> = store.load().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_loads_list_written_by_other_clients() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(
            store.path(),
            r#"[{"poster_path":"/x.jpg","title":"X","release_date":"2001-01-01","id":1}]"#,
        )
        .unwrap();

        let list = store.load();
        assert_eq!(list.as_slice(), &[WatchedMovie {
            id: 1,
            title: "X".to_string(),
            release_date: "2001-01-01".to_string(),
            poster_path: Some("/x.jpg".to_string()),
        }]);
    }

    #[test]
    fn test_save_into_missing_directory_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir.path().join("nested").join("data"));
        store.save(&vec![movie(5, "Five")].into()).unwrap();
        assert_eq!(store.load().len(), 1);
    }
}
