use serde::Serialize;
use crate::MovieId;

/// Which movie the detail panel is showing, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Selected(MovieId),
}

impl Selection {
    /// Select `id`, or clear the selection when `id` is already selected.
    pub fn toggle(&mut self, id: MovieId) {
        *self = match *self {
            Selection::Selected(current) if current == id => Selection::None,
            _ => Selection::Selected(id),
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    pub fn id(&self) -> Option<MovieId> {
        match self {
            Selection::Selected(id) => Some(*id),
            Selection::None => None,
        }
    }

    pub fn is_selected(&self, id: MovieId) -> bool {
        self.id() == Some(id)
    }
}

/// A remote value that may not have been requested yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Loadable<T> {
    NotLoaded,
    Loading,
    Loaded(T),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::NotLoaded
    }
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_id_twice_clears() {
        let mut selection = Selection::None;
        selection.toggle(42);
        assert_eq!(selection, Selection::Selected(42));
        selection.toggle(42);
        assert_eq!(selection, Selection::None);
    }

    #[test]
    fn test_toggle_different_id_switches() {
        let mut selection = Selection::Selected(1);
        selection.toggle(2);
        assert_eq!(selection, Selection::Selected(2));
        assert!(selection.is_selected(2));
        assert!(!selection.is_selected(1));
    }

    #[test]
    fn test_loadable_accessors() {
        let loading: Loadable<u32> = Loadable::Loading;
        assert!(loading.is_loading());
        assert_eq!(loading.loaded(), None);

        let loaded = Loadable::Loaded(5);
        assert_eq!(loaded.loaded(), Some(&5));
        assert_eq!(Loadable::<u32>::NotLoaded.loaded(), None);
    }
}
