pub mod detail;
pub mod search;
pub mod selection;
pub mod watched;

pub use detail::MovieDetail;
pub use search::{SearchResultItem, SearchResults};
pub use selection::{Loadable, Selection};
pub use watched::{WatchedList, WatchedMovie};

/// TMDB movie identifier.
pub type MovieId = u64;
