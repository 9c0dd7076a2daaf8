pub mod cancel;
pub mod controller;
pub mod display;
pub mod error;
pub mod store;

pub use controller::{AddOutcome, AppController, ControllerOptions, StateChange, ViewState};
pub use display::{DisplayPolicy, PosterSource};
pub use error::StorageError;
pub use store::{LocalStore, WatchedStore};
