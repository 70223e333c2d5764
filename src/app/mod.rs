mod actions;
mod controller;
mod state;

pub use actions::Action;
pub use controller::{App, FetchKind, FetchOutcome, FetchResult};
pub use state::{FetchError, FetchStatus, ViewState};
