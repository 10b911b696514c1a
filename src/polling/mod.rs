pub mod controller;
pub mod fallback;
pub mod fetch;

pub use controller::{
    DataSource, PollingController, PollingError, PollingHandle, WidgetPhase, WidgetState,
};
pub use fallback::{DisplayState, FallbackPolicy};
pub use fetch::{ErrorKind, FetchFailure, Fetcher};
