pub mod commands;
pub mod headless_mode;
pub mod messages;
pub mod setup;

pub use headless_mode::{HeadlessOptions, run_headless_mode};
pub use setup::{SessionData, setup_session};
