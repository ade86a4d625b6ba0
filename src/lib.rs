// Library surface for the binary, headless integration tests and reuse.
// The terminal UI lives with the binary in main.rs.
pub mod app_dirs;
pub mod config;
pub mod driver;
pub mod error;
pub mod history;
pub mod language;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod time_series;
pub mod typing_policy;

pub use driver::SessionDriver;
pub use error::{Error, Result};
pub use session::{Phase, Session, SessionConfig, Transition};
