//! Demo configuration: logging and the values the demo store starts from.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, DemoConfig, LoggingConfig};
