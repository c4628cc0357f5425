use serde::{Deserialize, Serialize};

use crate::demo::Theme;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive (default: "info").
    /// The `DUNK_LOG` environment variable takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Install the action-logging middleware (default: true).
    #[serde(default = "default_log_actions")]
    pub log_actions: bool,
}

/// Values the demo scenario starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Theme applied before the scenario runs (default: light).
    #[serde(default)]
    pub theme: Theme,
    /// Whether the demo pretends to run in a browser (default: true).
    #[serde(default = "default_is_browser")]
    pub is_browser: bool,
    /// Username passed to the sign-in effect (default: "testUser").
    #[serde(default = "default_username")]
    pub username: String,
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_log_actions() -> bool {
    true
}

fn default_is_browser() -> bool {
    true
}

fn default_username() -> String {
    "testUser".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            log_actions: default_log_actions(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            is_browser: default_is_browser(),
            username: default_username(),
        }
    }
}
