//! Configuration from the environment.
//!
//! `.env` files are honored. Recognized variables:
//!
//! | variable | default |
//! |---|---|
//! | `OCDS_MAPPER_HTTP_TIMEOUT_SECS` | `30` |
//! | `OCDS_MAPPER_USER_AGENT` | `ocds-mapper/<version>` |
//! | `OCDS_MAPPER_QUIET` | `false` |

use std::env;
use std::time::Duration;

use crate::logs::log_warning;

pub const HTTP_TIMEOUT_VAR: &str = "OCDS_MAPPER_HTTP_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "OCDS_MAPPER_USER_AGENT";
pub const QUIET_VAR: &str = "OCDS_MAPPER_QUIET";

/// Default timeout for URL sources.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for loading mapping and CSV sources.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub http_timeout: Duration,
    pub user_agent: String,
    pub quiet: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: format!("ocds-mapper/{}", env!("CARGO_PKG_VERSION")),
            quiet: false,
        }
    }
}

impl LoaderConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`; invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(HTTP_TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => log_warning(format!(
                    "Ignoring {}={:?}, expected a positive number of seconds",
                    HTTP_TIMEOUT_VAR, raw
                )),
            }
        }

        if let Some(agent) = lookup(USER_AGENT_VAR).filter(|a| !a.trim().is_empty()) {
            config.user_agent = agent;
        }

        if let Some(raw) = lookup(QUIET_VAR) {
            match parse_flag(&raw) {
                Some(quiet) => config.quiet = quiet,
                None => log_warning(format!("Ignoring {}={:?}, expected true or false", QUIET_VAR, raw)),
            }
        }

        config
    }

    /// Set the HTTP timeout
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
