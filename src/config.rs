//! Build configuration
//!
//! All environment-derived toggles are read exactly once, at process entry,
//! into an immutable [`BuildConfiguration`] that is passed into the detect
//! and build engines. Neither engine performs ambient environment lookups.
//!
//! # Environment Variables
//!
//! - `BP_LIVE_RELOAD_ENABLED`: wrap the launch command with a file-watching
//!   restart supervisor (true|false) - default: false
//! - `BP_DEBUG_ENABLED`: configure the launch environment for development
//!   mode (true|false) - default: false
//! - `BP_DOTNET_PROJECT_PATH`: sub-path of the workspace holding the .NET
//!   project; falls back to the legacy buildpack.yml lookup when unset

use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A boolean toggle carried an unparseable value.
    #[error("failed to parse {var}: invalid boolean value {value:?}")]
    InvalidToggle { var: String, value: String },
}

/// Immutable build-time configuration shared by both phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Wrap the primary launch command with a restart-on-change supervisor.
    pub live_reload_enabled: bool,

    /// Carry a development-mode environment default on the hook layer.
    pub debug_enabled: bool,

    /// Workspace sub-path holding the project, when overridden.
    pub project_path: Option<String>,
}

impl BuildConfiguration {
    /// Reads the configuration from the process environment.
    ///
    /// A malformed boolean toggle is a hard error; the phase must not run
    /// with a half-understood configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            live_reload_enabled: parse_toggle("BP_LIVE_RELOAD_ENABLED")?,
            debug_enabled: parse_toggle("BP_DEBUG_ENABLED")?,
            project_path: env::var("BP_DOTNET_PROJECT_PATH")
                .ok()
                .filter(|p| !p.is_empty()),
        })
    }
}

fn parse_toggle(var: &str) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse::<bool>().map_err(|_| ConfigError::InvalidToggle {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(false),
    }
}
