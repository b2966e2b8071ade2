//! Runtime descriptor parsing
//!
//! A published .NET application carries an `<AppName>.runtimeconfig.json`
//! next to its assemblies describing which shared frameworks it needs at
//! run time. This module locates and parses that descriptor into the
//! [`RuntimeConfig`] the planners consume.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const RUNTIME_CONFIG_SUFFIX: &str = ".runtimeconfig.json";

const NETCORE_FRAMEWORK: &str = "Microsoft.NETCore.App";
const ASPNET_FRAMEWORK: &str = "Microsoft.AspNetCore.App";
const ASPNET_ALL_FRAMEWORK: &str = "Microsoft.AspNetCore.All";

/// Runtime descriptor errors
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    /// No descriptor exists under the root. Callers distinguish this from
    /// real failures: during detection an absent descriptor is a normal
    /// branch, during build it is fatal.
    #[error("no *.runtimeconfig.json found in {}", .root.display())]
    NotFound { root: PathBuf },

    /// More than one descriptor matched; picking one silently would make
    /// detection order-dependent on the filesystem.
    #[error("multiple *.runtimeconfig.json files present: {}", .files.join(", "))]
    Multiple { files: Vec<String> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RuntimeConfigError {
    /// True when the error only says "no descriptor here".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeConfigError::NotFound { .. })
    }
}

/// Parsed runtime descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Shared runtime version the app was published against.
    pub runtime_version: Option<String>,

    /// ASP.NET Core shared-framework version, when referenced.
    pub aspnet_version: Option<String>,

    /// Application name, from the descriptor file's base name.
    pub app_name: String,

    /// True when a native launcher named after the app sits next to the
    /// descriptor (framework-dependent executable or self-contained app).
    pub executable: bool,

    /// Path of the descriptor file itself.
    pub path: PathBuf,
}

/// Reader for the runtime descriptor.
pub trait RuntimeConfigParser {
    /// Locates and parses the `*.runtimeconfig.json` under `root`.
    fn parse(&self, root: &Path) -> Result<RuntimeConfig, RuntimeConfigError>;
}

#[derive(Debug, Deserialize, Default)]
struct RawRuntimeConfig {
    #[serde(rename = "runtimeOptions", default)]
    runtime_options: RawRuntimeOptions,
}

#[derive(Debug, Deserialize, Default)]
struct RawRuntimeOptions {
    #[serde(default)]
    framework: Option<RawFramework>,

    #[serde(default)]
    frameworks: Vec<RawFramework>,
}

#[derive(Debug, Deserialize, Default)]
struct RawFramework {
    #[serde(default)]
    name: String,

    #[serde(default)]
    version: String,
}

/// Filesystem-backed [`RuntimeConfigParser`].
#[derive(Debug, Default)]
pub struct JsonRuntimeConfigParser;

impl JsonRuntimeConfigParser {
    pub fn new() -> Self {
        Self
    }

    fn locate(&self, root: &Path) -> Result<PathBuf, RuntimeConfigError> {
        let entries = fs::read_dir(root).map_err(|source| RuntimeConfigError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RuntimeConfigError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_match = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(RUNTIME_CONFIG_SUFFIX))
                && path.is_file();
            if is_match {
                matches.push(path);
            }
        }
        matches.sort();

        match matches.len() {
            0 => Err(RuntimeConfigError::NotFound {
                root: root.to_path_buf(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(RuntimeConfigError::Multiple {
                files: matches
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            }),
        }
    }
}

impl RuntimeConfigParser for JsonRuntimeConfigParser {
    fn parse(&self, root: &Path) -> Result<RuntimeConfig, RuntimeConfigError> {
        let path = self.locate(root)?;
        debug!(path = %path.display(), "parsing runtime descriptor");

        let content = fs::read_to_string(&path).map_err(|source| RuntimeConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: RawRuntimeConfig =
            serde_json::from_str(&content).map_err(|source| RuntimeConfigError::Malformed {
                path: path.clone(),
                source,
            })?;

        let app_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.trim_end_matches(RUNTIME_CONFIG_SUFFIX).to_string())
            .unwrap_or_default();

        let mut config = RuntimeConfig {
            app_name: app_name.clone(),
            executable: launcher_exists(root, &app_name),
            path: path.clone(),
            ..Default::default()
        };

        let frameworks = raw
            .runtime_options
            .framework
            .into_iter()
            .chain(raw.runtime_options.frameworks);
        for framework in frameworks {
            if framework.version.is_empty() {
                continue;
            }
            match framework.name.as_str() {
                NETCORE_FRAMEWORK => {
                    config.runtime_version = Some(framework.version);
                }
                // An ASP.NET shared-framework reference implies the runtime.
                ASPNET_FRAMEWORK | ASPNET_ALL_FRAMEWORK => {
                    config.runtime_version = Some(framework.version.clone());
                    config.aspnet_version = Some(framework.version);
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn launcher_exists(root: &Path, app_name: &str) -> bool {
    if app_name.is_empty() {
        return false;
    }

    let launcher = root.join(app_name);
    match fs::metadata(&launcher) {
        Ok(metadata) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
            }
            #[cfg(not(unix))]
            {
                metadata.is_file()
            }
        }
        Err(_) => false,
    }
}
