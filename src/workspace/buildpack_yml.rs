//! Legacy buildpack.yml configuration
//!
//! Older workspaces pin the project location in a `buildpack.yml` instead of
//! the `BP_DOTNET_PROJECT_PATH` environment variable:
//!
//! ```yaml
//! dotnet-build:
//!   project-path: src/my-app
//! ```
//!
//! The environment variable always wins; this file is only consulted when it
//! is unset.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// buildpack.yml errors
#[derive(Debug, Error)]
pub enum BuildpackYmlError {
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
        source: serde_yaml::Error,
    },
}

/// Reader for the legacy project-path override.
pub trait ProjectPathParser {
    /// Returns the configured project sub-path, if the file exists and
    /// carries one.
    fn parse_project_path(&self, path: &Path) -> Result<Option<String>, BuildpackYmlError>;
}

#[derive(Debug, Deserialize, Default)]
struct RawBuildpackYml {
    #[serde(rename = "dotnet-build", default)]
    dotnet_build: Option<RawDotnetBuild>,
}

#[derive(Debug, Deserialize, Default)]
struct RawDotnetBuild {
    #[serde(rename = "project-path", default)]
    project_path: Option<String>,
}

/// Filesystem-backed [`ProjectPathParser`].
#[derive(Debug, Default)]
pub struct BuildpackYmlParser;

impl BuildpackYmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectPathParser for BuildpackYmlParser {
    fn parse_project_path(&self, path: &Path) -> Result<Option<String>, BuildpackYmlError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(BuildpackYmlError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let raw: RawBuildpackYml =
            serde_yaml::from_str(&content).map_err(|source| BuildpackYmlError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(raw
            .dotnet_build
            .and_then(|b| b.project_path)
            .filter(|p| !p.is_empty()))
    }
}
