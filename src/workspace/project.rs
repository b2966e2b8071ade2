//! MSBuild project file parsing
//!
//! Source workspaces carry no runtime descriptor; the deployment shape has
//! to be read from the project file instead. This module finds the project
//! file under a root and extracts the runtime version plus the ASP.NET and
//! Node.js signals the detect phase branches on.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Recognized project file extensions, in priority order.
const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

const WEB_SDK: &str = "Microsoft.NET.Sdk.Web";
const ASPNET_FRAMEWORK_REFERENCE: &str = "Microsoft.AspNetCore.App";

/// Project file errors
#[derive(Debug, Error)]
pub enum ProjectError {
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
        source: roxmltree::Error,
    },

    /// Neither `<RuntimeFrameworkVersion>` nor `<TargetFramework>` present.
    #[error("could not find a version in {}", .path.display())]
    MissingVersion { path: PathBuf },

    /// `<TargetFramework>` carries a moniker this engine cannot map to a
    /// runtime version (e.g. .NET Framework monikers like `net472`).
    #[error("unsupported target framework {moniker:?} in {}", .path.display())]
    UnsupportedTargetFramework { path: PathBuf, moniker: String },
}

/// Reader for MSBuild project files.
pub trait ProjectParser {
    /// Finds the project file directly under `root`, if any.
    fn find_project_file(&self, root: &Path) -> Result<Option<PathBuf>, ProjectError>;

    /// Extracts the runtime version the project targets.
    fn parse_version(&self, path: &Path) -> Result<String, ProjectError>;

    /// True when the project needs the ASP.NET Core shared framework.
    fn requires_aspnet(&self, path: &Path) -> Result<bool, ProjectError>;

    /// True when a build step shells out to node or npm.
    fn requires_node(&self, path: &Path) -> Result<bool, ProjectError>;
}

/// Filesystem-backed [`ProjectParser`].
#[derive(Debug, Default)]
pub struct MsBuildProjectParser;

impl MsBuildProjectParser {
    pub fn new() -> Self {
        Self
    }

    fn read_document<'a>(
        &self,
        path: &Path,
        content: &'a str,
    ) -> Result<roxmltree::Document<'a>, ProjectError> {
        roxmltree::Document::parse(content).map_err(|source| ProjectError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_content(&self, path: &Path) -> Result<String, ProjectError> {
        fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn target_framework_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^net(?:coreapp)?(\d+\.\d+)$").unwrap())
}

fn exec_node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:node|npm)\b").unwrap())
}

impl ProjectParser for MsBuildProjectParser {
    fn find_project_file(&self, root: &Path) -> Result<Option<PathBuf>, ProjectError> {
        let entries = fs::read_dir(root).map_err(|source| ProjectError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProjectError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() {
                candidates.push(path);
            }
        }
        // Lexicographic order keeps the pick stable across filesystems.
        candidates.sort();

        for extension in PROJECT_EXTENSIONS {
            if let Some(found) = candidates
                .iter()
                .find(|p| p.extension().is_some_and(|e| e == *extension))
            {
                debug!(path = %found.display(), "found project file");
                return Ok(Some(found.clone()));
            }
        }

        Ok(None)
    }

    fn parse_version(&self, path: &Path) -> Result<String, ProjectError> {
        let content = self.read_content(path)?;
        let document = self.read_document(path, &content)?;

        if let Some(version) = document
            .descendants()
            .find(|n| n.has_tag_name("RuntimeFrameworkVersion"))
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return Ok(version.to_string());
        }

        let moniker = document
            .descendants()
            .find(|n| n.has_tag_name("TargetFramework"))
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ProjectError::MissingVersion {
                path: path.to_path_buf(),
            })?;

        match target_framework_regex().captures(moniker) {
            Some(captures) => Ok(format!("{}.0", &captures[1])),
            None => Err(ProjectError::UnsupportedTargetFramework {
                path: path.to_path_buf(),
                moniker: moniker.to_string(),
            }),
        }
    }

    fn requires_aspnet(&self, path: &Path) -> Result<bool, ProjectError> {
        let content = self.read_content(path)?;
        let document = self.read_document(path, &content)?;

        let web_sdk = document
            .root_element()
            .attribute("Sdk")
            .is_some_and(|sdk| sdk == WEB_SDK);

        let aspnet_reference = document
            .descendants()
            .filter(|n| n.has_tag_name("FrameworkReference"))
            .any(|n| n.attribute("Include") == Some(ASPNET_FRAMEWORK_REFERENCE));

        Ok(web_sdk || aspnet_reference)
    }

    fn requires_node(&self, path: &Path) -> Result<bool, ProjectError> {
        let content = self.read_content(path)?;
        let document = self.read_document(path, &content)?;

        let uses_node = document
            .descendants()
            .filter(|n| n.has_tag_name("Exec"))
            .filter_map(|n| n.attribute("Command"))
            .any(|command| exec_node_regex().is_match(command));

        Ok(uses_node)
    }
}
