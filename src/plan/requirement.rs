//! Requirement plan types
//!
//! A requirement names a capability the downstream pipeline must supply
//! (`icu`, `dotnet-runtime`, `dotnet-sdk`, `dotnet-aspnetcore`,
//! `dotnet-application`, `node`, `watchexec`) together with optional version
//! metadata. Names are not unique within a plan: a runtimeconfig-sourced and
//! a project-sourced requirement for the same capability may both appear, and
//! merging them is the consuming orchestrator's responsibility. Order is
//! significant and preserved exactly as built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional metadata attached to a requirement.
///
/// Only the recognized fields exist; an absent field serializes as absent
/// rather than as an empty-string or `false` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMetadata {
    /// Exact version or version constraint (e.g. "6.0.3", "6.0.*").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Which artifact the version was read from (e.g. "runtimeconfig.json",
    /// "app.csproj").
    #[serde(rename = "version-source", skip_serializing_if = "Option::is_none")]
    pub version_source: Option<String>,

    /// Whether the capability must be present in the launch image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch: Option<bool>,
}

/// A single named requirement in the build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,

    #[serde(default)]
    pub metadata: RequirementMetadata,
}

impl Requirement {
    /// A launch-time requirement with no version constraint.
    pub fn launch(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: RequirementMetadata {
                launch: Some(true),
                ..Default::default()
            },
        }
    }

    /// A launch-time requirement with a version and its source artifact.
    pub fn launch_versioned(name: &str, version: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: RequirementMetadata {
                version: Some(version.to_string()),
                version_source: Some(source.to_string()),
                launch: Some(true),
            },
        }
    }

    /// A build-time requirement with a version and its source artifact.
    pub fn build_versioned(name: &str, version: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: RequirementMetadata {
                version: Some(version.to_string()),
                version_source: Some(source.to_string()),
                launch: None,
            },
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ref version) = self.metadata.version {
            write!(f, " {}", version)?;
        }
        if let Some(ref source) = self.metadata.version_source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

/// The ordered requirement plan produced by the detect phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub requires: Vec<Requirement>,
}

impl BuildPlan {
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty()
    }

    /// Names of all requirements, in plan order.
    pub fn names(&self) -> Vec<&str> {
        self.requires.iter().map(|r| r.name.as_str()).collect()
    }
}
