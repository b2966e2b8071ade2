//! SBOM generation boundary
//!
//! The build phase reports a software bill of materials for the packaged
//! workspace. Extracting dependency data out of compiled assemblies is the
//! job of an external scanner; this module only fixes the interface the
//! build phase drives and the document shape handed to the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// SBOM errors
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single cataloged artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomArtifact {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The bill-of-materials document attached to the build result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbomDocument {
    /// Unique serial number for this document.
    pub serial_number: String,

    pub created: DateTime<Utc>,

    /// Root that was scanned.
    pub source: PathBuf,

    #[serde(default)]
    pub artifacts: Vec<SbomArtifact>,
}

/// Generator invoked once per build against the workspace root.
pub trait SbomGenerator {
    fn generate(&self, path: &Path) -> Result<SbomDocument, SbomError>;
}

/// Default generator: records the scanned root without cataloging the
/// compiled assemblies (that analysis runs in the external scanner).
#[derive(Debug, Default)]
pub struct WorkspaceSbomGenerator;

impl WorkspaceSbomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SbomGenerator for WorkspaceSbomGenerator {
    fn generate(&self, path: &Path) -> Result<SbomDocument, SbomError> {
        // The scan root must at least exist; everything deeper belongs to
        // the external scanner.
        fs::metadata(path).map_err(|source| SbomError::Scan {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(SbomDocument {
            serial_number: format!("urn:uuid:{}", Uuid::new_v4()),
            created: Utc::now(),
            source: path.to_path_buf(),
            artifacts: Vec::new(),
        })
    }
}
