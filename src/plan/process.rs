//! Process plan and layer descriptor types
//!
//! The build phase produces an ordered list of launchable process
//! definitions plus a descriptor for the port-chooser hook layer. Both are
//! consumed by the orchestrator when it configures the image's entrypoint
//! table; the layer mechanics themselves live outside this engine.

use crate::sbom::SbomDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A single launchable process definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchProcess {
    /// Process type identifier (e.g. "my-app", "reload-my-app").
    #[serde(rename = "type")]
    pub r#type: String,

    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Whether this is the image's default process.
    #[serde(default)]
    pub default: bool,

    /// Direct processes bypass the shell.
    #[serde(default)]
    pub direct: bool,
}

impl fmt::Display for LaunchProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.r#type, self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The ordered process plan produced by the build phase.
pub type ProcessPlan = Vec<LaunchProcess>;

/// Descriptor for a launch-time hook layer.
///
/// The engine only decides whether the layer is launch-active and which
/// environment defaults it carries; attaching the layer to the image is the
/// orchestrator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,

    /// Layer contents are available at launch time.
    pub launch: bool,

    /// Executables run by the launcher before the process starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exec_d: Vec<PathBuf>,

    /// Environment variable defaults applied at launch.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub launch_env: BTreeMap<String, String>,
}

impl LayerSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Everything the build phase hands back to the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub processes: ProcessPlan,
    pub layers: Vec<LayerSpec>,
    pub sbom: SbomDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_display_includes_args() {
        let process = LaunchProcess {
            r#type: "my-app".to_string(),
            command: "dotnet".to_string(),
            args: vec!["/workspace/my-app.dll".to_string()],
            default: true,
            direct: true,
        };
        assert_eq!(process.to_string(), "my-app: dotnet /workspace/my-app.dll");
    }

    #[test]
    fn test_process_serializes_type_key() {
        let process = LaunchProcess {
            r#type: "my-app".to_string(),
            command: "/workspace/my-app".to_string(),
            args: vec![],
            default: true,
            direct: true,
        };
        let json = serde_json::to_value(&process).unwrap();
        assert_eq!(json["type"], "my-app");
        assert!(json.get("args").is_none());
    }

    #[test]
    fn test_layer_spec_defaults_are_empty() {
        let layer = LayerSpec::new("port-chooser");
        assert_eq!(layer.name, "port-chooser");
        assert!(!layer.launch);
        assert!(layer.exec_d.is_empty());
        assert!(layer.launch_env.is_empty());
    }
}
