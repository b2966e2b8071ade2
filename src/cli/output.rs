//! Output formatting for detect and build results
//!
//! JSON output goes to stdout unchanged so the orchestrator can consume it;
//! human output is a compact summary for interactive runs.

use anyhow::Result;
use std::fmt::Write as _;

use crate::plan::{BuildPlan, BuildResult};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for plan results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the detect-phase requirement plan.
    pub fn format_plan(&self, plan: &BuildPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
            OutputFormat::Human => Ok(self.format_plan_human(plan)),
        }
    }

    /// Formats the build-phase result.
    pub fn format_build(&self, result: &BuildResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Human => Ok(self.format_build_human(result)),
        }
    }

    fn format_plan_human(&self, plan: &BuildPlan) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Requirements:");
        for requirement in &plan.requires {
            let launch = if requirement.metadata.launch == Some(true) {
                " [launch]"
            } else {
                ""
            };
            let _ = writeln!(out, "  {}{}", requirement, launch);
        }
        out
    }

    fn format_build_human(&self, result: &BuildResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Launch processes:");
        for process in &result.processes {
            let default = if process.default { " (default)" } else { "" };
            let _ = writeln!(out, "  {}{}", process, default);
        }

        let _ = writeln!(out, "Layers:");
        for layer in &result.layers {
            let launch = if layer.launch { " [launch]" } else { "" };
            let _ = writeln!(out, "  {}{}", layer.name, launch);
            for hook in &layer.exec_d {
                let _ = writeln!(out, "    exec.d: {}", hook.display());
            }
            for (key, value) in &layer.launch_env {
                let _ = writeln!(out, "    env: {}={}", key, value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{LaunchProcess, LayerSpec, Requirement};
    use crate::sbom::SbomDocument;
    use chrono::Utc;
    use std::path::PathBuf;

    fn sample_plan() -> BuildPlan {
        BuildPlan {
            requires: vec![
                Requirement::launch("icu"),
                Requirement::build_versioned("dotnet-sdk", "6.0.*", "runtimeconfig.json"),
            ],
        }
    }

    fn sample_build_result() -> BuildResult {
        let mut layer = LayerSpec::new("port-chooser");
        layer.launch = true;
        layer.exec_d.push(PathBuf::from("/cnb/bin/port-chooser"));

        BuildResult {
            processes: vec![LaunchProcess {
                r#type: "my-app".to_string(),
                command: "dotnet".to_string(),
                args: vec!["/workspace/my-app.dll".to_string()],
                default: true,
                direct: true,
            }],
            layers: vec![layer],
            sbom: SbomDocument {
                serial_number: "urn:uuid:test".to_string(),
                created: Utc::now(),
                source: PathBuf::from("/workspace"),
                artifacts: Vec::new(),
            },
        }
    }

    #[test]
    fn test_human_plan_marks_launch_requirements() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_plan(&sample_plan()).unwrap();

        assert!(output.contains("icu [launch]"));
        assert!(output.contains("dotnet-sdk 6.0.* (runtimeconfig.json)"));
        assert!(!output.contains("dotnet-sdk 6.0.* (runtimeconfig.json) [launch]"));
    }

    #[test]
    fn test_json_plan_round_trips() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_plan(&sample_plan()).unwrap();

        let parsed: BuildPlan = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, sample_plan());
    }

    #[test]
    fn test_human_build_lists_processes_and_layers() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_build(&sample_build_result()).unwrap();

        assert!(output.contains("my-app: dotnet /workspace/my-app.dll (default)"));
        assert!(output.contains("port-chooser [launch]"));
        assert!(output.contains("exec.d: /cnb/bin/port-chooser"));
    }
}
