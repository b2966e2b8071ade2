//! Detect phase: requirement plan building
//!
//! Classifies the workspace (framework-dependent deployment, framework-
//! dependent executable, self-contained app, or source project) and derives
//! the ordered list of requirements the downstream dependency-resolution
//! stage must satisfy. The decision tree runs over the workspace reader
//! traits, so it is fully unit-testable with fakes.
//!
//! Requirement order is part of the contract: ICU first, then the optional
//! live-reload supervisor, then runtimeconfig-derived requirements, then
//! project-derived requirements. Consumers assert on exact list order.

use crate::config::BuildConfiguration;
use crate::plan::{BuildPlan, Requirement, RequirementMetadata};
use crate::sdk_version::sdk_constraint;
use crate::workspace::{
    BuildpackYmlError, ProjectError, ProjectParser, ProjectPathParser, RuntimeConfigError,
    RuntimeConfigParser,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Version-source label for requirements read from the runtime descriptor.
const RUNTIME_CONFIG_SOURCE: &str = "runtimeconfig.json";

/// Detect phase errors
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to parse buildpack.yml: {0}")]
    BuildpackYml(#[from] BuildpackYmlError),

    #[error(transparent)]
    RuntimeConfig(RuntimeConfigError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Outcome of the detect phase.
///
/// A workspace that simply does not match (no runtime descriptor, no project
/// file) is a normal negative result, not a failure; the orchestrator skips
/// this builder and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Pass(BuildPlan),
    Fail { reason: String },
}

impl Detection {
    pub fn plan(&self) -> Option<&BuildPlan> {
        match self {
            Detection::Pass(plan) => Some(plan),
            Detection::Fail { .. } => None,
        }
    }
}

/// Requirement plan builder.
pub struct Detector<R, P, B> {
    runtime_config_parser: R,
    project_parser: P,
    buildpack_yml_parser: B,
}

impl<R, P, B> Detector<R, P, B>
where
    R: RuntimeConfigParser,
    P: ProjectParser,
    B: ProjectPathParser,
{
    pub fn new(runtime_config_parser: R, project_parser: P, buildpack_yml_parser: B) -> Self {
        Self {
            runtime_config_parser,
            project_parser,
            buildpack_yml_parser,
        }
    }

    /// Runs the detection decision tree against `working_dir`.
    pub fn detect(
        &self,
        working_dir: &Path,
        config: &BuildConfiguration,
    ) -> Result<Detection, DetectError> {
        let root = self.resolve_root(working_dir, config)?;
        debug!(root = %root.display(), "detecting .NET workspace");

        let mut requires = vec![Requirement::launch("icu")];

        if config.live_reload_enabled {
            requires.push(Requirement::launch("watchexec"));
        }

        let runtime_config = match self.runtime_config_parser.parse(&root) {
            Ok(config) => Some(config),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(DetectError::RuntimeConfig(err)),
        };

        // FDE + FDD cases
        if let Some(runtime_config) = &runtime_config {
            if let Some(runtime_version) = &runtime_config.runtime_version {
                debug!(
                    version = %runtime_version,
                    executable = runtime_config.executable,
                    "runtime descriptor carries a version"
                );
                requires.push(Requirement::launch_versioned(
                    "dotnet-runtime",
                    runtime_version,
                    RUNTIME_CONFIG_SOURCE,
                ));

                // The SDK is only needed when there is no native launcher
                // (FDD case only).
                if !runtime_config.executable {
                    requires.push(Requirement::build_versioned(
                        "dotnet-sdk",
                        &sdk_constraint(runtime_version),
                        RUNTIME_CONFIG_SOURCE,
                    ));
                }

                if let Some(aspnet_version) = &runtime_config.aspnet_version {
                    requires.push(Requirement::launch_versioned(
                        "dotnet-aspnetcore",
                        aspnet_version,
                        RUNTIME_CONFIG_SOURCE,
                    ));
                }
            }
        }

        let project_file = self.project_parser.find_project_file(&root)?;

        if runtime_config.is_none() && project_file.is_none() {
            return Ok(Detection::Fail {
                reason: "no *.runtimeconfig.json or project file found".to_string(),
            });
        }

        if let Some(project_file) = project_file {
            self.require_from_project(&project_file, &mut requires)?;
        }

        Ok(Detection::Pass(BuildPlan { requires }))
    }

    fn resolve_root(
        &self,
        working_dir: &Path,
        config: &BuildConfiguration,
    ) -> Result<PathBuf, DetectError> {
        let project_path = match &config.project_path {
            Some(path) => Some(path.clone()),
            None => self
                .buildpack_yml_parser
                .parse_project_path(&working_dir.join("buildpack.yml"))?,
        };

        Ok(match project_path {
            Some(path) => working_dir.join(path),
            None => working_dir.to_path_buf(),
        })
    }

    fn require_from_project(
        &self,
        project_file: &Path,
        requires: &mut Vec<Requirement>,
    ) -> Result<(), DetectError> {
        let version = self.project_parser.parse_version(project_file)?;
        let source = project_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(project = %source, version = %version, "deriving requirements from project file");

        requires.push(Requirement::launch("dotnet-application"));
        requires.push(Requirement::launch_versioned(
            "dotnet-runtime",
            &version,
            &source,
        ));
        requires.push(Requirement::build_versioned(
            "dotnet-sdk",
            &sdk_constraint(&version),
            &source,
        ));

        if self.project_parser.requires_aspnet(project_file)? {
            requires.push(Requirement::launch_versioned(
                "dotnet-aspnetcore",
                &version,
                &source,
            ));
        }

        if self.project_parser.requires_node(project_file)? {
            requires.push(Requirement {
                name: "node".to_string(),
                metadata: RequirementMetadata {
                    version: None,
                    version_source: Some(source),
                    launch: Some(true),
                },
            });
        }

        Ok(())
    }
}
