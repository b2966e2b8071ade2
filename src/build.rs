//! Build phase: process plan building
//!
//! Re-reads the runtime descriptor, resolves the image's entrypoint (native
//! launcher for FDE/self-contained apps, `dotnet <dll>` for framework-
//! dependent deployments), optionally wraps it with the live-reload
//! supervisor, and emits the port-chooser hook layer descriptor.

use crate::config::BuildConfiguration;
use crate::plan::{BuildResult, LaunchProcess, LayerSpec};
use crate::sbom::{SbomError, SbomGenerator};
use crate::workspace::{RuntimeConfig, RuntimeConfigError, RuntimeConfigParser};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

const PORT_CHOOSER_LAYER: &str = "port-chooser";
const DEVELOPMENT_ENV_VAR: &str = "ASPNETCORE_ENVIRONMENT";

/// Build phase errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to find *.runtimeconfig.json: {0}")]
    RuntimeConfig(#[source] RuntimeConfigError),

    /// The descriptor says the app launches through the runtime host, but
    /// the assembly it should host is gone.
    #[error("no entrypoint [{dll}] found")]
    MissingEntrypoint { dll: String },

    #[error("failed to stat {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to grant group access to {}: {source}", .path.display())]
    PermissionWalk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error(transparent)]
    Sbom(#[from] SbomError),
}

/// Process plan builder.
pub struct Builder<R, S> {
    runtime_config_parser: R,
    sbom_generator: S,
}

impl<R, S> Builder<R, S>
where
    R: RuntimeConfigParser,
    S: SbomGenerator,
{
    pub fn new(runtime_config_parser: R, sbom_generator: S) -> Self {
        Self {
            runtime_config_parser,
            sbom_generator,
        }
    }

    /// Produces the final process plan and layer descriptors for the image.
    ///
    /// `buildpack_dir` is where this buildpack's own binaries live; the
    /// port-chooser hook is referenced from its `bin/` directory.
    pub fn build(
        &self,
        working_dir: &Path,
        buildpack_dir: &Path,
        config: &BuildConfiguration,
    ) -> Result<BuildResult, BuildError> {
        let runtime_config = self
            .runtime_config_parser
            .parse(working_dir)
            .map_err(BuildError::RuntimeConfig)?;

        info!(root = %working_dir.display(), "generating SBOM");
        let started = Instant::now();
        let sbom = self.sbom_generator.generate(working_dir)?;
        info!(duration = ?started.elapsed(), "SBOM generation completed");

        let (command, args) = self.resolve_entrypoint(working_dir, &runtime_config)?;

        let mut processes = vec![LaunchProcess {
            r#type: runtime_config.app_name.clone(),
            command: command.clone(),
            args: args.clone(),
            default: true,
            direct: true,
        }];

        if config.live_reload_enabled {
            processes = reload_processes(&runtime_config.app_name, working_dir, &command, &args);
            grant_group_access(working_dir)?;
        }

        for process in &processes {
            debug!(process = %process, default = process.default, "planned launch process");
        }

        let mut port_chooser = LayerSpec::new(PORT_CHOOSER_LAYER);
        port_chooser.launch = true;
        port_chooser
            .exec_d
            .push(buildpack_dir.join("bin").join("port-chooser"));

        if config.debug_enabled {
            port_chooser
                .launch_env
                .insert(DEVELOPMENT_ENV_VAR.to_string(), "Development".to_string());
        }

        Ok(BuildResult {
            processes,
            layers: vec![port_chooser],
            sbom,
        })
    }

    fn resolve_entrypoint(
        &self,
        working_dir: &Path,
        runtime_config: &RuntimeConfig,
    ) -> Result<(String, Vec<String>), BuildError> {
        let launcher = working_dir.join(&runtime_config.app_name);

        if runtime_config.executable {
            return Ok((launcher.display().to_string(), Vec::new()));
        }

        let dll_name = format!("{}.dll", runtime_config.app_name);
        let dll = working_dir.join(&dll_name);
        match std::fs::metadata(&dll) {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(BuildError::MissingEntrypoint { dll: dll_name });
            }
            Err(source) => {
                return Err(BuildError::Io { path: dll, source });
            }
        }

        Ok(("dotnet".to_string(), vec![dll.display().to_string()]))
    }
}

fn reload_processes(
    app_name: &str,
    working_dir: &Path,
    command: &str,
    args: &[String],
) -> Vec<LaunchProcess> {
    let mut watch_args = vec![
        "--restart".to_string(),
        "--watch".to_string(),
        working_dir.display().to_string(),
        "--shell".to_string(),
        "none".to_string(),
        "--".to_string(),
        command.to_string(),
    ];
    watch_args.extend(args.iter().cloned());

    vec![
        LaunchProcess {
            r#type: format!("reload-{}", app_name),
            command: "watchexec".to_string(),
            args: watch_args,
            default: true,
            direct: true,
        },
        // Unwrapped process for operators who want to bypass the reload
        // supervisor.
        LaunchProcess {
            r#type: app_name.to_string(),
            command: command.to_string(),
            args: args.to_vec(),
            default: false,
            direct: true,
        },
    ]
}

/// Grants group read/write on every entry under `working_dir`.
///
/// The reload supervisor runs as a different user in the app's group and has
/// to both watch and touch what the build wrote. Re-applying the bits is
/// safe; the walk sees every entry, hidden files included.
fn grant_group_access(working_dir: &Path) -> Result<(), BuildError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let walker = ignore::WalkBuilder::new(working_dir)
            .hidden(false)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(|source| BuildError::Walk {
                path: working_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path == working_dir {
                continue;
            }

            let metadata =
                std::fs::metadata(path).map_err(|source| BuildError::PermissionWalk {
                    path: path.to_path_buf(),
                    source,
                })?;
            let mut permissions = metadata.permissions();
            permissions.set_mode(permissions.mode() | 0o060);
            std::fs::set_permissions(path, permissions).map_err(|source| {
                BuildError::PermissionWalk {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
    }

    Ok(())
}
