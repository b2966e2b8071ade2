//! dotpack - buildpack-style launch planner for compiled .NET applications
//!
//! This library classifies a build workspace's deployment shape and plans
//! what the downstream container-build pipeline must supply and run. It does
//! not install runtimes or execute the application; it produces plans that
//! an external orchestrator consumes.
//!
//! # Core Concepts
//!
//! - **Detect phase**: reads the runtime descriptor (`*.runtimeconfig.json`)
//!   and/or the MSBuild project file and derives an ordered requirement plan
//!   (runtime, SDK, ASP.NET Core, Node.js, ICU, live-reload supervisor) for
//!   the dependency-resolution stage
//! - **Build phase**: resolves the image entrypoint from the runtime
//!   descriptor, optionally wraps it with a file-watching restart
//!   supervisor, and emits the port-chooser hook layer descriptor
//! - **Deployment shapes**: framework-dependent deployments launch through
//!   the `dotnet` host, framework-dependent executables and self-contained
//!   apps launch through their native launcher
//!
//! # Example Usage
//!
//! ```no_run
//! use dotpack::config::BuildConfiguration;
//! use dotpack::detect::{Detection, Detector};
//! use dotpack::workspace::{BuildpackYmlParser, JsonRuntimeConfigParser, MsBuildProjectParser};
//! use std::path::Path;
//!
//! fn plan(workspace: &Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BuildConfiguration::from_env()?;
//!     let detector = Detector::new(
//!         JsonRuntimeConfigParser::new(),
//!         MsBuildProjectParser::new(),
//!         BuildpackYmlParser::new(),
//!     );
//!
//!     match detector.detect(workspace, &config)? {
//!         Detection::Pass(plan) => {
//!             for requirement in &plan.requires {
//!                 println!("{}", requirement);
//!             }
//!         }
//!         Detection::Fail { reason } => println!("skipped: {}", reason),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`detect`]: requirement plan building (detect phase)
//! - [`build`]: process plan building (build phase)
//! - [`workspace`]: runtime descriptor, project file, and buildpack.yml readers
//! - [`plan`]: requirement and process plan data model
//! - [`sdk_version`]: SDK version constraint derivation
//! - [`sbom`]: SBOM generation boundary
//! - [`config`]: environment-derived build configuration

// Public modules
pub mod build;
pub mod cli;
pub mod config;
pub mod detect;
pub mod plan;
pub mod sbom;
pub mod sdk_version;
pub mod workspace;

// Re-export key types for convenient access
pub use build::{BuildError, Builder};
pub use config::{BuildConfiguration, ConfigError};
pub use detect::{DetectError, Detection, Detector};
pub use plan::{BuildPlan, BuildResult, LaunchProcess, LayerSpec, Requirement};
pub use sbom::{SbomDocument, SbomGenerator, WorkspaceSbomGenerator};
pub use sdk_version::sdk_constraint;
pub use workspace::{
    BuildpackYmlParser, JsonRuntimeConfigParser, MsBuildProjectParser, RuntimeConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
