//! Workspace readers
//!
//! Parsers for the build-time artifacts the engine inspects: the
//! `*.runtimeconfig.json` runtime descriptor, the MSBuild project file, and
//! the legacy `buildpack.yml` configuration. The planning logic consumes
//! these only through their traits so it stays testable without a
//! filesystem.

pub mod buildpack_yml;
pub mod project;
pub mod runtime_config;

pub use buildpack_yml::{BuildpackYmlError, BuildpackYmlParser, ProjectPathParser};
pub use project::{MsBuildProjectParser, ProjectError, ProjectParser};
pub use runtime_config::{JsonRuntimeConfigParser, RuntimeConfig, RuntimeConfigError, RuntimeConfigParser};
