//! Plan data model
//!
//! The two produced interfaces of the engine: the requirement plan handed to
//! the dependency-resolution stage after detection, and the process plan plus
//! layer descriptor handed to the image-entrypoint stage after build.

pub mod process;
pub mod requirement;

pub use process::{BuildResult, LaunchProcess, LayerSpec, ProcessPlan};
pub use requirement::{BuildPlan, Requirement, RequirementMetadata};
