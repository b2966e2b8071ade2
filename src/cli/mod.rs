pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildArgs, CliArgs, Commands, DetectArgs};
pub use handlers::{handle_build, handle_detect};
pub use output::{OutputFormat, OutputFormatter};
