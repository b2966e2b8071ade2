use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Buildpack-style launch planner for compiled .NET applications
#[derive(Parser, Debug)]
#[command(
    name = "dotpack",
    about = "Buildpack-style launch planner for compiled .NET applications",
    version,
    author,
    long_about = "dotpack inspects a build workspace to classify a .NET application's \
                  deployment shape, resolves the requirement plan the downstream build \
                  pipeline must satisfy, and synthesizes the launch processes the \
                  resulting container image will expose."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Resolve the requirement plan for a workspace",
        long_about = "Classifies the workspace (published app or source project) and prints \
                      the ordered requirement plan handed to the dependency-resolution \
                      stage. Exits 0 on a match, 100 when the workspace is not a .NET \
                      application, 1 on error.\n\n\
                      Examples:\n  \
                      dotpack detect\n  \
                      dotpack detect /path/to/workspace\n  \
                      dotpack detect --format json"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Synthesize the launch process plan for a workspace",
        long_about = "Resolves the image entrypoint from the published app's runtime \
                      descriptor, optionally wraps it with the live-reload supervisor, \
                      and prints the process plan plus the port-chooser layer descriptor.\n\n\
                      Examples:\n  \
                      dotpack build\n  \
                      dotpack build /path/to/workspace --format json"
    )]
    Build(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the workspace (defaults to current directory)"
    )]
    pub working_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the workspace (defaults to current directory)"
    )]
    pub working_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "/cnb/buildpacks/dotpack",
        help = "Directory holding this buildpack's binaries (port-chooser hook)"
    )]
    pub buildpack_dir: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => Self::Human,
            OutputFormatArg::Json => Self::Json,
        }
    }
}
