//! Command handlers
//!
//! Each handler wires the filesystem-backed parsers and the configuration
//! into an engine, runs it, and maps the outcome to a process exit code.
//! Detect follows the buildpack lifecycle convention: 0 for a match, 100
//! for "this workspace is not ours", 1 for an actual failure.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::{error, info};

use crate::build::Builder;
use crate::cli::commands::{BuildArgs, DetectArgs};
use crate::cli::output::OutputFormatter;
use crate::config::BuildConfiguration;
use crate::detect::{Detection, Detector};
use crate::sbom::WorkspaceSbomGenerator;
use crate::workspace::{BuildpackYmlParser, JsonRuntimeConfigParser, MsBuildProjectParser};

/// Exit code for a detection-negative outcome.
const DETECT_FAIL_CODE: i32 = 100;

pub fn handle_detect(args: &DetectArgs) -> i32 {
    match run_detect(args) {
        Ok(code) => code,
        Err(err) => {
            error!("detect failed: {:#}", err);
            1
        }
    }
}

pub fn handle_build(args: &BuildArgs) -> i32 {
    match run_build(args) {
        Ok(code) => code,
        Err(err) => {
            error!("build failed: {:#}", err);
            1
        }
    }
}

fn run_detect(args: &DetectArgs) -> Result<i32> {
    let working_dir = resolve_working_dir(args.working_dir.clone())?;
    let config = BuildConfiguration::from_env()?;

    let detector = Detector::new(
        JsonRuntimeConfigParser::new(),
        MsBuildProjectParser::new(),
        BuildpackYmlParser::new(),
    );

    match detector.detect(&working_dir, &config)? {
        Detection::Pass(plan) => {
            let formatter = OutputFormatter::new(args.format.into());
            println!("{}", formatter.format_plan(&plan)?);
            Ok(0)
        }
        Detection::Fail { reason } => {
            info!(%reason, "detection failed");
            Ok(DETECT_FAIL_CODE)
        }
    }
}

fn run_build(args: &BuildArgs) -> Result<i32> {
    let working_dir = resolve_working_dir(args.working_dir.clone())?;
    let config = BuildConfiguration::from_env()?;

    let builder = Builder::new(JsonRuntimeConfigParser::new(), WorkspaceSbomGenerator::new());
    let result = builder.build(&working_dir, &args.buildpack_dir, &config)?;

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_build(&result)?);
    Ok(0)
}

fn resolve_working_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None => env::current_dir().context("failed to resolve current directory"),
    }
}
