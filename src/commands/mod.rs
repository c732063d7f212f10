//! # CLI Command Implementations
//!
//! Each subcommand turns its arguments into a `BuildRequest`; `run` then
//! drives the request through a `BuildPipeline` and reports the outcome.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`.
//! - An `execute` function that builds the request and calls `run`.

pub mod component;
pub mod page;
pub mod request;

use std::process::ExitCode;

use anyhow::Result;
use component_builder::config::BuilderConfig;
use component_builder::output::{format_outcome, format_outcome_json, OutputConfig};
use component_builder::phases::BuildPipeline;
use component_builder::request::BuildRequest;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: BuilderConfig,
    pub output: OutputConfig,
    pub json: bool,
}

/// Run `request` and print its outcome. A failed build exits with code 1.
pub fn run(request: BuildRequest, ctx: &RunContext) -> Result<ExitCode> {
    let pipeline = BuildPipeline::new(ctx.config.clone());
    let outcome = pipeline.build(&request);

    if ctx.json {
        println!("{}", format_outcome_json(&outcome)?);
    } else {
        println!("{}", format_outcome(&ctx.output, request.name(), &outcome));
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
