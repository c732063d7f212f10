//! Component command implementation
//!
//! Fetches one repository into `<download_root>/<name>`, installs its
//! dependencies and builds it.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use component_builder::request::{BuildRequest, ComponentRequest};

use super::{run, RunContext};

/// Arguments for the component command
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Git URL of the component repository
    #[arg(short, long, value_name = "URL")]
    pub repo: String,

    /// Build name; the checkout directory under the download root
    #[arg(short, long)]
    pub name: String,

    /// Branch to build (defaults to the configured default branch)
    #[arg(short, long)]
    pub branch: Option<String>,
}

/// Execute the component command
pub fn execute(args: ComponentArgs, ctx: &RunContext) -> Result<ExitCode> {
    let request = BuildRequest::Component(ComponentRequest {
        repo: args.repo,
        branch: args.branch,
        name: args.name,
    });
    run(request, ctx)
}
