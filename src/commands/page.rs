//! Page command implementation
//!
//! Fetches the page template, then each component repository in the order
//! given, composes them into one app and builds it.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use component_builder::request::{BuildRequest, PageRequest};

use super::{run, RunContext};

/// Arguments for the page command
#[derive(Args, Debug)]
pub struct PageArgs {
    /// Git URL of a component repository; repeat for each component, in render order
    #[arg(short, long = "repo", value_name = "URL", required = true)]
    pub repos: Vec<String>,

    /// Build name; the checkout directory under the download root
    #[arg(short, long)]
    pub name: String,
}

/// Execute the page command
pub fn execute(args: PageArgs, ctx: &RunContext) -> Result<ExitCode> {
    let request = BuildRequest::Page(PageRequest {
        repos: args.repos,
        name: args.name,
    });
    run(request, ctx)
}
