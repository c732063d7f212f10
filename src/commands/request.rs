//! Request command implementation
//!
//! Reads a JSON build request, the same record an HTTP front end would
//! receive, and runs it:
//!
//! ```json
//! {"kind": "component", "repo": "git@github.com:org/button.git", "branch": "master", "name": "btn"}
//! {"kind": "page", "repos": ["git@github.com:org/header.git", "git@github.com:org/footer.git"], "name": "home"}
//! ```

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use component_builder::request::BuildRequest;

use super::{run, RunContext};

/// Arguments for the request command
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// JSON request file, or `-` to read standard input
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the request command
pub fn execute(args: RequestArgs, ctx: &RunContext) -> Result<ExitCode> {
    let content = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read request file {}", args.file.display()))?
    };

    let request = BuildRequest::from_json(&content).context("Invalid build request")?;
    run(request, ctx)
}
