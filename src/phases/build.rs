//! Installing and Building: run the configured tools in a checkout
//!
//! The installer runs first; the build tool only runs when installation
//! succeeded. Each run goes through the pipeline's `ProcessRunner` with the
//! configured timeout and the request's cancellation handle.

use std::path::Path;

use log::info;

use super::Stage;
use crate::config::{BuilderConfig, CommandSpec};
use crate::error::Result;
use crate::process::{Cancellation, Invocation, ProcessRunner, RunReport};

pub const INSTALL_SUCCESS: &str = "install success";

/// Run `command` in `dir` as `stage`.
pub fn run_stage(
    runner: &dyn ProcessRunner,
    config: &BuilderConfig,
    stage: Stage,
    command: &CommandSpec,
    dir: &Path,
    success_message: &str,
    cancellation: &Cancellation,
) -> Result<RunReport> {
    cancellation.check(stage.as_str())?;
    info!("Stage {}: {} in {}", stage, command.program, dir.display());

    let invocation = Invocation::new(command, dir, success_message)
        .with_timeout(config.process_timeout())
        .with_cancellation(cancellation);
    runner.run(&invocation)
}

/// Install dependencies, then build. Returns the build's success message.
pub fn install_and_build(
    runner: &dyn ProcessRunner,
    config: &BuilderConfig,
    dir: &Path,
    success_message: &str,
    cancellation: &Cancellation,
) -> Result<String> {
    run_stage(
        runner,
        config,
        Stage::Installing,
        &config.install,
        dir,
        INSTALL_SUCCESS,
        cancellation,
    )?;
    let report = run_stage(
        runner,
        config,
        Stage::Building,
        &config.build,
        dir,
        success_message,
        cancellation,
    )?;
    Ok(report.message)
}
