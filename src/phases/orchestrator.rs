//! Orchestrator for complete builds
//!
//! `BuildPipeline` is the single entry point for the request layer. It takes
//! a `BuildRequest`, runs the stages in order and returns exactly one
//! `BuildOutcome`.
//!
//! Component build:
//! 1. Fetch the repository into `<download_root>/<name>`
//! 2. Install dependencies
//! 3. Build
//!
//! Page build:
//! 1. Fetch the page template into `<download_root>/<name>`
//! 2. Fetch every component into `<page>/src/components/Component<i>`
//! 3. Merge manifests and generate the entry file
//! 4. Install dependencies
//! 5. Build
//!
//! The first failing stage ends the build and its error becomes the outcome
//! message. While a build runs it holds the lock for its target directory, so
//! concurrent requests for the same name run one after another, whether they
//! come from this pipeline, another pipeline or another process.

use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};

use super::{build, compose, fetch, Stage};
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::locks::TargetLocks;
use crate::process::{Cancellation, ProcessRunner, SystemProcessRunner};
use crate::repository::RepositoryFetcher;
use crate::request::{validate_name, BuildOutcome, BuildRequest, ComponentRequest, PageRequest};

/// Message reported by a successful component build.
pub const COMPONENT_SUCCESS: &str = "build success";
/// Message reported by a successful page build.
pub const PAGE_SUCCESS: &str = "build page success";

/// Runs build requests against a configuration
#[derive(Clone)]
pub struct BuildPipeline {
    config: BuilderConfig,
    fetcher: RepositoryFetcher,
    runner: Arc<dyn ProcessRunner>,
    locks: TargetLocks,
}

impl BuildPipeline {
    /// Creates a pipeline using the system `git` and process runner.
    pub fn new(config: BuilderConfig) -> Self {
        let runner = Arc::new(SystemProcessRunner::new(config.stderr_policy));
        Self::with_components(config, RepositoryFetcher::new(), runner)
    }

    /// Creates a pipeline with a custom fetcher and process runner.
    pub fn with_components(
        config: BuilderConfig,
        fetcher: RepositoryFetcher,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            fetcher,
            runner,
            locks: TargetLocks::new(),
        }
    }

    /// Shares a lock registry with other pipelines using the same download root.
    pub fn with_locks(mut self, locks: TargetLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Run a request to completion.
    pub fn build(&self, request: &BuildRequest) -> BuildOutcome {
        self.build_with_cancellation(request, &Cancellation::new())
    }

    /// Run a request, abandoning it when `cancellation` fires.
    pub fn build_with_cancellation(
        &self,
        request: &BuildRequest,
        cancellation: &Cancellation,
    ) -> BuildOutcome {
        match request {
            BuildRequest::Component(component) => self.build_component(component, cancellation),
            BuildRequest::Page(page) => self.build_page(page, cancellation),
        }
    }

    pub fn build_component(
        &self,
        request: &ComponentRequest,
        cancellation: &Cancellation,
    ) -> BuildOutcome {
        let outcome: BuildOutcome = self.run_component(request, cancellation).into();
        log_outcome(&request.name, &outcome);
        outcome
    }

    pub fn build_page(&self, request: &PageRequest, cancellation: &Cancellation) -> BuildOutcome {
        let outcome: BuildOutcome = self.run_page(request, cancellation).into();
        log_outcome(&request.name, &outcome);
        outcome
    }

    fn run_component(&self, request: &ComponentRequest, cancellation: &Cancellation) -> Result<String> {
        let dir = self.prepare_target(&request.name)?;
        let _guard = self.locks.acquire(&dir)?;
        let branch = request
            .branch
            .as_deref()
            .unwrap_or(&self.config.default_branch);

        enter(&request.name, Stage::Fetching);
        fetch::fetch_one(
            &self.fetcher,
            &self.config,
            &request.repo,
            &dir,
            branch,
            cancellation,
        )?;

        enter(&request.name, Stage::Installing);
        build::install_and_build(
            self.runner.as_ref(),
            &self.config,
            &dir,
            COMPONENT_SUCCESS,
            cancellation,
        )
    }

    fn run_page(&self, request: &PageRequest, cancellation: &Cancellation) -> Result<String> {
        let dir = self.prepare_target(&request.name)?;
        let _guard = self.locks.acquire(&dir)?;
        let template = &self.config.page_template;

        enter(&request.name, Stage::Fetching);
        fetch::fetch_one(
            &self.fetcher,
            &self.config,
            &template.url,
            &dir,
            &template.branch,
            cancellation,
        )?;
        let component_dirs = fetch::fetch_components(
            &self.fetcher,
            &self.config,
            &dir,
            &request.repos,
            cancellation,
        )?;

        enter(&request.name, Stage::Composing);
        cancellation.check(Stage::Composing.as_str())?;
        compose::compose_page(&self.config, &dir, &component_dirs)?;

        enter(&request.name, Stage::Installing);
        build::install_and_build(
            self.runner.as_ref(),
            &self.config,
            &dir,
            PAGE_SUCCESS,
            cancellation,
        )
    }

    fn prepare_target(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.config.target_dir(name))
    }
}

fn enter(name: &str, stage: Stage) {
    info!("[{}] {}", name, stage);
}

fn log_outcome(name: &str, outcome: &BuildOutcome) {
    if outcome.is_success() {
        info!("[{}] done: {}", name, outcome.message);
    } else {
        error!("[{}] failed: {}", name, outcome.message);
    }
}
