//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fake git and process implementations for driving the
//! pipeline without a network, plus helpers for building real local git
//! repositories for the end-to-end suites.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let git = FakeGit::new().with_repo("r0", &[("package.json", "{}")]);
//! let runner = RecordingRunner::new();
//! ```

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use component_builder::config::BuilderConfig;
use component_builder::error::{Error, Result};
use component_builder::phases::BuildPipeline;
use component_builder::process::{Invocation, Limits, ProcessRunner, RunReport};
use component_builder::repository::{GitOperations, RepositoryFetcher};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use super::{git_repo, pipeline, FakeGit, RecordingRunner, RunnerCall};
    pub use serde_json::{json, Value};
    pub use tempfile::TempDir;
}

/// Serves clones from in-memory fixtures keyed by URL
///
/// Unknown URLs fail the way an unreachable remote does. Every clone records
/// how many clones were writing to its target at the same time.
#[derive(Default)]
pub struct FakeGit {
    repos: HashMap<String, Vec<(String, String)>>,
    delay: Duration,
    cloned: Mutex<Vec<String>>,
    active: Mutex<HashMap<PathBuf, usize>>,
    peak: Mutex<HashMap<PathBuf, usize>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository with the given files.
    pub fn with_repo(mut self, url: &str, files: &[(&str, &str)]) -> Self {
        self.repos.insert(
            url.to_string(),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    /// Make every clone take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Highest number of clones seen writing into `target_dir` at once.
    pub fn peak_concurrent_clones(&self, target_dir: &Path) -> usize {
        self.peak
            .lock()
            .unwrap()
            .get(target_dir)
            .copied()
            .unwrap_or(0)
    }

    /// URLs cloned so far, in call order.
    pub fn cloned(&self) -> Vec<String> {
        self.cloned.lock().unwrap().clone()
    }
}

impl GitOperations for FakeGit {
    fn clone_repo(
        &self,
        url: &str,
        ref_name: &str,
        target_dir: &Path,
        _limits: Limits<'_>,
    ) -> Result<()> {
        self.cloned.lock().unwrap().push(url.to_string());
        self.enter(target_dir);
        thread::sleep(self.delay);
        let result = self.write_checkout(url, ref_name, target_dir);
        self.leave(target_dir);
        result
    }

    fn checkout(&self, _repo_dir: &Path, _branch: &str, _limits: Limits<'_>) -> Result<()> {
        Ok(())
    }
}

impl FakeGit {
    fn enter(&self, target_dir: &Path) {
        let mut active = self.active.lock().unwrap();
        let count = active.entry(target_dir.to_path_buf()).or_insert(0);
        *count += 1;
        let mut peak = self.peak.lock().unwrap();
        let max = peak.entry(target_dir.to_path_buf()).or_insert(0);
        *max = (*max).max(*count);
    }

    fn leave(&self, target_dir: &Path) {
        let mut active = self.active.lock().unwrap();
        if let Some(count) = active.get_mut(target_dir) {
            *count -= 1;
        }
    }

    fn write_checkout(&self, url: &str, ref_name: &str, target_dir: &Path) -> Result<()> {
        let files = self.repos.get(url).ok_or_else(|| Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: format!(
                "fatal: unable to access '{}': Could not resolve host",
                url
            ),
        })?;

        fs::create_dir_all(target_dir)?;
        for (path, content) in files {
            let full = target_dir.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full, content)?;
        }
        Ok(())
    }
}

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCall {
    pub command: String,
    pub working_dir: PathBuf,
}

/// Records invocations; programs listed in `failing` fail with stderr output
#[derive(Default)]
pub struct RecordingRunner {
    failing: Vec<String>,
    calls: Mutex<Vec<RunnerCall>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(program: &str) -> Self {
        Self {
            failing: vec![program.to_string()],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation<'_>) -> Result<RunReport> {
        self.calls.lock().unwrap().push(RunnerCall {
            command: invocation.display(),
            working_dir: invocation.working_dir.to_path_buf(),
        });
        if self.failing.iter().any(|p| p == invocation.program) {
            return Err(Error::ProcessOutput {
                program: invocation.program.to_string(),
                stderr: format!("{} failed", invocation.program),
            });
        }
        Ok(RunReport {
            message: invocation.success_message.to_string(),
            stdout: String::new(),
        })
    }
}

/// Pipeline rooted at `root` using the given fakes.
pub fn pipeline(
    root: &Path,
    git: Arc<FakeGit>,
    runner: Arc<RecordingRunner>,
) -> BuildPipeline {
    pipeline_with_config(BuilderConfig::with_download_root(root), git, runner)
}

pub fn pipeline_with_config(
    config: BuilderConfig,
    git: Arc<FakeGit>,
    runner: Arc<RecordingRunner>,
) -> BuildPipeline {
    BuildPipeline::with_components(config, RepositoryFetcher::with_operations(git), runner)
}

/// Create a git repository at `dir` holding `files` in one commit.
///
/// Requires the `git` executable.
pub fn git_repo(dir: &Path, files: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create repository directory");
    git(dir, &["init", "--quiet", "--initial-branch=master"]);
    for (path, content) in files {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    git(dir, &["add", "--all"]);
    git(
        dir,
        &[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--quiet",
            "-m",
            "fixture",
        ],
    );
    dir.to_path_buf()
}

/// Create and check out a branch with extra files in an existing fixture repository.
pub fn git_branch(dir: &Path, branch: &str, files: &[(&str, &str)]) {
    git(dir, &["checkout", "--quiet", "-b", branch]);
    for (path, content) in files {
        fs::write(dir.join(path), content).unwrap();
    }
    git(dir, &["add", "--all"]);
    git(
        dir,
        &[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--quiet",
            "-m",
            branch,
        ],
    );
    git(dir, &["checkout", "--quiet", "master"]);
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, dir.display());
}
