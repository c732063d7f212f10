//! # Builder Configuration
//!
//! This module defines `BuilderConfig`, the explicit configuration handed to
//! the build pipeline at construction time. It replaces fixed repository URLs
//! and directory names with values that can be set from a YAML file.
//!
//! ## Format
//!
//! Every field is optional; missing fields take the defaults from
//! `crate::defaults`:
//!
//! ```yaml
//! download_root: /var/lib/component-builder/repos
//! default_branch: master
//! page_template:
//!   url: https://github.com/code-myth/page-template.git
//!   branch: master
//! install:
//!   program: yarn
//!   args: [install]
//! build:
//!   program: npm
//!   args: [run, build]
//! stderr_policy: strict
//! process_timeout_secs: 600
//! parallel_fetch: true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// An external command: executable plus its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path, resolved through `PATH`.
    pub program: String,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Repository used as the skeleton of page builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRepo {
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for TemplateRepo {
    fn default() -> Self {
        Self {
            url: defaults::PAGE_TEMPLATE_URL.to_string(),
            branch: defaults::DEFAULT_BRANCH.to_string(),
        }
    }
}

/// How output on a process's error stream is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StderrPolicy {
    /// Any stderr output fails the invocation, whatever the exit status.
    #[default]
    Strict,
    /// Only the exit status decides; stderr output is logged as a warning.
    ExitCode,
}

/// Configuration for the build pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Directory holding one checkout per requested name.
    pub download_root: PathBuf,
    /// Branch used when a component request names none.
    pub default_branch: String,
    /// Template repository cloned for page builds.
    pub page_template: TemplateRepo,
    /// Dependency installation command, run in the checkout root.
    pub install: CommandSpec,
    /// Build command, run in the checkout root after installation.
    pub build: CommandSpec,
    /// Manifest file name relative to every checkout root.
    pub manifest_file: String,
    /// Where page components are cloned, relative to the page root.
    pub components_dir: PathBuf,
    /// Generated entry file, relative to the page root.
    pub entry_file: PathBuf,
    /// Entry module of each component, relative to the component root.
    pub component_entry: String,
    pub stderr_policy: StderrPolicy,
    /// Upper bound for each external process; unbounded when absent.
    pub process_timeout_secs: Option<u64>,
    /// Fetch page components concurrently.
    pub parallel_fetch: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            download_root: defaults::default_download_root(),
            default_branch: defaults::DEFAULT_BRANCH.to_string(),
            page_template: TemplateRepo::default(),
            install: CommandSpec::new("yarn", &["install"]),
            build: CommandSpec::new("npm", &["run", "build"]),
            manifest_file: defaults::MANIFEST_FILE.to_string(),
            components_dir: PathBuf::from(defaults::COMPONENTS_DIR),
            entry_file: PathBuf::from(defaults::ENTRY_FILE),
            component_entry: defaults::COMPONENT_ENTRY.to_string(),
            stderr_policy: StderrPolicy::default(),
            process_timeout_secs: None,
            parallel_fetch: true,
        }
    }
}

impl BuilderConfig {
    /// Configuration with every default but the download root.
    pub fn with_download_root(download_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            ..Self::default()
        }
    }

    /// Checkout directory for a request name.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.download_root.join(name)
    }

    /// Directory of the `index`-th component inside a page checkout.
    pub fn component_dir(&self, page_dir: &Path, index: usize) -> PathBuf {
        page_dir
            .join(&self.components_dir)
            .join(component_identifier(index))
    }

    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest_file)
    }

    pub fn process_timeout(&self) -> Option<Duration> {
        self.process_timeout_secs.map(Duration::from_secs)
    }
}

/// Directory name given to the `index`-th component of a page.
pub fn component_identifier(index: usize) -> String {
    format!("Component{}", index)
}

fn default_branch() -> String {
    defaults::DEFAULT_BRANCH.to_string()
}

/// Parse a YAML string into a `BuilderConfig`
pub fn parse(yaml_content: &str) -> Result<BuilderConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(BuilderConfig::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
    })
}

/// Read and parse a config file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BuilderConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
