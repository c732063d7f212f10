//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use component_builder::config::{self, BuilderConfig};
use component_builder::defaults;
use component_builder::output::OutputConfig;

use crate::commands::{self, RunContext};

/// Component Builder - Fetch, compose and build front-end components
#[derive(Parser, Debug)]
#[command(name = "component-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the builder config file
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        env = "COMPONENT_BUILDER_CONFIG"
    )]
    config: Option<PathBuf>,

    /// Directory receiving one checkout per build name
    #[arg(long, global = true, value_name = "PATH", env = "COMPONENT_BUILDER_ROOT")]
    download_root: Option<PathBuf>,

    /// Print the outcome as a JSON record
    #[arg(long, global = true)]
    json: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a single component repository
    Component(commands::component::ComponentArgs),

    /// Build a page composed of several component repositories
    Page(commands::page::PageArgs),

    /// Run a build request read from a JSON file
    Request(commands::request::RequestArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        init_logging(&self.log_level);

        let ctx = RunContext {
            config: self.load_config()?,
            output: OutputConfig::from_env_and_flag(&self.color),
            json: self.json,
        };

        match self.command {
            Commands::Component(args) => commands::component::execute(args, &ctx),
            Commands::Page(args) => commands::page::execute(args, &ctx),
            Commands::Request(args) => commands::request::execute(args, &ctx),
        }
    }

    /// Explicit config file, else `.component-builder.yaml` if present, else defaults.
    fn load_config(&self) -> Result<BuilderConfig> {
        let mut builder_config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                config::from_file(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => {
                let local = PathBuf::from(defaults::CONFIG_FILE);
                if local.exists() {
                    config::from_file(&local)
                        .with_context(|| format!("Failed to load {}", local.display()))?
                } else {
                    BuilderConfig::default()
                }
            }
        };

        if let Some(root) = &self.download_root {
            builder_config.download_root = root.clone();
        }
        Ok(builder_config)
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger installed by an embedding process wins.
    let _ = env_logger::Builder::from_env(env).try_init();
}
