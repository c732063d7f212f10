//! Implementation of the stages of a build.
//!
//! ## Overview
//!
//! Every build request moves through the same stages:
//! 1. Fetching - Fresh checkouts of the requested repositories
//! 2. Composing - Page builds only: merge manifests and generate the entry file
//! 3. Installing - Run the package installer in the checkout root
//! 4. Building - Run the build tool in the checkout root
//!
//! A failing stage ends the build; later stages are not attempted. The
//! `orchestrator` module sequences the stages and turns the result into the
//! request's single `BuildOutcome`.

use std::fmt;

pub mod build;
pub mod compose;
pub mod fetch;
pub mod orchestrator;

pub use orchestrator::BuildPipeline;

/// A stage of the build state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Composing,
    Installing,
    Building,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetching => "fetching",
            Stage::Composing => "composing",
            Stage::Installing => "installing",
            Stage::Building => "building",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
