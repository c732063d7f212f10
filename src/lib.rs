//! # Component Builder Library
//!
//! This library fetches front-end component repositories, composes them and
//! runs their build. It is used by the `component-builder` command-line tool
//! but can be embedded in any request layer (an HTTP service, a queue
//! worker) that needs to turn repositories into built artifacts.
//!
//! ## Quick Example
//!
//! ```
//! use component_builder::entry::EntryGenerator;
//! use component_builder::manifest::{fold_manifests, Manifest};
//!
//! // Merge manifests: the base (page template) wins over every component
//! let components = vec![
//!     Manifest::parse(r#"{"dependencies": {"react": "^17.0.0", "dayjs": "^1.11.0"}}"#).unwrap(),
//! ];
//! let base = Manifest::parse(r#"{"dependencies": {"react": "^18.2.0"}}"#).unwrap();
//! let merged = fold_manifests(&components, &base);
//! assert_eq!(merged.get("dependencies").unwrap()["react"], "^18.2.0");
//!
//! // Generate the entry module of a two-component page
//! let entry = EntryGenerator::default().generate(&["Component0", "Component1"]);
//! assert!(entry.contains("<Component0 />"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: `BuilderConfig`, the download root,
//!   template repository and tool commands handed to the pipeline.
//! - **Requests (`request`)**: `BuildRequest` in, `BuildOutcome` out.
//! - **Fetching (`repository`, `git`)**: fresh checkouts of repositories.
//! - **Manifests (`manifest`, `merge`)**: deep merge of `package.json` files.
//! - **Entry generation (`entry`)**: the module composing a page's components.
//! - **Processes (`process`)**: running and classifying the installer and
//!   the build tool.
//! - **Phases (`phases`)**: the stages of a build and the `BuildPipeline`
//!   that sequences them.
//!
//! ## Execution Flow
//!
//! `phases::BuildPipeline::build` is the entry point:
//!
//! 1.  **Fetching**: Delete and re-clone the target directory (plus, for a
//!     page, every component under `src/components`).
//! 2.  **Composing** (pages): Merge manifests and write the entry file.
//! 3.  **Installing**: Run the package installer.
//! 4.  **Building**: Run the build tool.
//!
//! The first failing stage ends the build; its error message becomes the
//! outcome's message.

pub mod config;
pub mod defaults;
pub mod entry;
pub mod error;
pub mod git;
pub mod locks;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod phases;
pub mod process;
pub mod repository;
pub mod request;

#[cfg(test)]
mod merge_proptest;
