//! Merge operations for dependency manifests
//!
//! Manifests are JSON documents. The `json` submodule implements the deep
//! merge used to fold several manifests into one; `crate::manifest` decides
//! which documents are merged and in what order.

pub mod json;

pub use json::deep_merge;
