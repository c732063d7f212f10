//! # Dependency Manifests
//!
//! A `Manifest` is the parsed content of a `package.json`-style file: a JSON
//! object whose key order is kept as written. Nothing beyond "is a JSON
//! object" is validated.
//!
//! ## Merge order
//!
//! A page build folds the manifests of all its components and of the page
//! template into one document:
//!
//! 1. Component manifests are merged in **reverse** order, from the last
//!    component down to the first, so an earlier component wins conflicts
//!    with a later one.
//! 2. The base (template) manifest is merged last and wins over every
//!    component.
//!
//! Merging uses `crate::merge::deep_merge`: nested objects merge key-wise,
//! arrays are replaced wholesale. Every listed manifest must exist and parse;
//! a single missing file fails the whole merge.

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::merge::deep_merge;

/// A dependency manifest: an ordered JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest(Map<String, JsonValue>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from JSON text. The root must be an object.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        match serde_json::from_str::<JsonValue>(content) {
            Ok(JsonValue::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(format!("expected a JSON object, found {}", kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Read and parse the manifest at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ManifestRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| Error::ManifestRead {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Write the manifest as two-space indented JSON with a trailing newline.
    pub fn write(&self, path: &Path) -> Result<()> {
        let to_write_error = |message: String| Error::ManifestWrite {
            path: path.to_path_buf(),
            message,
        };
        let mut serialized =
            serde_json::to_string_pretty(&self.0).map_err(|e| to_write_error(e.to_string()))?;
        serialized.push('\n');
        fs::write(path, serialized).map_err(|e| to_write_error(e.to_string()))
    }

    /// Deep-merge `other` into this manifest; `other` wins conflicts.
    pub fn merge_from(&mut self, other: &Manifest) {
        let mut target = JsonValue::Object(std::mem::take(&mut self.0));
        deep_merge(&mut target, &JsonValue::Object(other.0.clone()));
        if let JsonValue::Object(map) = target {
            self.0 = map;
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

}

impl From<Map<String, JsonValue>> for Manifest {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Fold already-loaded manifests: components in reverse order, base last.
pub fn fold_manifests(components: &[Manifest], base: &Manifest) -> Manifest {
    let mut merged = Manifest::new();
    for component in components.iter().rev() {
        merged.merge_from(component);
    }
    merged.merge_from(base);
    merged
}

/// Read the component manifests and the base manifest, then fold them.
///
/// `component_paths` is in component order; the base manifest wins every
/// conflict. Fails on the first manifest that cannot be read.
pub fn merge_manifests<P: AsRef<Path>>(component_paths: &[P], base_path: &Path) -> Result<Manifest> {
    let mut components = Vec::with_capacity(component_paths.len());
    // Read in merge order so the reported failure is the first one merged.
    for path in component_paths.iter().rev() {
        debug!("Reading manifest {}", path.as_ref().display());
        components.push(Manifest::read(path.as_ref())?);
    }
    components.reverse();

    debug!("Reading base manifest {}", base_path.display());
    let base = Manifest::read(base_path)?;
    Ok(fold_manifests(&components, &base))
}
