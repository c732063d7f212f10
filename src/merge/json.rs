//! JSON merge operations
//!
//! This module provides the recursive deep merge used for dependency
//! manifests.
//!
//! ## Rules
//!
//! - Object into object: keys are merged recursively; keys only present in the
//!   target are kept, keys only present in the source are added.
//! - Array into anything: the source array replaces the target wholesale.
//!   Arrays are never concatenated, so a list such as `files` or
//!   `workspaces` always comes from a single source.
//! - Any other combination: the source value replaces the target.
//!
//! The merge is right-biased: merging `source` into `target` lets `source`
//! win every scalar conflict.
//!
//! ## Example
//!
//! ```
//! use component_builder::merge::deep_merge;
//! use serde_json::json;
//!
//! let mut target = json!({"dependencies": {"react": "^17.0.0", "lodash": "^4.0.0"}});
//! deep_merge(&mut target, &json!({"dependencies": {"react": "^18.2.0"}}));
//! assert_eq!(
//!     target,
//!     json!({"dependencies": {"react": "^18.2.0", "lodash": "^4.0.0"}})
//! );
//! ```

use serde_json::Value as JsonValue;

/// Recursively merge `source` into `target`, with `source` taking precedence
pub fn deep_merge(target: &mut JsonValue, source: &JsonValue) {
    match (target, source) {
        (JsonValue::Object(target_map), JsonValue::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}
