//! Property-based tests for manifest merging and entry generation.
//!
//! These tests use proptest to generate random manifests and identifier
//! lists and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::entry::EntryGenerator;
    use crate::manifest::{fold_manifests, Manifest};
    use crate::merge::deep_merge;
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z0-9.^~-]{0,8}".prop_map(Value::String),
        ]
    }

    fn json_value() -> impl Strategy<Value = Value> {
        json_leaf().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn manifest() -> impl Strategy<Value = Manifest> {
        prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..6)
            .prop_map(|m| Manifest::from(m.into_iter().collect::<Map<String, Value>>()))
    }

    proptest! {
        /// Property: merging a value into itself leaves it unchanged
        #[test]
        fn deep_merge_with_self_is_identity(value in json_value()) {
            let mut target = value.clone();
            deep_merge(&mut target, &value);
            prop_assert_eq!(target, value);
        }

        /// Property: a lone base manifest merges to itself
        #[test]
        fn fold_single_source_is_identity(base in manifest()) {
            prop_assert_eq!(fold_manifests(&[], &base), base.clone());
            prop_assert_eq!(fold_manifests(std::slice::from_ref(&base), &base), base);
        }

        /// Property: every top-level key of the base keeps the base's value
        #[test]
        fn base_wins_top_level_scalars(
            components in prop::collection::vec(manifest(), 0..4),
            base in manifest(),
        ) {
            let merged = fold_manifests(&components, &base);
            for key in base.keys() {
                let base_value = base.get(key).unwrap();
                if !base_value.is_object() {
                    prop_assert_eq!(merged.get(key), Some(base_value));
                }
            }
        }

        /// Property: every key of every source appears in the merge
        #[test]
        fn merge_keeps_union_of_keys(
            components in prop::collection::vec(manifest(), 0..4),
            base in manifest(),
        ) {
            let merged = fold_manifests(&components, &base);
            for source in components.iter().chain(std::iter::once(&base)) {
                for key in source.keys() {
                    prop_assert!(merged.get(key).is_some());
                }
            }
        }

        /// Property: generation is deterministic
        #[test]
        fn generate_is_deterministic(ids in prop::collection::vec("[A-Za-z][A-Za-z0-9]{0,8}", 0..6)) {
            let generator = EntryGenerator::default();
            prop_assert_eq!(generator.generate(&ids), generator.generate(&ids));
        }

        /// Property: bindings are unique whatever the identifiers
        #[test]
        fn bindings_are_unique(ids in prop::collection::vec("[A-Za-z_][A-Za-z0-9_-]{0,4}", 0..10)) {
            let directives = EntryGenerator::default().render_directives(&ids);
            let unique: std::collections::HashSet<&str> =
                directives.iter().map(|d| d.binding.as_str()).collect();
            prop_assert_eq!(unique.len(), directives.len());
        }

        /// Property: one render statement per identifier, in order
        #[test]
        fn generate_renders_each_identifier_once(count in 0usize..12) {
            let ids: Vec<String> = (0..count).map(|i| format!("Component{}", i)).collect();
            let rendered = EntryGenerator::default().generate(&ids);
            let renders: Vec<String> = rendered
                .lines()
                .map(str::trim)
                .filter(|line| line.starts_with('<') && line.ends_with("/>"))
                .map(str::to_string)
                .collect();
            let expected: Vec<String> = ids.iter().map(|id| format!("<{} />", id)).collect();
            prop_assert_eq!(renders, expected);
        }
    }
}
