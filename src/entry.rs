//! # Entry File Generation
//!
//! A page build composes its components in a generated entry module. The
//! module imports each component's entry and renders the components one
//! after another inside a single container element:
//!
//! ```text
//! import React from 'react';
//! import Component0 from './components/Component0/src/App.tsx';
//!
//! function App() {
//!   return (
//!     <div className="App">
//!       <Component0 />
//!     </div>
//!   );
//! }
//!
//! export default App;
//! ```
//!
//! Generation happens in two steps. `render_directives` maps the component
//! identifiers to an ordered list of `RenderDirective`s, and `render` turns
//! that list into source text. Both are pure, so identical input always
//! yields byte-identical output.

use std::collections::HashSet;

/// One component to import and render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDirective {
    /// JSX identifier the component is imported as.
    pub binding: String,
    /// Import specifier, relative to the entry file.
    pub module: String,
}

/// Builds entry modules for page builds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryGenerator {
    components_import_root: String,
    component_entry: String,
}

impl EntryGenerator {
    /// `components_import_root` is the components directory as seen from the
    /// entry file (e.g. `./components`); `component_entry` is each
    /// component's entry module relative to its own root.
    pub fn new(components_import_root: &str, component_entry: &str) -> Self {
        Self {
            components_import_root: components_import_root.trim_end_matches('/').to_string(),
            component_entry: component_entry.trim_start_matches("./").to_string(),
        }
    }

    /// Generate the entry module for `identifiers`, in order.
    pub fn generate<S: AsRef<str>>(&self, identifiers: &[S]) -> String {
        render(&self.render_directives(identifiers))
    }

    /// One directive per identifier, in input order.
    pub fn render_directives<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<RenderDirective> {
        let mut taken = HashSet::new();
        identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| {
                let identifier = identifier.as_ref();
                let base = binding_name(identifier, index);
                let mut binding = base.clone();
                let mut suffix = index;
                while !taken.insert(binding.clone()) {
                    binding = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                RenderDirective {
                    binding,
                    module: format!(
                        "{}/{}/{}",
                        self.components_import_root, identifier, self.component_entry
                    ),
                }
            })
            .collect()
    }
}

impl Default for EntryGenerator {
    fn default() -> Self {
        Self::new("./components", crate::defaults::COMPONENT_ENTRY)
    }
}

/// Serialize directives into the entry module source.
pub fn render(directives: &[RenderDirective]) -> String {
    let mut out = String::from("import React from 'react';\n");
    for directive in directives {
        out.push_str(&format!(
            "import {} from '{}';\n",
            directive.binding, directive.module
        ));
    }
    out.push_str("\nfunction App() {\n  return (\n    <div className=\"App\">\n");
    for directive in directives {
        out.push_str(&format!("      <{} />\n", directive.binding));
    }
    out.push_str("    </div>\n  );\n}\n\nexport default App;\n");
    out
}

/// Derive a JSX component name from an identifier.
///
/// JSX treats lowercase tags as DOM elements, so the result always starts
/// with an uppercase letter.
fn binding_name(identifier: &str, index: usize) -> String {
    let cleaned: String = identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        }
        Some(_) => format!("Component{}", cleaned),
        None => format!("Component{}", index),
    }
}
