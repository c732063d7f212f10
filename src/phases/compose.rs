//! Composing: turn a page checkout with fetched components into a buildable app
//!
//! 1. Merge the component manifests and the template manifest (see
//!    `crate::manifest` for the precedence rules) and write the result over
//!    the template's own manifest.
//! 2. Generate the entry module rendering `Component0..ComponentN` in order
//!    and write it to the configured entry file.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::info;

use crate::config::{component_identifier, BuilderConfig};
use crate::entry::EntryGenerator;
use crate::error::{Error, Result};
use crate::manifest::merge_manifests;

/// Merge manifests and write the generated entry file into `page_dir`.
pub fn compose_page(config: &BuilderConfig, page_dir: &Path, component_dirs: &[PathBuf]) -> Result<()> {
    let manifest_paths: Vec<PathBuf> = component_dirs
        .iter()
        .map(|dir| config.manifest_path(dir))
        .collect();
    let page_manifest = config.manifest_path(page_dir);

    let merged = merge_manifests(&manifest_paths, &page_manifest)?;
    merged.write(&page_manifest)?;
    info!("Merged {} manifests into {}", manifest_paths.len() + 1, page_manifest.display());

    let identifiers: Vec<String> = (0..component_dirs.len()).map(component_identifier).collect();
    let generator = EntryGenerator::new(
        &import_root(&config.entry_file, &config.components_dir),
        &config.component_entry,
    );
    let entry_path = page_dir.join(&config.entry_file);
    write_file(&entry_path, &generator.generate(&identifiers))?;
    info!("Wrote entry file {}", entry_path.display());

    Ok(())
}

/// Import specifier of `components_dir` as seen from the directory of `entry_file`.
///
/// Both paths are relative to the page root.
pub fn import_root(entry_file: &Path, components_dir: &Path) -> String {
    let from: Vec<Component<'_>> = entry_file
        .parent()
        .map(|p| p.components().filter(is_named).collect())
        .unwrap_or_default();
    let to: Vec<Component<'_>> = components_dir.components().filter(is_named).collect();

    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut segments: Vec<String> = Vec::new();
    segments.extend(std::iter::repeat("..".to_string()).take(from.len() - shared));
    segments.extend(
        to[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if segments.first().map(|s| s == "..").unwrap_or(false) {
        segments.join("/")
    } else if segments.is_empty() {
        ".".to_string()
    } else {
        format!("./{}", segments.join("/"))
    }
}

fn is_named(component: &Component<'_>) -> bool {
    matches!(component, Component::Normal(_))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })
}
