//! Default values for component-builder configuration.
//!
//! This module provides centralized default values used by `BuilderConfig`
//! and the CLI, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Branch checked out when a request does not name one.
pub const DEFAULT_BRANCH: &str = "master";

/// Repository cloned as the skeleton of every page build.
pub const PAGE_TEMPLATE_URL: &str = "https://github.com/code-myth/page-template.git";

/// Dependency manifest file name, relative to a checkout root.
pub const MANIFEST_FILE: &str = "package.json";

/// Directory, relative to a page checkout, that receives the page's components.
pub const COMPONENTS_DIR: &str = "src/components";

/// Generated entry file, relative to a page checkout.
pub const ENTRY_FILE: &str = "src/App.tsx";

/// Entry module of a component, relative to the component checkout.
pub const COMPONENT_ENTRY: &str = "src/App.tsx";

/// Name of the config file looked up in the current directory.
pub const CONFIG_FILE: &str = ".component-builder.yaml";

/// Returns the default download root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/component-builder/components-repos`
/// - macOS: `~/Library/Caches/component-builder/components-repos`
/// - Windows: `{FOLDERID_LocalAppData}\component-builder\components-repos`
///
/// Falls back to `components-repos` in the current directory if the platform
/// cache directory cannot be determined.
///
/// This can be overridden by the `--download-root` CLI flag, the
/// `COMPONENT_BUILDER_ROOT` environment variable or the config file.
pub fn default_download_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("component-builder"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("components-repos")
}
