//! Fetching: fresh checkouts of the repositories a build needs
//!
//! A component build fetches one repository into its target directory. A
//! page build fetches the page template first and then every component into
//! `<page>/<components_dir>/Component<i>`.
//!
//! Component checkouts write to disjoint directories, so they are fetched in
//! parallel with rayon when `parallel_fetch` is enabled. Results are always
//! reported in input order, and the first failure by index is the one that
//! ends the build.

use std::path::{Path, PathBuf};

use log::info;
use rayon::prelude::*;

use super::Stage;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::process::{Cancellation, Limits};
use crate::repository::RepositoryFetcher;

/// Fetch a single repository into `target_dir`.
///
/// git runs under the configured process timeout and `cancellation`.
pub fn fetch_one(
    fetcher: &RepositoryFetcher,
    config: &BuilderConfig,
    url: &str,
    target_dir: &Path,
    branch: &str,
    cancellation: &Cancellation,
) -> Result<PathBuf> {
    cancellation.check(Stage::Fetching.as_str())?;
    let limits = Limits::new(config.process_timeout(), cancellation);
    fetcher.fetch(url, target_dir, branch, limits)
}

/// Fetch every component of a page; returns their directories in input order.
pub fn fetch_components(
    fetcher: &RepositoryFetcher,
    config: &BuilderConfig,
    page_dir: &Path,
    repos: &[String],
    cancellation: &Cancellation,
) -> Result<Vec<PathBuf>> {
    let jobs: Vec<(&str, PathBuf)> = repos
        .iter()
        .enumerate()
        .map(|(index, url)| (url.as_str(), config.component_dir(page_dir, index)))
        .collect();
    let branch = config.default_branch.as_str();

    info!(
        "Fetching {} components into {}",
        jobs.len(),
        page_dir.join(&config.components_dir).display()
    );

    if config.parallel_fetch {
        let results: Vec<Result<PathBuf>> = jobs
            .par_iter()
            .map(|(url, dir)| fetch_one(fetcher, config, url, dir, branch, cancellation))
            .collect();
        results.into_iter().collect()
    } else {
        jobs.iter()
            .map(|(url, dir)| fetch_one(fetcher, config, url, dir, branch, cancellation))
            .collect()
    }
}
