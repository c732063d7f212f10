//! Exclusion for build target directories
//!
//! Two requests with the same name would delete and clone into the same
//! directory. `TargetLocks` hands out one guard per target path at a time;
//! a second request for the same path blocks until the first guard drops.
//! Requests for different paths never wait on each other.
//!
//! A guard holds two locks. Threads of one process queue on an in-memory
//! registry, and processes sharing a download root queue on an exclusive
//! `fs2` lock of `<parent>/.<name>.lock` next to the target. The lock file
//! is left in place; only the lock on it is released.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};

use fs2::FileExt;
use log::{debug, warn};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    held: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Registry of target paths currently being built
#[derive(Debug, Clone, Default)]
pub struct TargetLocks {
    inner: Arc<Inner>,
}

/// Exclusive hold on a target path, released on drop
#[derive(Debug)]
pub struct TargetGuard {
    inner: Arc<Inner>,
    path: PathBuf,
    lock_file: Option<File>,
}

impl TargetGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `path` is free in this process and every other, then hold it.
    pub fn acquire(&self, path: &Path) -> Result<TargetGuard> {
        let key = resolve(path)?;
        let mut held = self
            .inner
            .held
            .lock()
            .map_err(|_| lock_poisoned(&key))?;

        while held.contains(&key) {
            debug!("Waiting for build of {} to finish", key.display());
            held = self
                .inner
                .released
                .wait(held)
                .map_err(|_| lock_poisoned(&key))?;
        }
        held.insert(key.clone());
        drop(held);

        // From here on, dropping the guard releases the registry entry.
        let mut guard = TargetGuard {
            inner: Arc::clone(&self.inner),
            path: key,
            lock_file: None,
        };
        guard.lock_file = Some(lock_exclusive(&guard.path)?);
        Ok(guard)
    }

    /// Whether a guard for `path` is currently held in this process.
    pub fn is_held(&self, path: &Path) -> Result<bool> {
        let key = resolve(path)?;
        let held = self
            .inner
            .held
            .lock()
            .map_err(|_| lock_poisoned(&key))?;
        Ok(held.contains(&key))
    }
}

impl Drop for TargetGuard {
    fn drop(&mut self) {
        if let Some(file) = self.lock_file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                warn!("Failed to unlock {}: {}", lock_path_display(&self.path), e);
            }
        }

        // A poisoned registry still has to release this path.
        let mut held = match self.inner.held.lock() {
            Ok(held) => held,
            Err(poisoned) => poisoned.into_inner(),
        };
        held.remove(&self.path);
        self.inner.released.notify_all();
    }
}

/// `<parent>/.<name>.lock` for the target `<parent>/<name>`.
fn lock_path(target: &Path) -> Result<PathBuf> {
    match (target.parent(), target.file_name()) {
        (Some(parent), Some(name)) => {
            let mut file_name = std::ffi::OsString::from(".");
            file_name.push(name);
            file_name.push(".lock");
            Ok(parent.join(file_name))
        }
        _ => Err(Error::Filesystem {
            message: format!("Cannot lock '{}': no parent directory", target.display()),
        }),
    }
}

fn lock_path_display(target: &Path) -> String {
    lock_path(target)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| target.display().to_string())
}

fn lock_exclusive(target: &Path) -> Result<File> {
    let path = lock_path(target)?;
    let filesystem_error = |action: &str, e: std::io::Error| Error::Filesystem {
        message: format!("Failed to {} '{}': {}", action, path.display(), e),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| filesystem_error("create the parent of", e))?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|e| filesystem_error("open", e))?;

    if file.try_lock_exclusive().is_err() {
        debug!("Waiting for another process to release {}", path.display());
        file.lock_exclusive().map_err(|e| filesystem_error("lock", e))?;
    }
    Ok(file)
}

fn resolve(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to resolve '{}': {}", path.display(), e),
    })
}

fn lock_poisoned(path: &Path) -> Error {
    Error::LockPoisoned {
        context: format!("target lock registry ({})", path.display()),
    }
}
