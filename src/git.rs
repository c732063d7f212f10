use std::fs;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::Error;
use crate::process::{capture, CapturedOutput, Limits};

/// Clone a repository into `target_dir`
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
///
/// The remote's default branch is checked out; see [`checkout`] for switching
/// to another branch afterwards. `ref_name` is only used for error context.
///
/// The clone is killed when it outlives `limits`. A clone waiting on an SSH
/// passphrase or host key prompt is only ended by the timeout.
pub fn clone(
    url: &str,
    ref_name: &str,
    target_dir: &Path,
    limits: Limits<'_>,
) -> Result<(), Error> {
    if let Some(cancellation) = limits.cancellation {
        cancellation.check("fetching")?;
    }

    // Create parent directory if it doesn't exist
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }

    let clone_error = |message: String| Error::GitClone {
        url: url.to_string(),
        r#ref: ref_name.to_string(),
        message,
    };

    debug!("git clone {} {}", url, target_dir.display());
    let mut command = Command::new("git");
    command
        .args(["clone", "--quiet", "--", url])
        .arg(target_dir)
        // Fail instead of waiting for credentials on a terminal nobody reads
        .env("GIT_TERMINAL_PROMPT", "0");

    let output = capture(&mut command, "git", limits).map_err(|e| match e {
        Error::ProcessLaunch { message, .. } => clone_error(message),
        other => other,
    })?;

    if !output.success {
        return Err(clone_error(failure_message(&output)));
    }

    Ok(())
}

/// Check out `branch` in an existing clone
///
/// Resolves the branch against the clone's remote-tracking refs, so a branch
/// that exists only on the remote is checked out as a local tracking branch.
/// A name matching no branch fails even when it matches a file.
pub fn checkout(repo_dir: &Path, branch: &str, limits: Limits<'_>) -> Result<(), Error> {
    let checkout_error = |stderr: String| Error::GitCommand {
        command: format!("checkout {}", branch),
        dir: repo_dir.to_path_buf(),
        stderr,
    };

    debug!("git checkout {} in {}", branch, repo_dir.display());
    let mut command = Command::new("git");
    command
        .arg("-C")
        .arg(repo_dir)
        .args(["checkout", "--quiet", branch, "--"]);

    let output = capture(&mut command, "git", limits).map_err(|e| match e {
        Error::ProcessLaunch { message, .. } => checkout_error(message),
        other => other,
    })?;

    if !output.success {
        return Err(checkout_error(failure_message(&output)));
    }

    Ok(())
}

/// git's own explanation, or the exit status when it printed none.
fn failure_message(output: &CapturedOutput) -> String {
    let stderr = output.stderr.trim_end();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match output.code {
        Some(code) => format!("git exited with status {}", code),
        None => "git was terminated by a signal".to_string(),
    }
}
