//! Build requests and their outcomes
//!
//! A `BuildRequest` names what to build; a `BuildOutcome` is the single
//! record returned for it. Both serialize to the JSON shapes exchanged with
//! the request layer:
//!
//! ```json
//! {"kind": "component", "repo": "git@github.com:org/button.git", "name": "btn"}
//! {"kind": "page", "repos": ["...", "..."], "name": "page1"}
//! {"code": "success", "message": "build success"}
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Build a single component repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequest {
    #[serde(alias = "repository_url")]
    pub repo: String,
    /// Branch to check out; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub name: String,
}

/// Build a page composed of several component repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(alias = "repository_urls")]
    pub repos: Vec<String>,
    pub name: String,
}

/// Any build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BuildRequest {
    Component(ComponentRequest),
    Page(PageRequest),
}

impl BuildRequest {
    pub fn name(&self) -> &str {
        match self {
            BuildRequest::Component(request) => &request.name,
            BuildRequest::Page(request) => &request.name,
        }
    }

    /// Parse a request from its JSON form.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Check that `name` can be used as a directory under the download root.
///
/// The name must be a single, ordinary path component.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidRequest {
            message: format!("name '{}' {}", name, reason),
        })
    };

    if name.trim().is_empty() {
        return invalid("is empty");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("must not contain path separators");
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => invalid("is not a plain directory name"),
    }
}

/// Final status of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Success,
    Failure,
}

/// The one record produced per build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub code: StatusCode,
    pub message: String,
}

impl BuildOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success
    }
}

impl From<Result<String>> for BuildOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(message) => BuildOutcome::success(message),
            Err(e) => BuildOutcome::failure(e.to_string()),
        }
    }
}
