//! Typed view of Pagure message bodies.
//!
//! Every field is optional and decoded leniently: a value of the wrong JSON
//! type reads as absent instead of failing the whole payload. Formatters
//! then decide how to degrade.

use msgmeta_proto::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Sentinel shown when no project identity can be resolved.
pub const UNKNOWN_PROJECT: &str = "(unknown)";

/// Decodes an optional field, treating type mismatches as absence.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Decodes a field whose explicit `null` must stay distinct from absence.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Python-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Numeric or textual identifier of an issue, pull-request or dependency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A user as known to the forge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// A project (or the `repo` of a commit).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRef {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Parent project of a fork; any truthy value marks a fork.
    ///
    /// `None` means the key is absent, `Some(Value::Null)` an explicit null.
    #[serde(default, deserialize_with = "present")]
    pub parent: Option<Value>,

    /// Owner of the project.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<UserRef>,
}

impl ProjectRef {
    /// Returns true if this project is a fork of another.
    pub fn is_fork(&self) -> bool {
        self.parent.as_ref().is_some_and(is_truthy)
    }

    /// Name of the parent project, for forks.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref()?.get("name")?.as_str()
    }

    /// Canonical path: `name`, or `owner/name` for a fork.
    ///
    /// Both `name` and `parent` must be present; a `null` parent is fine.
    pub fn path(&self) -> Result<String> {
        let name = self.name.as_deref().ok_or(Error::MissingField("name"))?;
        if self.parent.is_none() {
            return Err(Error::MissingField("parent"));
        }
        if !self.is_fork() {
            return Ok(name.to_string());
        }

        let owner = self
            .user
            .as_ref()
            .and_then(|user| user.name.as_deref())
            .ok_or(Error::MissingField("user.name"))?;
        Ok(format!("{owner}/{name}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee: Option<UserRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "lenient")]
    pub rev: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub repo: Option<ProjectRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch: Option<String>,
}

impl Commit {
    /// Canonical path of the pushed-to repository.
    pub fn repo_path(&self) -> Result<String> {
        self.repo
            .as_ref()
            .ok_or(Error::MissingField("commit.repo"))?
            .path()
    }

    /// Branch name with any leading `refs/heads/` removed.
    pub fn branch_name(&self) -> Option<&str> {
        let branch = self.branch.as_deref()?;
        Some(branch.strip_prefix("refs/heads/").unwrap_or(branch))
    }

    /// One-line summary, marked when the full message says more.
    pub fn summary_line(&self) -> Option<String> {
        let summary = self.summary.as_deref()?;
        let message = self.message.as_deref().unwrap_or(summary);
        if summary.trim() == message.trim() {
            Some(summary.to_string())
        } else {
            Some(format!("{summary} (..more)"))
        }
    }
}

/// A CI or review flag set on a pull-request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flag {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: Option<String>,
}

/// Body of any Pagure message.
///
/// Which fields are populated depends on the event family.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    /// Forge user who triggered the event.
    #[serde(default, deserialize_with = "lenient")]
    pub agent: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project: Option<ProjectRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub pullrequest: Option<PullRequest>,
    #[serde(default, deserialize_with = "lenient")]
    pub issue: Option<Issue>,
    #[serde(default, deserialize_with = "lenient")]
    pub commit: Option<Commit>,
    #[serde(default, deserialize_with = "lenient")]
    pub flag: Option<Flag>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub new_user: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub old_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub new_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub added_dependency: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub removed_dependency: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub merged: Option<bool>,
}

type ProjectAccessor = fn(&Payload) -> Option<&ProjectRef>;

fn top_level_project(payload: &Payload) -> Option<&ProjectRef> {
    payload.project.as_ref()
}

fn pull_request_project(payload: &Payload) -> Option<&ProjectRef> {
    payload.pullrequest.as_ref()?.project.as_ref()
}

/// Where a project identity may live, tried in order.
const PROJECT_SOURCES: [(&str, ProjectAccessor); 2] = [
    ("project", top_level_project),
    ("pullrequest.project", pull_request_project),
];

impl Payload {
    /// Forge user who triggered the event; an empty name counts as absent.
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref().filter(|agent| !agent.is_empty())
    }

    /// Reads a payload, falling back to an empty one if it is not an object.
    pub fn parse(value: &Value) -> Self {
        match Self::deserialize(value) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "Payload is not an object, treating as empty");
                Self::default()
            }
        }
    }

    /// Resolves the project this event is about.
    ///
    /// Tries the top-level `project`, then `pullrequest.project`, then
    /// yields [`UNKNOWN_PROJECT`].
    pub fn project_path(&self) -> String {
        PROJECT_SOURCES
            .iter()
            .find_map(|(key, accessor)| match accessor(self).map(ProjectRef::path) {
                Some(Ok(path)) => Some(path),
                Some(Err(e)) => {
                    debug!(key, error = %e, "Project lookup failed");
                    None
                }
                None => None,
            })
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
    }

    /// Resolves the repository a push went to, or [`UNKNOWN_PROJECT`].
    pub fn repo_path(&self) -> String {
        self.commit
            .as_ref()
            .ok_or(Error::MissingField("commit"))
            .and_then(Commit::repo_path)
            .unwrap_or_else(|e| {
                debug!(error = %e, "Repository lookup failed");
                UNKNOWN_PROJECT.to_string()
            })
    }

    pub fn issue_id(&self) -> Option<&Id> {
        self.issue.as_ref()?.id.as_ref()
    }

    pub fn pull_request_id(&self) -> Option<&Id> {
        self.pullrequest.as_ref()?.id.as_ref()
    }
}
