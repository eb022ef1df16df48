//! Topic strings and processor prefix patterns.
//!
//! Topics are dot-delimited (`io.pagure.prod.pagure.issue.new`). The first
//! three segments name the publishing organisation and environment; the rest
//! name the event kind.

use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of leading segments that carry `<tld>.<org>.<env>`.
const ENV_PREFIX_SEGMENTS: usize = 3;

/// A message bus topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Creates a new topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self(topic.into())
    }

    /// Returns the topic as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `tag` occurs anywhere in the topic.
    ///
    /// Family tags are matched by containment, not by segment structure.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Returns the topic with its `<tld>.<org>.<env>` prefix removed.
    ///
    /// Topics with no segments past the prefix are returned unchanged.
    pub fn without_env_prefix(&self) -> &str {
        self.0
            .match_indices('.')
            .nth(ENV_PREFIX_SEGMENTS - 1)
            .map(|(idx, _)| &self.0[idx + 1..])
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A regular expression a processor registers to claim topics.
///
/// The pattern is anchored at the start of the topic.
#[derive(Debug, Clone)]
pub struct TopicPrefix {
    pattern: String,
    regex: Regex,
}

impl TopicPrefix {
    /// Compiles a prefix pattern such as `io\.pagure\.(dev|stg|prod)`.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self { pattern, regex })
    }

    /// Returns the pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Checks whether the topic starts with this prefix.
    pub fn matches(&self, topic: &Topic) -> bool {
        self.regex.is_match(topic.as_str())
    }
}
