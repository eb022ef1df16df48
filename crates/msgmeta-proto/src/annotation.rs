//! The per-event annotation handed back to consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Human-facing metadata derived from one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Short title, usually the topic without its environment prefix.
    pub title: String,

    /// One-line description of what happened.
    pub subtitle: Option<String>,

    /// Canonical link to the affected entity.
    pub link: Option<String>,

    /// Icon of the source system.
    pub icon: Option<String>,

    /// Avatar of the acting user.
    pub secondary_icon: Option<String>,

    /// Accounts of the humans involved.
    pub usernames: BTreeSet<String>,

    /// Domain objects touched by the event (`project/foo`, `issue/12`).
    pub objects: BTreeSet<String>,
}
