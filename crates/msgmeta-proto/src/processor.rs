//! The contract between the routing layer and a per-source processor.
//!
//! A processor claims topics through a [`TopicPrefix`] and answers read-only
//! queries about events on those topics.

use crate::{Annotation, Event, TopicPrefix};
use std::collections::BTreeSet;

/// An annotation processor for one source system.
///
/// Every query is total: implementations must return degraded output rather
/// than panic on malformed or partial payloads.
pub trait Processor: Send + Sync {
    /// Short identifier of the source system (`pagure`).
    fn name(&self) -> &str;

    /// Human-readable description of the source system.
    fn description(&self) -> &str {
        self.name()
    }

    /// Home page of the source system.
    fn home_url(&self) -> Option<&str> {
        None
    }

    /// Documentation of the source system.
    fn docs_url(&self) -> Option<&str> {
        None
    }

    /// What the events are about, as shown to readers.
    fn object_kind(&self) -> &str {
        self.description()
    }

    /// Topic prefix this processor is registered against.
    fn topic_prefix(&self) -> &TopicPrefix;

    /// Checks if this processor handles the event's topic.
    fn handles(&self, event: &Event) -> bool {
        self.topic_prefix().matches(&event.topic)
    }

    /// Display title. Defaults to the topic without its environment prefix.
    fn title(&self, event: &Event) -> String {
        event.topic.without_env_prefix().to_string()
    }

    /// One-line description of the event, if the family is recognized.
    fn subtitle(&self, event: &Event) -> Option<String>;

    /// Canonical link to the affected entity.
    fn link(&self, event: &Event) -> Option<String>;

    /// Icon of the source system.
    fn icon(&self, event: &Event) -> Option<String>;

    /// Avatar of the acting user.
    fn secondary_icon(&self, event: &Event) -> Option<String>;

    /// Accounts of the humans involved.
    fn usernames(&self, event: &Event) -> BTreeSet<String>;

    /// Domain objects touched by the event.
    fn objects(&self, event: &Event) -> BTreeSet<String>;

    /// Collects every query into one [`Annotation`].
    fn annotate(&self, event: &Event) -> Annotation {
        Annotation {
            title: self.title(event),
            subtitle: self.subtitle(event),
            link: self.link(event),
            icon: self.icon(event),
            secondary_icon: self.secondary_icon(event),
            usernames: self.usernames(event),
            objects: self.objects(event),
        }
    }
}
