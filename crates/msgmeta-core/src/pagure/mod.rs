//! Annotation processor for the Pagure forge.
//!
//! Each query classifies the topic, resolves the project identity from the
//! payload, then runs the formatter for the matched family. Missing payload
//! fields degrade the output; nothing here panics or returns an error.

mod facts;
mod subtitle;

use crate::config::MetaConfig;
use crate::identity::{CachedIdentity, IdentityResolver, StaticIdentity};
use crate::localize::{Catalog, Localizer, Passthrough};
use crate::payload::Payload;
use crate::text::fill;
use msgmeta_proto::{Annotation, Event, Processor, Result, TopicPrefix};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Topics published by the dev, staging and production Pagure instances.
pub const TOPIC_PREFIX: &str = r"io\.pagure\.(dev|stg|prod)";

/// Where the forge documents itself.
pub const DOCS_URL: &str = "https://pagure.io/pagure";

/// Processor for `io.pagure.*` events.
pub struct PagureProcessor {
    config: MetaConfig,
    prefix: TopicPrefix,
    identity: Arc<dyn IdentityResolver>,
    localizer: Arc<dyn Localizer>,
}

impl PagureProcessor {
    /// Creates a processor with the resolvers described by `config`.
    pub fn new(config: MetaConfig) -> Result<Self> {
        let identity = CachedIdentity::with_capacity(
            StaticIdentity::new(config.avatar.clone(), config.identity.clone()),
            config.identity.cache_capacity,
        );
        let localizer: Arc<dyn Localizer> = if config.translations.is_empty() {
            Arc::new(Passthrough)
        } else {
            Arc::new(Catalog::new(config.translations.clone()))
        };

        Ok(Self {
            prefix: TopicPrefix::new(TOPIC_PREFIX)?,
            identity: Arc::new(identity),
            localizer,
            config,
        })
    }

    /// Replaces the identity resolver.
    #[must_use]
    pub fn with_identity(mut self, identity: impl IdentityResolver + 'static) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Replaces the template localizer.
    #[must_use]
    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Arc::new(localizer);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    /// Translates a template and fills in its placeholders.
    fn render(&self, template: &str, args: &[(&str, &str)]) -> String {
        fill(&self.localizer.translate(template), args)
    }
}

impl Processor for PagureProcessor {
    fn name(&self) -> &str {
        "pagure"
    }

    fn description(&self) -> &str {
        "Pagure forge"
    }

    fn home_url(&self) -> Option<&str> {
        Some(self.config.base_url())
    }

    fn docs_url(&self) -> Option<&str> {
        Some(DOCS_URL)
    }

    fn object_kind(&self) -> &str {
        "Pagure forge"
    }

    fn topic_prefix(&self) -> &TopicPrefix {
        &self.prefix
    }

    fn subtitle(&self, event: &Event) -> Option<String> {
        self.subtitle_for(&event.topic, &Payload::parse(&event.payload))
    }

    fn link(&self, event: &Event) -> Option<String> {
        self.link_for(&event.topic, &Payload::parse(&event.payload))
    }

    fn icon(&self, _event: &Event) -> Option<String> {
        Some(self.config.icon.clone())
    }

    fn secondary_icon(&self, event: &Event) -> Option<String> {
        self.secondary_icon_for(&Payload::parse(&event.payload))
    }

    fn usernames(&self, event: &Event) -> BTreeSet<String> {
        self.usernames_for(&event.topic, &Payload::parse(&event.payload))
    }

    fn objects(&self, event: &Event) -> BTreeSet<String> {
        self.objects_for(&event.topic, &Payload::parse(&event.payload))
    }

    fn annotate(&self, event: &Event) -> Annotation {
        let payload = Payload::parse(&event.payload);
        let topic = &event.topic;
        debug!(%topic, "Annotating Pagure event");

        Annotation {
            title: self.title(event),
            subtitle: self.subtitle_for(topic, &payload),
            link: self.link_for(topic, &payload),
            icon: self.icon(event),
            secondary_icon: self.secondary_icon_for(&payload),
            usernames: self.usernames_for(topic, &payload),
            objects: self.objects_for(topic, &payload),
        }
    }
}
