//! Processor registry for topic-based dispatch.
//!
//! The registry routes an event to the first registered processor whose
//! topic prefix matches. Processors are consulted in registration order.

use crate::{Annotation, Event, Processor};
use tracing::{debug, info};

/// Dispatches events to the processor that claims their topic.
#[derive(Default)]
pub struct ProcessorRegistry {
    /// Registered processors, in priority order.
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor. Earlier registrations win on overlapping prefixes.
    pub fn register<P>(&mut self, processor: P)
    where
        P: Processor + 'static,
    {
        info!(
            processor = processor.name(),
            prefix = processor.topic_prefix().as_str(),
            "Registered processor"
        );
        self.processors.push(Box::new(processor));
    }

    /// Returns the processor responsible for the event, if any.
    pub fn processor_for(&self, event: &Event) -> Option<&dyn Processor> {
        let found = self
            .processors
            .iter()
            .find(|processor| processor.handles(event))
            .map(Box::as_ref);

        if found.is_none() {
            debug!(topic = %event.topic, "No processor claims topic");
        }
        found
    }

    /// Annotates the event with its processor, or returns `None` if unclaimed.
    pub fn annotate(&self, event: &Event) -> Option<Annotation> {
        self.processor_for(event)
            .map(|processor| processor.annotate(event))
    }

    /// Returns the registered processors in priority order.
    pub fn processors(&self) -> impl Iterator<Item = &dyn Processor> {
        self.processors.iter().map(Box::as_ref)
    }

    /// Returns the names of all registered processors.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|processor| processor.name())
    }

    /// Returns the number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Checks whether no processor is registered.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
