//! Event envelope as delivered by the message bus.

use crate::{Result, Topic};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message received from the bus.
///
/// Events are constructed per message by the transport and discarded once
/// annotated. Processors only ever borrow them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// The routing topic for this event.
    pub topic: Topic,

    /// The publisher-defined body of the event.
    #[serde(rename = "msg", alias = "payload", default)]
    pub payload: Value,

    /// The bus-level account that published the event (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Publication time as seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Event {
    /// Creates a new event with the given topic and payload.
    pub fn new(topic: impl Into<Topic>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
            username: None,
            timestamp: None,
        }
    }

    /// Decodes an event envelope from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Sets the bus-level username for this event.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the publication timestamp for this event.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
