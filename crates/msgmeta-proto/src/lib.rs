//! # msgmeta-proto
//!
//! Shared types, error definitions, and traits for msgmeta annotation processors.
//!
//! This crate provides the foundational abstractions used across all msgmeta crates,
//! including:
//! - The `Event` envelope received from the message bus
//! - Topic helpers and prefix patterns for processor routing
//! - The `Processor` trait and the `ProcessorRegistry` that dispatches to it
//! - Common error types

mod annotation;
mod error;
mod event;
mod processor;
mod registry;
mod topic;

pub use annotation::Annotation;
pub use error::{Error, Result};
pub use event::Event;
pub use processor::Processor;
pub use registry::ProcessorRegistry;
pub use topic::{Topic, TopicPrefix};
