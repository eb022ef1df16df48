//! # msgmeta-core
//!
//! Annotation processors for message bus events.
//!
//! This crate provides:
//! - The Pagure forge processor and its per-family formatters
//! - Topic classification and the lenient payload model it reads
//! - Identity/avatar resolution, template localization, and list rendering
//! - Configuration loading

pub mod config;
pub mod family;
pub mod identity;
pub mod localize;
pub mod pagure;
pub mod payload;
pub mod text;

pub use config::{AvatarConfig, ConfigError, IdentityConfig, MetaConfig};
pub use family::{Family, Group};
pub use identity::{CachedIdentity, DEFAULT_CACHE_CAPACITY, IdentityResolver, StaticIdentity};
pub use localize::{Catalog, Localizer, Passthrough};
pub use pagure::PagureProcessor;
pub use payload::{Payload, UNKNOWN_PROJECT};
pub use text::{fill, render_series};

use msgmeta_proto::{ProcessorRegistry, Result};

/// Builds a registry holding every processor this crate provides.
pub fn default_registry(config: MetaConfig) -> Result<ProcessorRegistry> {
    let mut registry = ProcessorRegistry::new();
    registry.register(PagureProcessor::new(config)?);
    Ok(registry)
}
