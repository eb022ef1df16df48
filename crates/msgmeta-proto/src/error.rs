//! Error types shared by all processors.

use thiserror::Error;

/// Errors raised while interpreting an event.
///
/// None of these cross a `Processor` façade: processors catch them and fall
/// back to degraded output.
#[derive(Debug, Error)]
pub enum Error {
    /// A payload lacked a field needed to render a fact.
    #[error("missing field `{0}` in event payload")]
    MissingField(&'static str),

    /// The topic did not contain any known family tag.
    #[error("topic `{0}` does not belong to a known event family")]
    UnknownFamily(String),

    /// A processor registered an invalid topic prefix pattern.
    #[error("invalid topic prefix pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The event envelope could not be decoded.
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using the shared [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
