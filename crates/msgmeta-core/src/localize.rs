//! Translation hook for subtitle templates.

use std::borrow::Cow;
use std::collections::HashMap;

/// Looks up the translated form of a template string.
///
/// Templates keep their `{placeholder}` names across languages.
pub trait Localizer: Send + Sync {
    fn translate<'a>(&'a self, template: &'a str) -> Cow<'a, str>;
}

/// Returns templates unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Localizer for Passthrough {
    fn translate<'a>(&'a self, template: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(template)
    }
}

/// A fixed template-to-translation table, with passthrough for misses.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for Catalog {
    fn translate<'a>(&'a self, template: &'a str) -> Cow<'a, str> {
        match self.entries.get(template) {
            Some(translated) => Cow::Borrowed(translated.as_str()),
            None => Cow::Borrowed(template),
        }
    }
}
