//! Account identity and avatar resolution.
//!
//! Forge users and commit authors are mapped onto bus-wide accounts here.
//! Lookups never fail loudly: an unknown email is `None` and callers show
//! the raw address instead.

use crate::config::{AvatarConfig, IdentityConfig};
use crate::text::fill;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Resolves accounts and their avatars.
pub trait IdentityResolver: Send + Sync {
    /// Image URL for an account.
    fn avatar_url(&self, identity: &str) -> String;

    /// Account owning an email address, if known.
    fn user_from_email(&self, email: &str) -> Option<String>;
}

/// Resolver backed by static configuration.
///
/// Addresses at the configured domain map to their local part; everything
/// else goes through the explicit email table. Avatars are libravatar URLs
/// keyed by the SHA-256 of the account's OpenID.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    avatar: AvatarConfig,
    identity: IdentityConfig,
}

impl StaticIdentity {
    pub fn new(avatar: AvatarConfig, identity: IdentityConfig) -> Self {
        Self { avatar, identity }
    }

    fn openid(&self, identity: &str) -> String {
        fill(&self.avatar.openid, &[("user", identity)])
    }
}

impl IdentityResolver for StaticIdentity {
    fn avatar_url(&self, identity: &str) -> String {
        let digest = Sha256::digest(self.openid(identity).as_bytes());
        format!(
            "{}/avatar/{}?s={}&d={}",
            self.avatar.service.trim_end_matches('/'),
            hex::encode(digest),
            self.avatar.size,
            self.avatar.default
        )
    }

    fn user_from_email(&self, email: &str) -> Option<String> {
        if let Some(domain) = &self.identity.email_domain
            && let Some((local, host)) = email.rsplit_once('@')
            && host.eq_ignore_ascii_case(domain)
            && !local.is_empty()
        {
            return Some(local.to_string());
        }

        let found = self.identity.emails.get(email).cloned();
        if found.is_none() {
            debug!(email, "No account for email");
        }
        found
    }
}

/// Default number of email lookups kept by [`CachedIdentity`].
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Memoizes email lookups of another resolver.
///
/// Lookups are idempotent, so misses are cached too. The cache is emptied
/// whenever it would grow past its capacity.
pub struct CachedIdentity<R> {
    inner: R,
    capacity: usize,
    emails: Mutex<HashMap<String, Option<String>>>,
}

impl<R: IdentityResolver> CachedIdentity<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` lookups (minimum 1).
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            emails: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached email lookups.
    pub fn cached(&self) -> usize {
        self.emails.lock().len()
    }
}

impl<R: IdentityResolver> IdentityResolver for CachedIdentity<R> {
    fn avatar_url(&self, identity: &str) -> String {
        self.inner.avatar_url(identity)
    }

    fn user_from_email(&self, email: &str) -> Option<String> {
        if let Some(hit) = self.emails.lock().get(email) {
            return hit.clone();
        }

        // resolve outside the lock; a racing duplicate lookup is harmless
        let resolved = self.inner.user_from_email(email);
        let mut emails = self.emails.lock();
        if emails.len() >= self.capacity && !emails.contains_key(email) {
            debug!(capacity = self.capacity, "Identity cache full, clearing");
            emails.clear();
        }
        emails.insert(email.to_string(), resolved.clone());
        resolved
    }
}
