//! Cached authenticated sessions.
//!
//! Logging in through the UI on every test is slow and hammers the demo
//! site. A successful login can instead be snapshotted (cookies plus local
//! storage) and restored by identity key on later tests. Restores are
//! read-only from the test's perspective and never run concurrently with
//! another restore; apart from this explicit opt-in cache there is no
//! cross-test persistence.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A browser cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie applies to
    pub domain: String,
    /// Path the cookie applies to
    pub path: String,
    /// Whether the cookie is HTTPS-only
    pub secure: bool,
    /// Whether the cookie is inaccessible to scripts
    pub http_only: bool,
}

impl Cookie {
    /// Create a cookie with root path and relaxed flags
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
        }
    }
}

/// Snapshot of the browser-side session state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Cookies at snapshot time
    pub cookies: Vec<Cookie>,
    /// Local storage keyed by origin
    pub local_storage: HashMap<String, HashMap<String, String>>,
}

impl SessionSnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add a local storage entry
    #[must_use]
    pub fn with_local_storage(mut self, origin: &str, key: &str, value: &str) -> Self {
        self.local_storage
            .entry(origin.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Whether the snapshot carries no state
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.local_storage.is_empty()
    }
}

/// Session cache keyed by identity (email).
///
/// Clones share the underlying store, so a cache created in test setup can
/// be handed to several page objects.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    sessions: Arc<Mutex<HashMap<String, SessionSnapshot>>>,
}

impl SessionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached session by identity key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SessionSnapshot> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(key).cloned())
    }

    /// Store a session snapshot under an identity key
    pub fn store(&self, key: impl Into<String>, snapshot: SessionSnapshot) {
        if let Ok(mut sessions) = self.sessions.lock() {
            let _ = sessions.insert(key.into(), snapshot);
        }
    }

    /// Drop a cached session
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            let _ = sessions.remove(key);
        }
    }

    /// Number of cached sessions
    #[must_use]
    pub fn count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builders() {
        let snapshot = SessionSnapshot::new()
            .with_cookie(Cookie::new("auth", "token-1", "qa-practice.netlify.app"))
            .with_local_storage("https://qa-practice.netlify.app", "user", "admin");

        assert_eq!(snapshot.cookies.len(), 1);
        assert!(!snapshot.is_empty());
        assert_eq!(
            snapshot.local_storage["https://qa-practice.netlify.app"]["user"],
            "admin"
        );
    }

    #[test]
    fn test_cache_keyed_by_identity() {
        let cache = SessionCache::new();
        assert!(cache.get("admin@admin.com").is_none());

        let snapshot =
            SessionSnapshot::new().with_cookie(Cookie::new("auth", "t", "example.com"));
        cache.store("admin@admin.com", snapshot.clone());

        assert_eq!(cache.get("admin@admin.com"), Some(snapshot));
        assert!(cache.get("other@admin.com").is_none());
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = SessionCache::new();
        cache.store("k", SessionSnapshot::new());
        cache.invalidate("k");
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_clones_share_store() {
        let cache = SessionCache::new();
        let clone = cache.clone();
        cache.store("k", SessionSnapshot::new());
        assert_eq!(clone.count(), 1);
    }
}
