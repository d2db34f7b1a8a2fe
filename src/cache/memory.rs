//! In-memory profile cache
//!
//! Uses DashMap for concurrent access without a global lock. Entries are
//! lost on process restart and are not shared across process instances.

use super::ProfileCache;
use crate::model::UserProfile;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CacheEntry {
    profile: UserProfile,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory profile cache - uses DashMap for per-key atomic access
#[derive(Clone, Default)]
pub struct MemoryProfileCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryProfileCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup as of `now`
    pub(crate) fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<UserProfile> {
        if key.is_empty() {
            return None;
        }

        // Scope the shard guard so the removal below doesn't deadlock
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.profile.clone());
            }
        }

        // A concurrent set may have refreshed the entry in the meantime
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    pub(crate) fn purge_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

impl ProfileCache for MemoryProfileCache {
    fn set(&self, key: &str, profile: UserProfile, expires_at: DateTime<Utc>) {
        if key.is_empty() {
            return;
        }
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                profile,
                expires_at,
            },
        );
    }

    fn get(&self, key: &str) -> Option<UserProfile> {
        self.get_at(key, Utc::now())
    }

    fn purge_expired(&self) -> usize {
        self.purge_at(Utc::now())
    }
}
