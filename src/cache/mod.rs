//! Profile cache
//!
//! Maps an opaque access token to the profile decoded from the ID token that
//! was issued alongside it. The token exchange proxy writes entries and the
//! userinfo responder reads them; nothing else touches the cache.
//!
//! # Concurrency contract
//!
//! Implementations are internally synchronized. `set` and `get` are atomic
//! per key and may be called from any number of requests at once without
//! external locking: a `get` racing a `set` on the same key observes either
//! the old or the new profile, never a partial one. There is no ordering
//! guarantee across keys.
//!
//! # Expiry
//!
//! Every entry carries an absolute expiry. A `get` at or after that instant
//! behaves exactly like a `get` on a key that was never set. Expiry is
//! enforced lazily at read time; [`ProfileCache::purge_expired`] is an
//! optional housekeeping hook.

pub mod memory;

pub use memory::MemoryProfileCache;

use crate::model::UserProfile;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Token-keyed store of user profiles with per-entry expiry
pub trait ProfileCache: Send + Sync {
    /// Insert or overwrite the profile for `key`, valid until `expires_at`
    ///
    /// An empty key is ignored.
    fn set(&self, key: &str, profile: UserProfile, expires_at: DateTime<Utc>);

    /// Profile for `key`, or `None` if absent or expired
    fn get(&self, key: &str) -> Option<UserProfile>;

    /// Drop expired entries, returning how many were removed
    fn purge_expired(&self) -> usize {
        0
    }
}

/// Spawn a task that periodically purges expired entries
///
/// Reads still enforce expiry on their own, so the sweep only bounds memory.
pub fn spawn_sweeper(cache: Arc<dyn ProfileCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, "Purged expired profile cache entries");
            }
        }
    })
}

#[cfg(test)]
mod memory_test;
