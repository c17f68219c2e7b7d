//! Keyed async mutexes.
//!
//! Two rapid reactions on the same message would otherwise interleave their
//! fetch-embed / compute / edit sequences and the second edit could clobber
//! the first (a lost update). Serializing per message id removes the race;
//! the same primitive keyed by guild id serializes reindex runs.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A set of async mutexes addressed by string key. Acquiring a key that is
/// already held suspends until the holder releases it; distinct keys never
/// contend with each other.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    /// Creates an empty lock set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutex for `key`, creating it on first use. The returned
    /// guard releases the key when dropped.
    ///
    /// Entries are never evicted; the map stays bounded by the number of
    /// distinct tally targets and guilds this process has touched.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_same_key_serializes() {
        let locks = KeyedLocks::new();

        let guard = locks.acquire("msg-1").await;
        assert!(
            timeout(SHORT, locks.acquire("msg-1")).await.is_err(),
            "second acquire of a held key must block"
        );

        drop(guard);
        assert!(timeout(SHORT, locks.acquire("msg-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_contend() {
        let locks = KeyedLocks::new();

        let _guard = locks.acquire("msg-1").await;
        assert!(timeout(SHORT, locks.acquire("msg-2")).await.is_ok());
    }
}
