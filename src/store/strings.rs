use bytes::Bytes;
use std::collections::{BTreeSet, HashMap};
use tokio::time::{Duration, Instant};

use crate::store::StoreError;

type Key = String;

pub struct Entry {
    pub value: Bytes,
    pub expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Byte values with an optional time-to-live per key.
///
/// Expired entries are treated as absent by every read. `get` purges them on the spot, while
/// `exists` only looks; the dispatch loop sweeps the rest through `remove_expired_keys`, which
/// walks `ttls` in deadline order.
#[derive(Default)]
pub struct StringStore {
    keys: HashMap<Key, Entry>,
    ttls: BTreeSet<(Instant, Key)>,
}

impl StringStore {
    pub fn new() -> StringStore {
        StringStore::default()
    }

    /// Overwrites the value and its TTL together. `None` clears any previous TTL.
    pub fn set(&mut self, key: Key, value: Bytes, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);

        // The old deadline goes first: it may be identical to the new one.
        let previous = self.keys.insert(key.clone(), Entry { value, expires_at });
        if let Some(Entry {
            expires_at: Some(when),
            ..
        }) = previous
        {
            self.ttls.remove(&(when, key.clone()));
        }

        if let Some(expires_at) = expires_at {
            self.ttls.insert((expires_at, key));
        }
    }

    pub fn get(&mut self, key: &str) -> Result<Bytes, StoreError> {
        self.live_entry(key)
            .map(|entry| entry.value.clone())
            .ok_or(StoreError::NoSuchKey)
    }

    /// Removes the key and its TTL. Returns whether a live value was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.keys.remove(key) {
            Some(entry) => {
                if let Some(when) = entry.expires_at {
                    self.ttls.remove(&(when, key.to_string()));
                }
                !entry.is_expired(Instant::now())
            }
            None => false,
        }
    }

    /// Check only, an expired key reports `false` but stays until it is read or swept.
    pub fn exists(&self, key: &str) -> bool {
        let now = Instant::now();
        self.keys.get(key).is_some_and(|entry| !entry.is_expired(now))
    }

    /// Adds `delta` to the base-10 integer stored at `key`, keeping its TTL.
    ///
    /// An absent key starts a fresh counter at `delta`. A value that is not an integer is left
    /// untouched.
    pub fn incr_by(&mut self, key: &str, delta: i64) -> Result<i64, StoreError> {
        let value = match self.live_entry(key) {
            Some(entry) => {
                let current = std::str::from_utf8(&entry.value)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or(StoreError::TypeMismatch)?;
                let value = current.checked_add(delta).ok_or(StoreError::Overflow)?;
                entry.value = Bytes::from(value.to_string());
                value
            }
            None => {
                self.keys.insert(
                    key.to_string(),
                    Entry {
                        value: Bytes::from(delta.to_string()),
                        expires_at: None,
                    },
                );
                delta
            }
        };

        Ok(value)
    }

    pub fn decr_by(&mut self, key: &str, delta: i64) -> Result<i64, StoreError> {
        let delta = delta.checked_neg().ok_or(StoreError::Overflow)?;
        self.incr_by(key, delta)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The earliest pending expiration, if any key has a TTL.
    pub fn next_expiration(&self) -> Option<Instant> {
        self.ttls.iter().next().map(|&(expires_at, _)| expires_at)
    }

    /// Drops every key whose deadline is at or before `now` and returns how many went away.
    pub fn remove_expired_keys(&mut self, now: Instant) -> usize {
        let expired: Vec<(Instant, Key)> = self
            .ttls
            .iter()
            .take_while(|(expires_at, _)| *expires_at <= now)
            .cloned()
            .collect();

        for entry in &expired {
            self.ttls.remove(entry);
            self.keys.remove(&entry.1);
        }

        expired.len()
    }

    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        let expired = self.keys.get(key)?.is_expired(Instant::now());
        if !expired {
            return self.keys.get_mut(key);
        }

        if let Some(Entry {
            expires_at: Some(when),
            ..
        }) = self.keys.remove(key)
        {
            self.ttls.remove(&(when, key.to_string()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test]
    async fn ttl() {
        time::pause();

        let mut store = StringStore::new();

        store.set(
            "user".to_string(),
            Bytes::from("1"),
            Some(Duration::from_secs(10)),
        );

        assert_eq!(store.get("user"), Ok(Bytes::from("1")));

        time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("user"), Ok(Bytes::from("1")));

        time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("user"), Err(StoreError::NoSuchKey));

        // The read purged the key together with its deadline.
        assert!(store.is_empty());
        assert_eq!(store.next_expiration(), None);
    }

    #[tokio::test]
    async fn exists_does_not_purge() {
        time::pause();

        let mut store = StringStore::new();
        store.set(
            "key1".to_string(),
            Bytes::from("value1"),
            Some(Duration::from_millis(100)),
        );

        assert!(store.exists("key1"));

        time::advance(Duration::from_millis(100)).await;

        assert!(!store.exists("key1"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn set_without_ttl_clears_previous_ttl() {
        time::pause();

        let mut store = StringStore::new();
        store.set(
            "key1".to_string(),
            Bytes::from("value1"),
            Some(Duration::from_secs(1)),
        );
        store.set("key1".to_string(), Bytes::from("value2"), None);

        assert_eq!(store.next_expiration(), None);

        time::advance(Duration::from_secs(5)).await;

        assert_eq!(store.get("key1"), Ok(Bytes::from("value2")));
    }

    #[tokio::test]
    async fn remove_expired_keys() {
        time::pause();

        let mut store = StringStore::new();
        store.set(
            "key1".to_string(),
            Bytes::from("value1"),
            Some(Duration::from_secs(10)),
        );
        store.set(
            "key2".to_string(),
            Bytes::from("value2"),
            Some(Duration::from_secs(20)),
        );
        store.set("key3".to_string(), Bytes::from("value3"), None);

        time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.remove_expired_keys(Instant::now()), 1);
        assert_eq!(store.len(), 2);
        assert!(store.exists("key2"));

        time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.remove_expired_keys(Instant::now()), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_expiration(), None);
    }

    #[tokio::test]
    async fn reset_with_same_deadline_is_still_swept() {
        time::pause();

        let mut store = StringStore::new();
        store.set(
            "key1".to_string(),
            Bytes::from("a"),
            Some(Duration::from_millis(100)),
        );
        store.set(
            "key1".to_string(),
            Bytes::from("b"),
            Some(Duration::from_millis(100)),
        );

        assert!(store.next_expiration().is_some());

        time::advance(Duration::from_millis(200)).await;

        assert_eq!(store.remove_expired_keys(Instant::now()), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn delete() {
        let mut store = StringStore::new();
        store.set("key1".to_string(), Bytes::from("value1"), None);

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert_eq!(store.get("key1"), Err(StoreError::NoSuchKey));
    }

    #[test]
    fn incr_and_decr_round_trip() {
        let mut store = StringStore::new();

        for (start, amount) in [(0i64, 1i64), (10, -7), (-5, 100), (i64::MAX - 3, 3)] {
            store.set("n".to_string(), Bytes::from(start.to_string()), None);

            store.incr_by("n", amount).unwrap();
            store.decr_by("n", amount).unwrap();

            assert_eq!(store.get("n"), Ok(Bytes::from(start.to_string())));
        }
    }

    #[test]
    fn incr_missing_key_starts_counter() {
        let mut store = StringStore::new();

        assert_eq!(store.incr_by("hits", 1), Ok(1));
        assert_eq!(store.decr_by("misses", 3), Ok(-3));
        assert_eq!(store.get("misses"), Ok(Bytes::from("-3")));
    }

    #[test]
    fn incr_non_numeric_value() {
        let mut store = StringStore::new();
        store.set("key1".to_string(), Bytes::from("value"), None);

        assert_eq!(store.incr_by("key1", 1), Err(StoreError::TypeMismatch));
        assert_eq!(store.get("key1"), Ok(Bytes::from("value")));
    }

    #[test]
    fn incr_overflow() {
        let mut store = StringStore::new();
        store.set("key1".to_string(), Bytes::from(i64::MAX.to_string()), None);

        assert_eq!(store.incr_by("key1", 1), Err(StoreError::Overflow));
        assert_eq!(store.decr_by("key2", i64::MIN), Err(StoreError::Overflow));
    }

    #[tokio::test]
    async fn incr_keeps_ttl() {
        time::pause();

        let mut store = StringStore::new();
        store.set(
            "n".to_string(),
            Bytes::from("1"),
            Some(Duration::from_secs(1)),
        );
        assert_eq!(store.incr_by("n", 1), Ok(2));

        time::advance(Duration::from_secs(1)).await;

        assert_eq!(store.get("n"), Err(StoreError::NoSuchKey));
    }
}
