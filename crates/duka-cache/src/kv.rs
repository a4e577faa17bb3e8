//! Typed slot access with automatic JSON serialization.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{CacheError, KvStore};

/// Maximum retry attempts for optimistic concurrency control.
pub const MAX_UPDATE_RETRIES: u32 = 3;

/// Type-safe cache over a [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KvStore> Cache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist and an error if the stored
    /// bytes don't decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the raw stored bytes.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store.get(key)
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Serialize `value` and store it only if the slot still holds `expected`.
    pub fn compare_and_swap<T: Serialize>(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &T,
    ) -> Result<bool, CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.compare_and_swap(key, expected, &bytes)
    }

    /// Read-modify-write a slot with optimistic concurrency control.
    ///
    /// `f` receives the raw bytes currently stored (or `None`) and returns
    /// the new value. The write only lands if nobody else wrote the slot
    /// in between; otherwise `f` runs again on the fresh bytes, up to
    /// [`MAX_UPDATE_RETRIES`] times.
    ///
    /// # Returns
    /// - `Ok(T)` - The value that was written
    /// - `Err(e)` - `f` failed, or every attempt lost the race
    ///   (`CacheError::ConcurrentModification`)
    pub fn update<T, E, F>(&self, key: &str, mut f: F) -> Result<T, E>
    where
        T: Serialize,
        E: From<CacheError>,
        F: FnMut(Option<&[u8]>) -> Result<T, E>,
    {
        for attempt in 0..MAX_UPDATE_RETRIES {
            let current = self.store.get(key)?;
            let next = f(current.as_deref())?;

            if self.compare_and_swap(key, current.as_deref(), &next)? {
                return Ok(next);
            }

            debug!(key, attempt, "slot changed during update, retrying");
        }

        Err(CacheError::ConcurrentModification(format!(
            "slot '{}': max retries exceeded",
            key
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;
    use std::cell::Cell;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Counter {
        value: u32,
    }

    fn read_counter(bytes: Option<&[u8]>) -> Result<Counter, CacheError> {
        match bytes {
            Some(b) => Ok(serde_json::from_slice(b)?),
            None => Ok(Counter { value: 0 }),
        }
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::new(MemoryStore::new());
        cache.set("counter", &Counter { value: 7 }).unwrap();

        let got: Option<Counter> = cache.get("counter").unwrap();
        assert_eq!(got, Some(Counter { value: 7 }));
        assert_eq!(cache.keys().unwrap(), vec!["counter"]);
    }

    #[test]
    fn test_get_reports_undecodable_bytes() {
        let cache = Cache::new(MemoryStore::new());
        cache.store().set("counter", b"not json").unwrap();

        let got: Result<Option<Counter>, _> = cache.get("counter");
        assert!(matches!(got, Err(CacheError::SerializeError(_))));
        assert_eq!(cache.get_raw("counter").unwrap(), Some(b"not json".to_vec()));
    }

    #[test]
    fn test_update_creates_and_increments() {
        let cache = Cache::new(MemoryStore::new());

        for _ in 0..3 {
            cache
                .update::<_, CacheError, _>("counter", |bytes| {
                    let mut c = read_counter(bytes)?;
                    c.value += 1;
                    Ok(c)
                })
                .unwrap();
        }

        let got: Option<Counter> = cache.get("counter").unwrap();
        assert_eq!(got, Some(Counter { value: 3 }));
    }

    #[test]
    fn test_update_retries_after_interleaved_write() {
        let store = MemoryStore::new();
        let cache = Cache::new(store.clone());
        let rival = Cache::new(store);
        let calls = Cell::new(0);

        let written = cache
            .update::<_, CacheError, _>("counter", |bytes| {
                calls.set(calls.get() + 1);
                let mut c = read_counter(bytes)?;
                if calls.get() == 1 {
                    // Another writer lands between our read and our write.
                    rival.set("counter", &Counter { value: 10 })?;
                }
                c.value += 1;
                Ok(c)
            })
            .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(written, Counter { value: 11 });
    }

    #[test]
    fn test_update_gives_up_when_always_contended() {
        let store = MemoryStore::new();
        let cache = Cache::new(store.clone());
        let rival = Cache::new(store);
        let calls = Cell::new(0u32);

        let result = cache.update::<Counter, CacheError, _>("counter", |_| {
            calls.set(calls.get() + 1);
            rival.set("counter", &Counter { value: calls.get() })?;
            Ok(Counter { value: 0 })
        });

        assert!(matches!(result, Err(CacheError::ConcurrentModification(_))));
        assert_eq!(calls.get(), MAX_UPDATE_RETRIES);
    }

    #[test]
    fn test_update_propagates_closure_error() {
        let cache = Cache::new(MemoryStore::new());
        let result = cache.update::<Counter, CacheError, _>("counter", |_| {
            Err(CacheError::StoreError("boom".to_string()))
        });
        assert!(matches!(result, Err(CacheError::StoreError(_))));
        assert!(!cache.exists("counter").unwrap());
    }
}
