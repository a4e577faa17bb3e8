//! Raw byte stores backing the cache.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::CacheError;

/// File extension for slot files written by [`FileStore`].
const SLOT_EXTENSION: &str = "slot";

/// Attempts made to acquire a slot lock before giving up.
const LOCK_ATTEMPTS: u32 = 50;

/// Delay between lock attempts.
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Locks older than this are assumed to belong to a crashed writer.
const STALE_LOCK_AGE: Duration = Duration::from_secs(5);

/// A byte-oriented key-value store.
///
/// Implementations must make `compare_and_swap` atomic with respect to
/// every other writer of the same key, including writers in other
/// processes when the store is shared on disk.
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Unconditionally store `value` under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Store `value` only if the current bytes equal `expected`
    /// (`None` meaning "key absent"). Returns whether the write happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, CacheError> {
        (**self).compare_and_swap(key, expected, value)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

/// Process-local store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::StoreError("memory store lock poisoned".to_string()))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, CacheError> {
        let mut entries = self.lock()?;
        if entries.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Directory-backed store: one file per key.
///
/// Writes go to a temporary file that is renamed over the slot, so a
/// reader never observes a half-written value. `compare_and_swap` holds
/// an exclusive `<slot>.lock` file for the duration of the check and write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), SLOT_EXTENSION))
    }

    fn read_slot(path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slot(path: &Path, value: &[u8]) -> Result<(), CacheError> {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let tmp = path.with_extension(format!(
            "tmp-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Lock `key` by linking a file holding this holder's token into place.
    /// The link either creates the lock complete with its token or fails.
    fn acquire_lock(&self, key: &str) -> Result<SlotLock, CacheError> {
        let path = self.slot_path(key).with_extension("lock");
        let token = lock_token();
        let staged = path.with_extension(format!("lock-{}", token));
        fs::write(&staged, &token)?;

        let claimed = claim_lock(key, &path, &staged, &token);
        let _ = fs::remove_file(&staged);
        claimed.map(|()| SlotLock { path, token })
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Self::read_slot(&self.slot_path(key))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let _lock = self.acquire_lock(key)?;
        Self::write_slot(&self.slot_path(key), value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let _lock = self.acquire_lock(key)?;
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, CacheError> {
        let _lock = self.acquire_lock(key)?;
        let path = self.slot_path(key);
        let current = Self::read_slot(&path)?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        Self::write_slot(&path, value)?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == SLOT_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if let Some(key) = decode_key(stem) {
                        keys.push(key);
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Held while a slot is locked. On drop the lock file is removed if it
/// still carries this holder's token.
struct SlotLock {
    path: PathBuf,
    token: String,
}

impl Drop for SlotLock {
    fn drop(&mut self) {
        match fs::read(&self.path) {
            Ok(held) if held == self.token.as_bytes() => {
                let _ = fs::remove_file(&self.path);
            }
            Ok(_) => warn!(path = %self.path.display(), "slot lock was taken over"),
            Err(_) => {}
        }
    }
}

/// Unique per lock acquisition, across threads and processes.
fn lock_token() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    format!(
        "{}-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed),
        nanos
    )
}

fn claim_lock(key: &str, path: &Path, staged: &Path, token: &str) -> Result<(), CacheError> {
    for attempt in 0..LOCK_ATTEMPTS {
        match fs::hard_link(staged, path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if let Some(stale) = stale_lock_token(path) {
                    reclaim_stale_lock(path, &stale, token);
                    continue;
                }
                debug!(key, attempt, "slot lock busy");
                std::thread::sleep(LOCK_RETRY_DELAY);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CacheError::ConcurrentModification(format!(
        "could not lock slot '{}'",
        key
    )))
}

/// Token of the lock at `path` if that lock is older than
/// [`STALE_LOCK_AGE`]. Age and token come from the same open file.
fn stale_lock_token(path: &Path) -> Option<Vec<u8>> {
    let mut file = File::open(path).ok()?;
    let modified = file.metadata().and_then(|m| m.modified()).ok()?;
    let age = SystemTime::now().duration_since(modified).ok()?;
    if age <= STALE_LOCK_AGE {
        return None;
    }
    let mut stale = Vec::new();
    file.read_to_end(&mut stale).ok()?;
    Some(stale)
}

/// Move the stale lock aside and delete it. If another waiter already
/// replaced it with a live lock, the moved file is that live lock and is
/// linked back into place.
fn reclaim_stale_lock(path: &Path, stale: &[u8], token: &str) {
    let aside = path.with_extension(format!("lock-stale-{}", token));
    if fs::rename(path, &aside).is_err() {
        return;
    }
    match fs::read(&aside) {
        Ok(moved) if moved == stale => {
            warn!(path = %path.display(), "removed stale slot lock");
        }
        _ => {
            let _ = fs::hard_link(&aside, path);
        }
    }
    let _ = fs::remove_file(&aside);
}

/// Encode a key into a filesystem-safe file stem.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte
/// becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
