//! Cache module for storing recipe API responses
//!
//! Results are kept in one of two independent tiers: a persistent tier on
//! disk that survives restarts, and a session tier in memory that lives as
//! long as the process. An entry, once written, is served for the rest of
//! its tier's lifetime; there is no expiry or background revalidation.
//!
//! The cache is an optimization only. Write failures are logged and
//! swallowed, and unreadable entries are treated as absent.

mod disk;
mod memory;

pub use disk::{default_cache_dir, DiskStore};
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::warn;

use crate::data::RecipePayload;
use crate::query::QueryKey;

/// Lifetime scope of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Kept on disk until explicitly cleared
    Persistent,
    /// Kept in memory until the process exits
    Session,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Persistent => f.write_str("persistent"),
            Tier::Session => f.write_str("session"),
        }
    }
}

/// A stored payload and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub payload: RecipePayload,
    /// When the payload was written
    pub stored_at: DateTime<Utc>,
    pub tier: Tier,
}

/// Key/value storage with two independent tiers
///
/// None of these operations fail from the caller's point of view: absence is
/// a normal outcome of `get`, and a `set` that cannot be stored is a no-op.
pub trait CacheStore: Send + Sync {
    /// Looks up the entry for `key` in `tier`
    fn get(&self, key: &QueryKey, tier: Tier) -> Option<CacheEntry>;

    /// Stores `payload` under `key` in `tier`, replacing any previous entry
    fn set(&self, key: &QueryKey, payload: &RecipePayload, tier: Tier);

    fn has(&self, key: &QueryKey, tier: Tier) -> bool {
        self.get(key, tier).is_some()
    }

    fn remove(&self, key: &QueryKey, tier: Tier);

    /// Drops every entry of `tier`
    fn clear(&self, tier: Tier);
}

/// Where the persistent tier keeps its entries
#[derive(Debug)]
enum PersistentBackend {
    Disk(DiskStore),
    /// Used when no cache directory is available
    Memory(MemoryStore),
}

/// The production cache: disk for the persistent tier, memory for the session tier
#[derive(Debug)]
pub struct TieredCache {
    persistent: PersistentBackend,
    session: MemoryStore,
}

impl TieredCache {
    /// Creates a cache using the platform cache directory
    ///
    /// Falls back to an in-memory persistent tier if no directory can be
    /// determined.
    pub fn new() -> Self {
        match DiskStore::new() {
            Some(disk) => Self::with_disk(disk),
            None => {
                warn!("no cache directory available, persistent tier kept in memory");
                Self::in_memory()
            }
        }
    }

    /// Creates a cache whose persistent tier lives in `dir`
    pub fn with_dir(dir: PathBuf) -> Self {
        Self::with_disk(DiskStore::with_dir(dir))
    }

    fn with_disk(disk: DiskStore) -> Self {
        Self {
            persistent: PersistentBackend::Disk(disk),
            session: MemoryStore::new(),
        }
    }

    /// Creates a cache with both tiers in memory
    pub fn in_memory() -> Self {
        Self {
            persistent: PersistentBackend::Memory(MemoryStore::new()),
            session: MemoryStore::new(),
        }
    }

    /// Empties both tiers, reporting a failure to delete cached files
    ///
    /// Unlike [`CacheStore::clear`], the disk error is returned so the
    /// `--clear-cache` command can tell the user.
    pub fn clear_all(&self) -> io::Result<()> {
        self.session.clear();
        match &self.persistent {
            PersistentBackend::Disk(disk) => disk.clear(),
            PersistentBackend::Memory(memory) => {
                memory.clear();
                Ok(())
            }
        }
    }
}

impl Default for TieredCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for TieredCache {
    fn get(&self, key: &QueryKey, tier: Tier) -> Option<CacheEntry> {
        let entry = match (tier, &self.persistent) {
            (Tier::Persistent, PersistentBackend::Disk(disk)) => disk.read(key),
            (Tier::Persistent, PersistentBackend::Memory(memory)) => memory.read(key),
            (Tier::Session, _) => self.session.read(key),
        };
        // An entry is only valid in the tier it was written to
        entry.filter(|e| e.tier == tier)
    }

    fn set(&self, key: &QueryKey, payload: &RecipePayload, tier: Tier) {
        let entry = CacheEntry {
            key: key.clone(),
            payload: payload.clone(),
            stored_at: Utc::now(),
            tier,
        };
        match (tier, &self.persistent) {
            (Tier::Persistent, PersistentBackend::Disk(disk)) => {
                if let Err(e) = disk.write(&entry) {
                    warn!(%key, error = %e, "failed to write cache entry, continuing without it");
                }
            }
            (Tier::Persistent, PersistentBackend::Memory(memory)) => memory.write(entry),
            (Tier::Session, _) => self.session.write(entry),
        }
    }

    fn remove(&self, key: &QueryKey, tier: Tier) {
        match (tier, &self.persistent) {
            (Tier::Persistent, PersistentBackend::Disk(disk)) => {
                if let Err(e) = disk.remove(key) {
                    warn!(%key, error = %e, "failed to remove cache entry");
                }
            }
            (Tier::Persistent, PersistentBackend::Memory(memory)) => memory.remove(key),
            (Tier::Session, _) => self.session.remove(key),
        }
    }

    fn clear(&self, tier: Tier) {
        match (tier, &self.persistent) {
            (Tier::Persistent, PersistentBackend::Disk(disk)) => {
                if let Err(e) = disk.clear() {
                    warn!(error = %e, "failed to clear persistent cache");
                }
            }
            (Tier::Persistent, PersistentBackend::Memory(memory)) => memory.clear(),
            (Tier::Session, _) => self.session.clear(),
        }
    }
}
