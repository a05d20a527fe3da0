// src/flags.rs
// =============================================================================
// This module persists the two one-time UI flags across application restarts:
//
// - announcement_closed: the user dismissed the announcement banner
// - stats_viewed: the statistics section was revealed once already
//
// Both flags only ever move from false to true. Reads treat "absent" and
// "unreadable" as false, so a missing or corrupt file never breaks startup.
//
// Storage is a small JSON object (string keys to string values) in the user
// config directory. The storage itself sits behind the KeyValueStore trait
// so tests can swap in an in-memory map.
//
// Rust concepts:
// - async-trait: Traits with async methods need this macro (for now)
// - Trait objects: FlagStore holds a Box<dyn KeyValueStore>, not a concrete
//   type, so the backing store is chosen by the caller
// =============================================================================

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

/// The flags the client persists. Keys are namespaced so the store file
/// stays unambiguous if more entries join later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedFlag {
    AnnouncementClosed,
    StatsViewed,
}

impl PersistedFlag {
    pub fn key(self) -> &'static str {
        match self {
            PersistedFlag::AnnouncementClosed => "phishshield.announcement_closed",
            PersistedFlag::StatsViewed => "phishshield.stats_viewed",
        }
    }
}

// A minimal durable string-to-string store.
//
// Only what the flags need: point reads and point writes. No delete, no
// listing - flags are never reset by the client.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

// JSON-file-backed store: a flat map serialized as pretty JSON.
//
// Each write re-reads the file first so concurrent processes at worst lose
// one flag write, never corrupt the map.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The default location: <user config dir>/phishshield/flags.json
    pub fn at_default_path() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("no user config directory found"))?;
        Ok(Self::new(base.join("phishshield").join("flags.json")))
    }

    async fn read_map(&self) -> Result<HashMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // No file yet means no flags set
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e).context("reading flags file"),
        };
        serde_json::from_str(&raw).context("parsing flags file")
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map().await.unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("creating flags directory")?;
        }

        let serialized = serde_json::to_string_pretty(&map)?;
        tokio::fs::write(&self.path, serialized)
            .await
            .context("writing flags file")
    }
}

// The typed view over the raw store.
//
// get() never fails from the caller's perspective: a read error is logged
// and reported as false, which matches "absent = false".
pub struct FlagStore {
    store: Box<dyn KeyValueStore>,
}

impl FlagStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, flag: PersistedFlag) -> bool {
        match self.store.get(flag.key()).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::warn!("could not read flag {}: {:#}", flag.key(), e);
                false
            }
        }
    }

    /// Flags only ever transition to true, so set() takes no value.
    pub async fn set(&self, flag: PersistedFlag) {
        if let Err(e) = self.store.set(flag.key(), "true").await {
            log::warn!("could not persist flag {}: {:#}", flag.key(), e);
        }
    }
}

// In-memory store for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for something this small?
//    - The real store touches the filesystem, which makes tests slow and
//      machine-dependent
//    - With a trait, tests hand the FlagStore an in-memory map instead
//    - The rest of the code never knows the difference
//
// 2. What is #[async_trait]?
//    - Stable Rust can't (yet) put async fn directly in object-safe traits
//    - The async-trait macro rewrites the methods to return boxed futures
//    - Usage looks exactly like a normal async method
//
// 3. Why does get() swallow errors?
//    - A broken flags file should not break the application
//    - "Couldn't read" and "never set" lead to the same behavior anyway:
//      treat the flag as false and carry on
//    - The error still goes to the log so it can be diagnosed
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::testing::MemoryStore;
    use super::*;

    #[tokio::test]
    async fn test_absent_flag_is_false() {
        let flags = FlagStore::new(Box::new(MemoryStore::default()));
        assert!(!flags.get(PersistedFlag::AnnouncementClosed).await);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let flags = FlagStore::new(Box::new(MemoryStore::default()));
        flags.set(PersistedFlag::StatsViewed).await;
        assert!(flags.get(PersistedFlag::StatsViewed).await);
        // The other flag is independent
        assert!(!flags.get(PersistedFlag::AnnouncementClosed).await);
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");

        let flags = FlagStore::new(Box::new(JsonFileStore::new(path.clone())));
        assert!(!flags.get(PersistedFlag::AnnouncementClosed).await);
        flags.set(PersistedFlag::AnnouncementClosed).await;

        // A second store over the same file sees the persisted value,
        // like a fresh application start would
        let reopened = FlagStore::new(Box::new(JsonFileStore::new(path)));
        assert!(reopened.get(PersistedFlag::AnnouncementClosed).await);
        assert!(!reopened.get(PersistedFlag::StatsViewed).await);
    }

    #[tokio::test]
    async fn test_json_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");

        let store = JsonFileStore::new(path.clone());
        store.set("phishshield.announcement_closed", "true").await.unwrap();
        store.set("phishshield.stats_viewed", "true").await.unwrap();

        assert_eq!(
            store.get("phishshield.announcement_closed").await.unwrap(),
            Some("true".to_string())
        );
    }
}
