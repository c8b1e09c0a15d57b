//! Disk-backed store for the persistent cache tier
//!
//! Stores one JSON file per key in an XDG-compliant cache directory so that
//! entries survive application restarts.

use directories::ProjectDirs;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CacheEntry;
use crate::query::QueryKey;

/// Extension of cache entry files
const ENTRY_EXTENSION: &str = "json";

/// Reads and writes cache entries as files in a directory
///
/// Uses `~/.cache/recipebox/` on Linux by default. Writes are staged in a
/// temporary file and renamed into place, so a reader never sees a partially
/// written entry.
#[derive(Debug, Clone)]
pub struct DiskStore {
    /// Directory where entry files are stored
    cache_dir: PathBuf,
}

impl DiskStore {
    /// Creates a store in the platform cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        default_cache_dir().map(Self::with_dir)
    }

    /// Creates a store in a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of the entry file for the given key
    fn entry_path(&self, key: &QueryKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", file_stem(key), ENTRY_EXTENSION))
    }

    /// Writes an entry, replacing any previous entry for the same key
    pub fn write(&self, entry: &CacheEntry) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let path = self.entry_path(&entry.key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &path).inspect_err(|_| {
            let _ = fs::remove_file(&staging);
        })
    }

    /// Reads the entry for a key
    ///
    /// Returns `None` if the file doesn't exist, cannot be parsed, or was
    /// written for a different key.
    pub fn read(&self, key: &QueryKey) -> Option<CacheEntry> {
        let content = fs::read_to_string(self.entry_path(key)).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        (entry.key == *key).then_some(entry)
    }

    pub fn remove(&self, key: &QueryKey) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Deletes every entry file in the cache directory
    ///
    /// Other files (such as the log file) are left alone.
    pub fn clear(&self) -> io::Result<()> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Platform cache directory for recipebox
pub fn default_cache_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "recipebox")?;
    Some(project_dirs.cache_dir().to_path_buf())
}

/// Escapes a key into a file name
///
/// Lowercase ASCII letters, digits, `-`, `_` and `.` pass through; every
/// other byte becomes `%XX`. The mapping is injective, so distinct keys
/// never share a file.
fn file_stem(key: &QueryKey) -> String {
    let mut stem = String::with_capacity(key.as_str().len());
    for byte in key.as_str().bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => stem.push(byte as char),
            _ => {
                let _ = write!(stem, "%{:02X}", byte);
            }
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Tier;
    use crate::data::{RecipePayload, RecipeSummary};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_store() -> (DiskStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = DiskStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn entry(key: &str, titles: &[&str]) -> CacheEntry {
        let items = titles
            .iter()
            .enumerate()
            .map(|(i, title)| RecipeSummary {
                id: i as u64,
                title: title.to_string(),
                image: None,
            })
            .collect();
        CacheEntry {
            key: QueryKey::from(key),
            payload: RecipePayload::List(items),
            stored_at: Utc::now(),
            tier: Tier::Persistent,
        }
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (store, temp_dir) = create_test_store();

        store
            .write(&entry("trending:10", &["Soup"]))
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("trending%3A10.json");
        assert!(expected_path.exists(), "Entry file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"Soup\""));
        assert!(content.contains("\"stored_at\""));
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.read(&QueryKey::from("trending:10")).is_none());
    }

    #[test]
    fn test_read_returns_written_entry() {
        let (store, _temp_dir) = create_test_store();
        let written = entry("vegetarian:15", &["Salad", "Curry"]);

        store.write(&written).expect("Write should succeed");
        let read = store
            .read(&QueryKey::from("vegetarian:15"))
            .expect("Should read entry");

        assert_eq!(read.payload, written.payload);
        assert_eq!(read.tier, Tier::Persistent);
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (store, _temp_dir) = create_test_store();

        store.write(&entry("trending:10", &["First"])).unwrap();
        store.write(&entry("trending:10", &["Second"])).unwrap();

        let read = store.read(&QueryKey::from("trending:10")).unwrap();
        assert_eq!(read.payload.as_list().unwrap()[0].title, "Second");
    }

    #[test]
    fn test_no_staging_file_left_behind() {
        let (store, temp_dir) = create_test_store();
        store.write(&entry("trending:10", &["Soup"])).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join("trending%3A10.json"), "{not json").unwrap();

        assert!(store.read(&QueryKey::from("trending:10")).is_none());
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let store = DiskStore::with_dir(nested_path.clone());

        store.write(&entry("trending:10", &["Soup"])).unwrap();

        assert!(nested_path.join("trending%3A10.json").exists());
    }

    #[test]
    fn test_clear_removes_entries_but_keeps_other_files() {
        let (store, temp_dir) = create_test_store();
        store.write(&entry("trending:10", &["Soup"])).unwrap();
        store.write(&entry("vegetarian:15", &["Salad"])).unwrap();
        fs::write(temp_dir.path().join("recipebox.log"), "log line").unwrap();

        store.clear().expect("Clear should succeed");

        assert!(store.read(&QueryKey::from("trending:10")).is_none());
        assert!(store.read(&QueryKey::from("vegetarian:15")).is_none());
        assert!(temp_dir.path().join("recipebox.log").exists());
    }

    #[test]
    fn test_clear_on_missing_directory_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskStore::with_dir(temp_dir.path().join("never-created"));
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_stem_escapes_unsafe_bytes() {
        assert_eq!(file_stem(&QueryKey::from("search:mac & cheese")), "search%3Amac%20%26%20cheese");
        assert_eq!(file_stem(&QueryKey::from("search:a/b")), "search%3Aa%2Fb");
    }

    #[test]
    fn test_file_stem_is_injective_for_percent() {
        // A literal "%3A" in a term must not alias an escaped ':'
        assert_ne!(
            file_stem(&QueryKey::from("search:%3A")),
            file_stem(&QueryKey::from("search::"))
        );
    }

    #[test]
    fn test_default_cache_dir_mentions_project() {
        if let Some(dir) = default_cache_dir() {
            assert!(dir.to_string_lossy().contains("recipebox"));
        }
        // Passes when no home directory exists (e.g. in CI)
    }
}
