//! Content-keyed memoization of normalized tables.
//!
//! The normalizer is a pure function of its reference-list input, so a
//! whole table can be cached keyed by a hash of that input. The backend
//! is injectable: in-memory for a single session, on-disk to survive
//! restarts.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::models::CatalogRef;
use crate::table::DetailTable;

/// Content key for a normalization input: SHA-256 over the serialized
/// reference list and the sample bound. Hex form doubles as a stable
/// file name for the disk backend.
pub fn memo_key(refs: &[CatalogRef], sample_size: usize) -> String {
    let mut hasher = Sha256::new();
    // CatalogRef serialization is infallible: plain strings, no maps.
    let serialized = serde_json::to_vec(refs).unwrap_or_default();
    hasher.update(&serialized);
    hasher.update(sample_size.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Storage backend for memoized tables.
pub trait MemoStore {
    fn get(&self, key: &str) -> Result<Option<DetailTable>>;
    fn put(&mut self, key: &str, table: &DetailTable) -> Result<()>;
}

/// In-process backend; lives as long as the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, DetailTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<DetailTable>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, table: &DetailTable) -> Result<()> {
        self.entries.insert(key.to_string(), table.clone());
        Ok(())
    }
}

/// On-disk backend: one JSON file per key under the given directory.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create memo directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl MemoStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<DetailTable>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read memo entry {}", path.display()))?;
        let table: DetailTable = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse memo entry {}", path.display()))?;
        Ok(Some(table))
    }

    fn put(&mut self, key: &str, table: &DetailTable) -> Result<()> {
        let path = self.entry_path(key);
        let contents = serde_json::to_string(table)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write memo entry {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetailRecord, StatEntry};

    fn sample_refs() -> Vec<CatalogRef> {
        vec![
            CatalogRef::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
            CatalogRef::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
        ]
    }

    fn sample_table() -> DetailTable {
        let mut table = DetailTable::default();
        table.push(DetailRecord {
            name: "Bulbasaur".to_string(),
            id: 1,
            sprite_url: None,
            types: vec!["grass".to_string(), "poison".to_string()],
            height_m: 0.7,
            weight_kg: 6.9,
            abilities: vec!["Overgrow".to_string()],
            stats: vec![StatEntry {
                name: "hp".to_string(),
                value: 45,
            }],
        });
        table
    }

    #[test]
    fn test_memo_key_is_value_determined() {
        let a = memo_key(&sample_refs(), 151);
        let b = memo_key(&sample_refs(), 151);
        assert_eq!(a, b);

        // Different bound or different input: different key
        assert_ne!(a, memo_key(&sample_refs(), 10));
        assert_ne!(a, memo_key(&sample_refs()[..1], 151));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let key = memo_key(&sample_refs(), 151);

        assert!(store.get(&key).expect("get").is_none());
        store.put(&key, &sample_table()).expect("put");
        assert_eq!(store.get(&key).expect("get"), Some(sample_table()));
    }

    #[test]
    fn test_disk_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DiskStore::new(dir.path().join("memo")).expect("store");
        let key = memo_key(&sample_refs(), 151);

        assert!(store.get(&key).expect("get").is_none());
        store.put(&key, &sample_table()).expect("put");
        assert_eq!(store.get(&key).expect("get"), Some(sample_table()));
    }
}
