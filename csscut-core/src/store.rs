//! Persistent fingerprint → CachedStyle storage.
//!
//! The core only needs get/put against an already-open store; the backing
//! engine is external. `FileStore` keeps one JSON record per fingerprint in
//! a local directory. Entries are write-once — the core never updates or
//! deletes them.

use crate::types::{CachedStyle, PageFingerprint};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage abstraction for precise reduction results.
///
/// A miss is `Ok(None)`, not an error. `put` must be idempotent per key:
/// writing a fingerprint that already has an entry is a no-op.
pub trait StyleStore: Send + Sync {
    fn get(&self, key: &PageFingerprint) -> Result<Option<CachedStyle>>;
    fn put(&mut self, key: &PageFingerprint, style: &CachedStyle) -> Result<()>;
}

/// File-based store: one `<hex-fingerprint>.json` per entry.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store directory.
    ///
    /// With `clean_on_start` the directory is removed first, dropping every
    /// cached reduction.
    pub fn open(dir: &str, clean_on_start: bool) -> Result<Self> {
        if clean_on_start && Path::new(dir).exists() {
            fs::remove_dir_all(dir)
                .with_context(|| format!("failed to clean style store at {}", dir))?;
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create style store at {}", dir))?;

        Ok(Self {
            dir: PathBuf::from(dir),
        })
    }

    fn entry_path(&self, key: &PageFingerprint) -> PathBuf {
        self.dir.join(format!("{}.json", key.to_hex()))
    }
}

impl StyleStore for FileStore {
    fn get(&self, key: &PageFingerprint) -> Result<Option<CachedStyle>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json_str = fs::read_to_string(&path)?;
        let style: CachedStyle = serde_json::from_str(&json_str)
            .map_err(|e| anyhow!("failed to deserialize cached style: {}", e))?;
        Ok(Some(style))
    }

    fn put(&mut self, key: &PageFingerprint, style: &CachedStyle) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            // Write-once: never overwrite an existing entry
            return Ok(());
        }
        let json_str = serde_json::to_string_pretty(style)
            .map_err(|e| anyhow!("failed to serialize cached style: {}", e))?;
        fs::write(&path, json_str)?;
        Ok(())
    }
}

/// In-memory store for tests and cache-less operation.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<PageFingerprint, CachedStyle>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StyleStore for MemoryStore {
    fn get(&self, key: &PageFingerprint) -> Result<Option<CachedStyle>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &PageFingerprint, style: &CachedStyle) -> Result<()> {
        self.entries.entry(key.clone()).or_insert_with(|| style.clone());
        Ok(())
    }
}
