//! On-disk snapshots of registry pages.
//!
//! Each successful fetch may be written under a key derived from its
//! server-side query. Offline mode reads them back instead of calling the
//! registry.

use crate::config;
use crate::error::{MarketError, Result};
use crate::models::MarketPage;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest file stem written for a snapshot key.
const MAX_STEM_LEN: usize = 180;

/// Stores the raw (unfiltered) page for each distinct registry query.
pub struct SnapshotCache {
    /// Directory where snapshot files are stored.
    pub cache_dir: PathBuf,
}

impl SnapshotCache {
    /// Create a snapshot cache.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// Path of the snapshot file for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", file_stem(key)))
    }

    /// Write a page snapshot.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a partial snapshot behind.
    pub fn store(&self, key: &str, page: &MarketPage) -> Result<()> {
        let dest = self.path_for(key);
        let tmp_dest = dest.with_extension("json.tmp");

        let result = (|| -> Result<()> {
            let body = serde_json::to_vec(page)?;
            fs::write(&tmp_dest, &body)?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }
        result
    }

    /// Read back a snapshot, or `None` if none was stored for `key`.
    ///
    /// A corrupt snapshot is deleted and reported as `NotFound`.
    pub fn load(&self, key: &str) -> Result<Option<MarketPage>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<MarketPage>(&contents) {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                eprintln!("Corrupt snapshot {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Err(MarketError::NotFound(format!(
                    "Snapshot '{}' was corrupt and has been removed. Original error: {}",
                    display_name(&path),
                    e
                )))
            }
        }
    }

    /// Remove all snapshots and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
}

/// Map a query key onto a portable file name.
///
/// Characters outside `[A-Za-z0-9.-]` are hex-escaped so distinct keys never
/// collide; very long keys are truncated and suffixed with their length.
fn file_stem(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => out.push(b as char),
            _ => out.push_str(&format!("_{:02x}", b)),
        }
    }
    if out.len() > MAX_STEM_LEN {
        let mut checksum: u32 = 0;
        for b in key.bytes() {
            checksum = checksum.wrapping_mul(31).wrapping_add(b as u32);
        }
        out.truncate(MAX_STEM_LEN);
        out.push_str(&format!("-{}-{:08x}", key.len(), checksum));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_escapes_separators() {
        assert_eq!(file_stem("limit=20&x"), "limit_3d20_26x");
        assert_ne!(file_stem("a b"), file_stem("a_b"));
    }

    #[test]
    fn long_keys_are_bounded() {
        let key = "filters[market]=".to_string() + &"x".repeat(400);
        assert!(file_stem(&key).len() < MAX_STEM_LEN + 30);
    }
}
