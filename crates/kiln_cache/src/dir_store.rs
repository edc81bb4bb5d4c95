//! Directory-backed artifact storage.
//!
//! Each key owns one file named after its hex pair, so unrelated keys never
//! contend. A file is a small bincode header (magic, container version,
//! payload checksum) followed by the raw artifact bytes. Writes go to a
//! temp file in the same directory and land with a rename, so a concurrent
//! reader sees either the old entry or the new one, never a half-written
//! file. The header versions the cache container only; the artifact payload
//! itself carries no format tags.

use crate::error::CacheError;
use crate::key::CacheKey;
use crate::store::CacheStore;
use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Magic bytes identifying a kiln cache artifact.
const ARTIFACT_MAGIC: [u8; 4] = *b"KILN";

/// Current container format version. Increment on breaking changes to the
/// header layout.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Header prepended to every artifact file for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactHeader {
    /// Must be `b"KILN"`.
    magic: [u8; 4],
    /// Container format version.
    format_version: u32,
    /// Content hash of the payload, for corruption detection.
    checksum: ContentHash,
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A persistent store keeping one artifact file per key.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Returns the file path for a key.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.kiln"))
    }

    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".tmp-{}-{n}", std::process::id()))
    }
}

impl CacheStore for DirStore {
    /// Reads and validates an entry. Fail-safe: a missing file, bad magic,
    /// wrong container version, or checksum mismatch is a miss.
    fn load(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let raw = std::fs::read(self.entry_path(key)).ok()?;
        if raw.len() < 4 {
            return None;
        }
        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }
        let header: ArtifactHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;
        if header.magic != ARTIFACT_MAGIC || header.format_version != ARTIFACT_FORMAT_VERSION {
            return None;
        }
        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }
        Some(payload.to_vec())
    }

    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            checksum: ContentHash::from_bytes(bytes),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // 4-byte header length (little-endian) + header + payload
        let mut output = Vec::with_capacity(4 + header_bytes.len() + bytes.len());
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(bytes);

        let temp = self.temp_path();
        std::fs::write(&temp, &output).map_err(|e| CacheError::Io {
            path: temp.clone(),
            source: e,
        })?;
        let path = self.entry_path(key);
        std::fs::rename(&temp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            CacheError::Io { path, source: e }
        })?;
        Ok(())
    }
}
