//! File-backed record store.
//!
//! Each digitized record is persisted as its own JSON file, keyed by a
//! normalized identifier, next to one cumulative index file that holds
//! every record in append order. The index is the single source of
//! truth for readers; it is rewritten through a temp file and rename so
//! a completed append is either fully visible or not at all.

use std::path::{Path, PathBuf};

use relief_common::{DigitizedRecord, ReliefError, Result};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Name of the cumulative index file inside the output directory.
pub const INDEX_FILE: &str = "record_index.json";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoreConfig {
    /// Directory holding per-record files and the index
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// The record store. Owns all persisted records; callers only ever see
/// copies returned by [`RecordStore::load_all`] and
/// [`RecordStore::search`].
pub struct RecordStore {
    config: StoreConfig,
    // At most one writer may touch the index at a time.
    append_lock: Mutex<()>,
}

impl RecordStore {
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        info!(output_dir = %config.output_dir.display(), "Opened record store");
        Ok(Self {
            config,
            append_lock: Mutex::new(()),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    fn index_path(&self) -> PathBuf {
        self.config.output_dir.join(INDEX_FILE)
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.config.output_dir.join(format!("{key}.json"))
    }

    /// Storage key for a record: the normalized document id, falling
    /// back to the stem of the source file name.
    fn storage_key(record: &DigitizedRecord) -> Result<String> {
        let raw = record
            .document_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                Path::new(&record.source_file)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        let key = normalize_key(&raw);
        if key.is_empty() {
            return Err(ReliefError::Store(format!(
                "Record has no usable identifier (document_id: {:?}, source_file: {:?})",
                record.document_id, record.source_file
            )));
        }
        Ok(key)
    }

    /// Persist one record and fold it into the index.
    ///
    /// Re-appending a record whose storage key already exists replaces
    /// the persisted file and the index entry in place; the entry keeps
    /// its original position. Distinct keys always accumulate.
    pub async fn append(&self, record: &DigitizedRecord) -> Result<PathBuf> {
        let key = Self::storage_key(record)?;
        let _guard = self.append_lock.lock().await;

        let json = serde_json::to_string_pretty(record)?;
        let path = self.record_path(&key);
        tokio::fs::write(&path, &json).await?;

        let mut index = self.read_index().await?;
        let existing = index
            .iter()
            .position(|r| Self::storage_key(r).ok().as_deref() == Some(key.as_str()));
        match existing {
            Some(pos) => index[pos] = record.clone(),
            None => index.push(record.clone()),
        }
        self.write_index(&index).await?;

        debug!(
            key = %key,
            path = %path.display(),
            index_len = index.len(),
            replaced = existing.is_some(),
            "Appended record"
        );
        Ok(path)
    }

    /// The full index in append order. An absent index file means no
    /// records yet, not an error.
    pub async fn load_all(&self) -> Result<Vec<DigitizedRecord>> {
        self.read_index().await
    }

    /// Case-insensitive substring match of `query` against the full
    /// JSON serialization of every record, in index order. Deliberately
    /// crude full-text containment; no tokenization, no ranking.
    pub async fn search(&self, query: &str) -> Result<Vec<DigitizedRecord>> {
        let needle = query.to_lowercase();
        let index = self.read_index().await?;

        let mut results = Vec::new();
        for record in index {
            let serialized = serde_json::to_string(&record)?;
            if serialized.to_lowercase().contains(&needle) {
                results.push(record);
            }
        }

        debug!(query = %query, hits = results.len(), "Searched records");
        Ok(results)
    }

    async fn read_index(&self) -> Result<Vec<DigitizedRecord>> {
        match tokio::fs::read_to_string(self.index_path()).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_index(&self, index: &[DigitizedRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(index)?;
        let tmp_path = self.config.output_dir.join(format!("{INDEX_FILE}.tmp"));
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, self.index_path()).await?;
        Ok(())
    }
}

/// Normalize a raw identifier into a storage key: lowercase, with runs
/// of non-alphanumeric characters collapsed to single dashes.
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut last_was_dash = false;
    for c in raw.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c);
            last_was_dash = false;
        } else if !last_was_dash && !key.is_empty() {
            key.push('-');
            last_was_dash = true;
        }
    }
    key.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_collapses_punctuation() {
        assert_eq!(normalize_key("TR-2024/001"), "tr-2024-001");
        assert_eq!(normalize_key("  Claim #42  "), "claim-42");
        assert_eq!(normalize_key("scan_001"), "scan-001");
        assert_eq!(normalize_key("---"), "");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn storage_key_prefers_document_id() {
        let record = DigitizedRecord {
            document_id: Some("TR-2024-001".into()),
            source_file: "scan_001.png".into(),
            ..Default::default()
        };
        assert_eq!(RecordStore::storage_key(&record).unwrap(), "tr-2024-001");
    }

    #[test]
    fn storage_key_falls_back_to_source_stem() {
        let record = DigitizedRecord {
            document_id: None,
            source_file: "scan_001.png".into(),
            ..Default::default()
        };
        assert_eq!(RecordStore::storage_key(&record).unwrap(), "scan-001");
    }

    #[test]
    fn blank_document_id_falls_back_to_source_stem() {
        let record = DigitizedRecord {
            document_id: Some("   ".into()),
            source_file: "scan_002.jpg".into(),
            ..Default::default()
        };
        assert_eq!(RecordStore::storage_key(&record).unwrap(), "scan-002");
    }

    #[test]
    fn keyless_record_is_rejected() {
        let record = DigitizedRecord::default();
        assert!(RecordStore::storage_key(&record).is_err());
    }
}
