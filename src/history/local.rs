use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{place_record, ConversationRecord, HistoryBackend};
use crate::error::{Result, SignBridgeError};

/// Ordered records kept in memory and mirrored to a JSON file.
///
/// Every mutation rewrites the whole file on the blocking pool. The in-memory
/// list only changes once that write has succeeded.
pub struct JsonHistoryStore {
    path: PathBuf,
    records: Mutex<Vec<ConversationRecord>>,
}

impl JsonHistoryStore {
    /// Open the store, starting empty when the file does not exist yet.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SignBridgeError::Persistence(format!(
                    "Corrupt history file {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Loaded {} conversations from {}", records.len(), path.display());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy and commit it only when the write succeeds.
    async fn update<T>(&self, change: impl FnOnce(&mut Vec<ConversationRecord>) -> T) -> Result<T> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let output = change(&mut next);

        let json = serde_json::to_vec_pretty(&next)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .map_err(|e| SignBridgeError::Persistence(format!("History writer failed: {}", e)))??;
        debug!("Wrote {} conversations to {}", next.len(), self.path.display());

        *records = next;
        Ok(output)
    }
}

/// Replace `path` with `contents` through a temporary file in the same
/// directory, so a failed write leaves the previous file intact.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(contents)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| {
        SignBridgeError::Persistence(format!("Failed to write {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

#[async_trait]
impl HistoryBackend for JsonHistoryStore {
    async fn list(&self) -> Result<Vec<ConversationRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn put(
        &self,
        record: ConversationRecord,
        position: usize,
        max_records: usize,
    ) -> Result<Vec<ConversationRecord>> {
        self.update(|records| place_record(records, record, position, max_records))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<ConversationRecord>> {
        self.update(|records| {
            let index = records.iter().position(|r| r.id == id)?;
            Some(records.remove(index))
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.update(|records| records.clear()).await
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
