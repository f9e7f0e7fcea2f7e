use tracing::{info, warn};
use uuid::Uuid;

use super::{ConversationDraft, ConversationRecord, HistoryBackend, JsonHistoryStore, RemoteHistoryStore};
use crate::config::HistoryConfig;
use crate::error::{Result, SignBridgeError};

/// The most recently deleted record and where it sat in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeletedRecord {
    record: ConversationRecord,
    position: usize,
}

/// History facade over a durable local store and an optional remote one.
///
/// The local store is always written and its failures are returned. The
/// remote store is written opportunistically; its failures are logged.
pub struct ConversationHistory {
    local: Box<dyn HistoryBackend>,
    remote: Option<Box<dyn HistoryBackend>>,
    max_records: usize,
    last_deleted: Option<DeletedRecord>,
}

impl ConversationHistory {
    pub fn new(
        local: Box<dyn HistoryBackend>,
        remote: Option<Box<dyn HistoryBackend>>,
        max_records: usize,
    ) -> Self {
        Self {
            local,
            remote,
            max_records: max_records.max(1),
            last_deleted: None,
        }
    }

    pub async fn from_config(config: &HistoryConfig) -> Result<Self> {
        let local = JsonHistoryStore::open(&config.path).await?;
        let remote = RemoteHistoryStore::from_config(config)?
            .map(|store| Box::new(store) as Box<dyn HistoryBackend>);
        Ok(Self::new(Box::new(local), remote, config.max_records))
    }

    fn available_remote(&self) -> Option<&dyn HistoryBackend> {
        self.remote.as_deref().filter(|remote| remote.is_available())
    }

    /// Save a translation at the front of the history.
    ///
    /// A record with the same input text is replaced. Records beyond the
    /// cap are dropped from the end. The local store applies all of this as
    /// one write, so a failed save leaves the history as it was.
    pub async fn save(&mut self, draft: ConversationDraft) -> Result<ConversationRecord> {
        let record = draft.into_record();
        self.store(record.clone(), 0).await?;
        Ok(record)
    }

    async fn store(&self, record: ConversationRecord, position: usize) -> Result<()> {
        let displaced = self.local.put(record.clone(), position, self.max_records).await?;
        if !displaced.is_empty() {
            info!(
                "Replaced or dropped {} conversations (limit {})",
                displaced.len(),
                self.max_records
            );
        }

        if let Some(remote) = self.available_remote() {
            if let Err(e) = remote.put(record, position, self.max_records).await {
                warn!("Remote history save failed: {}", e);
            }
        }
        Ok(())
    }

    /// All records in display order, from the same source `list` uses.
    async fn records(&self) -> Result<Vec<ConversationRecord>> {
        if let Some(remote) = self.available_remote() {
            match remote.list().await {
                Ok(records) => return Ok(records),
                Err(e) => warn!("Remote history unavailable, using local store: {}", e),
            }
        }
        self.local.list().await
    }

    /// Most recent first. Uses the remote store when it is available and
    /// reachable, otherwise the local store.
    pub async fn list(&self, limit: usize) -> Result<Vec<ConversationRecord>> {
        let mut records = self.records().await?;
        records.truncate(limit.min(self.max_records));
        Ok(records)
    }

    /// Delete a record shown by `list`, keeping it as the single undoable
    /// deletion. The record may live in either store or both.
    pub async fn delete(&mut self, id: Uuid) -> Result<ConversationRecord> {
        let listed = self.records().await?;
        let position = listed
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SignBridgeError::NotFound(format!("Conversation {}", id)))?;

        let removed_locally = self.local.delete(id).await?.is_some();
        if let Some(remote) = self.available_remote() {
            match remote.delete(id).await {
                Ok(_) => {}
                Err(e) if removed_locally => warn!("Remote history delete failed: {}", e),
                Err(e) => return Err(e),
            }
        }

        let record = listed[position].clone();
        self.last_deleted = Some(DeletedRecord {
            record: record.clone(),
            position,
        });
        Ok(record)
    }

    /// Put a record back at `position`, unchanged. A newer record with the
    /// same input text is replaced by it.
    pub async fn restore(&mut self, record: ConversationRecord, position: usize) -> Result<()> {
        self.store(record, position).await
    }

    /// Restore the most recent deletion, if any.
    pub async fn undo_delete(&mut self) -> Result<Option<ConversationRecord>> {
        let Some(deleted) = self.last_deleted.take() else {
            return Ok(None);
        };
        if let Err(e) = self.restore(deleted.record.clone(), deleted.position).await {
            self.last_deleted = Some(deleted);
            return Err(e);
        }
        Ok(Some(deleted.record))
    }

    pub fn can_undo(&self) -> bool {
        self.last_deleted.is_some()
    }

    pub async fn clear_all(&mut self) -> Result<()> {
        self.local.clear().await?;
        if let Some(remote) = self.available_remote() {
            if let Err(e) = remote.clear().await {
                warn!("Remote history clear failed: {}", e);
            }
        }
        self.last_deleted = None;
        Ok(())
    }
}
