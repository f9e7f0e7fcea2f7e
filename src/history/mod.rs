// Conversation history
//
// - Local: JSON file store, the durable source of truth
// - Remote: REST conversation store, used when an auth token is configured
// - Store: merge policy, deduplication, capping and single-slot undo

pub mod local;
pub mod remote;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use local::JsonHistoryStore;
pub use remote::RemoteHistoryStore;
pub use store::ConversationHistory;

use crate::error::Result;
use crate::language::LanguageMode;

/// A saved translation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub input_text: String,
    pub language_mode: LanguageMode,
    pub romanized_script: Option<String>,
    pub english_gloss: String,
    pub created_at: DateTime<Utc>,
}

/// Record contents before the store assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationDraft {
    pub input_text: String,
    pub language_mode: LanguageMode,
    pub romanized_script: Option<String>,
    pub english_gloss: String,
}

impl ConversationDraft {
    pub fn into_record(self) -> ConversationRecord {
        ConversationRecord {
            id: Uuid::new_v4(),
            input_text: self.input_text,
            language_mode: self.language_mode,
            romanized_script: self.romanized_script,
            english_gloss: self.english_gloss,
            created_at: Utc::now(),
        }
    }
}

/// Insert `record` at `position` (clamped), first removing every record with
/// the same id or the same input text, then trimming the list to
/// `max_records`. Returns the removed records other than earlier copies of
/// `record` itself.
pub fn place_record(
    records: &mut Vec<ConversationRecord>,
    record: ConversationRecord,
    position: usize,
    max_records: usize,
) -> Vec<ConversationRecord> {
    let (replaced, kept): (Vec<_>, Vec<_>) = std::mem::take(records)
        .into_iter()
        .partition(|r| r.id == record.id || r.input_text == record.input_text);
    *records = kept;
    let mut displaced: Vec<_> = replaced.into_iter().filter(|r| r.id != record.id).collect();

    let position = position.min(records.len());
    records.insert(position, record);
    if records.len() > max_records {
        displaced.extend(records.drain(max_records.max(1)..));
    }
    displaced
}

/// Document store holding conversation records.
///
/// `list` returns most recent first. `put` applies [`place_record`] as a
/// single change; stores without an ordering of their own may ignore
/// `position`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<ConversationRecord>>;

    /// Store `record`, returning the records it displaced.
    async fn put(
        &self,
        record: ConversationRecord,
        position: usize,
        max_records: usize,
    ) -> Result<Vec<ConversationRecord>>;

    /// Remove a record, returning it when the store can.
    async fn delete(&self, id: Uuid) -> Result<Option<ConversationRecord>>;

    async fn clear(&self) -> Result<()>;

    /// Whether the store may be used at all (e.g. credentials present).
    fn is_available(&self) -> bool;

    fn name(&self) -> &'static str;
}
