use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::{place_record, ConversationRecord, HistoryBackend};
use crate::config::HistoryConfig;
use crate::error::{Result, SignBridgeError};

/// Conversation store behind a REST endpoint.
///
/// `GET {endpoint}/conversations` lists, `PUT {endpoint}/conversations/{id}`
/// upserts one record, `DELETE {endpoint}/conversations/{id}` removes one record and
/// `DELETE {endpoint}/conversations` removes all. Every request carries the
/// bearer token; without one the store reports itself unavailable.
pub struct RemoteHistoryStore {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl RemoteHistoryStore {
    pub fn new(endpoint: impl Into<String>, auth_token: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    /// Build the remote store when the configuration names an endpoint.
    pub fn from_config(config: &HistoryConfig) -> Result<Option<Self>> {
        config
            .remote_endpoint
            .as_ref()
            .map(|endpoint| Self::new(endpoint.clone(), config.auth_token.clone()))
            .transpose()
    }

    fn collection_url(&self) -> String {
        format!("{}/conversations", self.endpoint)
    }

    fn record_url(&self, id: Uuid) -> String {
        format!("{}/conversations/{}", self.endpoint, id)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.auth_token.as_ref().ok_or_else(|| {
            SignBridgeError::Persistence("Remote history requires an auth token".to_string())
        })?;
        Ok(request.bearer_auth(token))
    }
}

#[async_trait]
impl HistoryBackend for RemoteHistoryStore {
    async fn list(&self) -> Result<Vec<ConversationRecord>> {
        let response = self
            .authorized(self.client.get(self.collection_url()))?
            .send()
            .await?
            .error_for_status()?;
        let mut records: Vec<ConversationRecord> = response.json().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("Fetched {} remote conversations", records.len());
        Ok(records)
    }

    /// Upserts the record, then deletes whatever it displaced. The service
    /// orders by creation time, so `position` is recomputed from that.
    async fn put(
        &self,
        record: ConversationRecord,
        _position: usize,
        max_records: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let mut records = self.list().await?;
        let position = records
            .iter()
            .position(|r| r.created_at < record.created_at)
            .unwrap_or(records.len());

        self.authorized(self.client.put(self.record_url(record.id)))?
            .json(&record)
            .send()
            .await?
            .error_for_status()?;

        let displaced = place_record(&mut records, record, position, max_records);
        for stale in &displaced {
            self.delete(stale.id).await?;
        }
        Ok(displaced)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<ConversationRecord>> {
        let response = self
            .authorized(self.client.delete(self.record_url(id)))?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        response.error_for_status()?;
        Ok(None)
    }

    async fn clear(&self) -> Result<()> {
        self.authorized(self.client.delete(self.collection_url()))?
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.auth_token.is_some()
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
