use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{LexiconTranslator, SourceText, Translator};
use crate::config::TranslateConfig;
use crate::error::{Result, SignBridgeError};

#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// Translator backed by a LibreTranslate-compatible HTTP service.
///
/// Native script is sent when available since services translate it far
/// better than romanized input.
pub struct RemoteTranslator {
    client: Client,
    config: TranslateConfig,
    fallback: Option<LexiconTranslator>,
}

impl RemoteTranslator {
    pub fn new(config: TranslateConfig, fallback: Option<LexiconTranslator>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            fallback,
        })
    }

    async fn request_gloss(&self, source: &SourceText) -> Result<String> {
        let text = source.script.as_deref().unwrap_or(&source.text);
        let request = TranslationRequest {
            q: text,
            source: source.mode.code(),
            target: "en",
            format: "text",
            api_key: self.config.api_key.as_deref(),
        };

        let url = format!("{}/translate", self.config.endpoint.trim_end_matches('/'));
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SignBridgeError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SignBridgeError::Translation(format!(
                "Translation API error {}: {}",
                status, error_text
            )));
        }

        let body: TranslationResponse = response.json().await.map_err(|e| {
            SignBridgeError::Translation(format!("Failed to parse response: {}", e))
        })?;

        let gloss = body.translated_text.trim().to_string();
        if gloss.is_empty() {
            return Err(SignBridgeError::Translation(
                "Empty translation received".to_string(),
            ));
        }
        Ok(gloss)
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate(&self, source: &SourceText) -> Result<String> {
        match self.request_gloss(source).await {
            Ok(gloss) => Ok(gloss),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    warn!("Remote translation failed, using offline lexicon: {}", e);
                    fallback.translate(source).await
                }
                None => Err(e),
            },
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
