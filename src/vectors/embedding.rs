//! Client for OpenAI-compatible `/embeddings` endpoints.
//!
//! Requests are sent with a blocking `ureq` agent on tokio's blocking pool so
//! that concurrent queries do not stall the async runtime.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::errors::{GraphScoutError, Result};

use super::backend::Embedder;

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedDataItem>,
}

#[derive(Deserialize)]
struct EmbedDataItem {
    embedding: Vec<f32>,
}

/// Embeds query text through an HTTP embeddings API.
#[derive(Clone)]
pub struct HttpEmbedder {
    agent: ureq::Agent,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HttpEmbedder {
    /// Creates an embedder from configuration.
    ///
    /// The API key, if any, is read from the environment variable named by
    /// `api_key_env`; a missing variable means requests go out unauthenticated.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            url: embeddings_url(&config.endpoint),
            model: config.model.clone(),
            api_key: config
                .api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok()),
        }
    }

    /// The fully-qualified embeddings URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn embed_blocking(&self, text: String) -> Result<Vec<f32>> {
        let body = EmbedRequest {
            model: self.model.clone(),
            input: vec![text],
        };

        let mut request = self.agent.post(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", &format!("Bearer {key}"));
        }

        let mut response = request
            .send_json(&body)
            .map_err(|e| GraphScoutError::Embedding {
                message: format!("request to {} failed: {e}", self.url),
            })?;

        let parsed: EmbedResponse =
            response
                .body_mut()
                .read_json()
                .map_err(|e| GraphScoutError::Embedding {
                    message: format!("invalid embeddings response: {e}"),
                })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| GraphScoutError::Embedding {
                message: "embeddings response contained no data".to_string(),
            })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let this = self.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || this.embed_blocking(text))
            .await
            .map_err(|e| GraphScoutError::Embedding {
                message: format!("embedding task failed: {e}"),
            })?
    }
}

/// Appends `/embeddings` to a base URL unless it is already there.
fn embeddings_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/embeddings") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/embeddings")
    }
}
