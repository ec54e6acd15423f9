//! Thin reqwest client for `models/{model}:generateContent`.

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::config::ProviderConfig;
use crate::error::{ReaderError, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shared by the content and speech flows. Cheap to clone.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReaderError::Config(format!("Failed to create HTTP client: {e}")))?;

        if !config.has_api_key() {
            warn!(
                "No API key configured (set {} or provider.api_key); provider calls will be rejected",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let t_start = Instant::now();
        let mut builder = self.client.post(self.endpoint(model)).json(request);
        if !self.api_key.is_empty() {
            builder = builder.header(API_KEY_HEADER, &self.api_key);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let latency_ms = t_start.elapsed().as_secs_f64() * 1000.0;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_default();
            warn!("Gemini {model} returned status {status} ({latency_ms:.0}ms): {detail}");
            return Err(ReaderError::Transport(if detail.is_empty() {
                format!("provider returned {status}")
            } else {
                format!("provider returned {status}: {detail}")
            }));
        }

        debug!("Gemini {model}: {} bytes in {latency_ms:.0}ms", body.len());

        serde_json::from_str(&body)
            .map_err(|e| ReaderError::MalformedResponse(format!("response envelope: {e}")))
    }
}
