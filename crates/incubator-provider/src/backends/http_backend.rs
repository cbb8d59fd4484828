//! Gemini-style `generateContent` REST backend.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use incubator_core::config::ProviderConfig;
use incubator_core::errors::ProviderError;
use incubator_core::models::GenerationRequest;
use incubator_core::traits::IGenerationBackend;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Unavailable {
                provider: format!("http client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify_status(&self, status: StatusCode, body: &str) -> ProviderError {
        let reason = format!("HTTP {}: {}", status.as_u16(), truncate(body, 200));
        match status {
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { reason },
            StatusCode::REQUEST_TIMEOUT => ProviderError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            },
            s if s.is_server_error() => ProviderError::Transient { reason },
            _ => ProviderError::InvalidRequest { reason },
        }
    }

    fn classify_transport(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ProviderError::Transient {
                reason: e.to_string(),
            }
        }
    }
}

impl IGenerationBackend for HttpBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }]
        });
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.classify_status(status, &text));
        }

        let payload: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    reason: format!("undecodable response body: {e}"),
                })?;

        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse {
                reason: "empty response from provider".to_string(),
            });
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
