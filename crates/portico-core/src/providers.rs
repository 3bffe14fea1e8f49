//! Pass-through client for third-party text-generation APIs.
//!
//! The contract is deliberately narrow: send a prompt, get text back.
//! Credentials come from the [`ProviderKeyStore`]; nothing here caches or
//! logs key material.

use crate::keys::ProviderKeyStore;
use portico_types::Generation;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-pro";

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GOOGLE_GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single generation request, provider-agnostic.
#[derive(Debug, Clone, Copy)]
pub struct GenerateParams<'a> {
    pub prompt: &'a str,
    pub provider: &'a str,
    /// Provider-specific model name; each provider has a default.
    pub model: Option<&'a str>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unsupported AI provider: {0}")]
    Unsupported(String),

    #[error("{0} API key not configured")]
    NotConfigured(String),

    #[error("{provider} API error: {status}")]
    Upstream {
        provider: String,
        status: reqwest::StatusCode,
        details: String,
    },

    #[error("Error calling {provider} API: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not parse {0} response")]
    MalformedResponse(String),
}

/// HTTP client wrapping the supported text-generation providers.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    keys: Arc<ProviderKeyStore>,
}

impl ProviderClient {
    pub fn new(keys: Arc<ProviderKeyStore>) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, keys })
    }

    /// Generate text with the requested provider.
    pub async fn generate(
        &self,
        params: GenerateParams<'_>,
    ) -> std::result::Result<Generation, GenerateError> {
        match params.provider {
            "openai" => self.generate_openai(params).await,
            "google" => self.generate_google(params).await,
            other => Err(GenerateError::Unsupported(other.to_string())),
        }
    }

    async fn generate_openai(
        &self,
        params: GenerateParams<'_>,
    ) -> std::result::Result<Generation, GenerateError> {
        let api_key = self.require_key("openai")?;
        let model = params.model.unwrap_or(DEFAULT_OPENAI_MODEL);

        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": params.prompt}],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        debug!(target: "portico::ai", "Requesting completion from openai ({model})");
        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| GenerateError::Transport {
                provider: "openai".to_string(),
                source,
            })?;

        let payload = Self::read_payload("openai", response).await?;
        let text = extract_openai_text(&payload)
            .ok_or_else(|| GenerateError::MalformedResponse("openai".to_string()))?;

        Ok(Generation {
            text,
            model: model.to_string(),
            provider: "openai".to_string(),
        })
    }

    async fn generate_google(
        &self,
        params: GenerateParams<'_>,
    ) -> std::result::Result<Generation, GenerateError> {
        let api_key = self.require_key("google")?;
        let model = params.model.unwrap_or(DEFAULT_GOOGLE_MODEL);

        let body = json!({
            "contents": [{"parts": [{"text": params.prompt}]}],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_tokens,
                "topP": 0.95,
                "topK": 40,
            },
        });

        debug!(target: "portico::ai", "Requesting completion from google ({model})");
        let url = format!("{GOOGLE_GENERATE_URL}/{model}:generateContent");
        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|source| GenerateError::Transport {
                provider: "google".to_string(),
                source,
            })?;

        let payload = Self::read_payload("google", response).await?;
        let text = extract_google_text(&payload)
            .ok_or_else(|| GenerateError::MalformedResponse("google".to_string()))?;

        Ok(Generation {
            text,
            model: model.to_string(),
            provider: "google".to_string(),
        })
    }

    fn require_key(&self, provider: &str) -> std::result::Result<String, GenerateError> {
        let credentials = self.keys.get(provider);
        if credentials.is_configured() {
            Ok(credentials.api_key)
        } else {
            Err(GenerateError::NotConfigured(provider.to_string()))
        }
    }

    async fn read_payload(
        provider: &str,
        response: reqwest::Response,
    ) -> std::result::Result<Value, GenerateError> {
        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(GenerateError::Upstream {
                provider: provider.to_string(),
                status,
                details,
            });
        }
        response
            .json()
            .await
            .map_err(|_| GenerateError::MalformedResponse(provider.to_string()))
    }
}

fn extract_openai_text(payload: &Value) -> Option<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}

fn extract_google_text(payload: &Value) -> Option<String> {
    payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
}
