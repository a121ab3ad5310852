//! Generative-text completion for the advisor TUI
//!
//! One blocking `generateContent` round trip per request. No retry; every
//! failure is returned to the caller, which shows it to the user.

use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Error: {var} not found in .env file.")]
    MissingApiKey { var: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("the model returned no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, CompletionError>;

/// Something that turns a prompt into text
pub trait CompletionClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Prompt sent for a user's concern
pub fn build_prompt(concern: &str) -> String {
    format!(
        "Based on the concern '{}', which code review manifesto should I adopt?",
        concern
    )
}

/// Text shown to the user for a finished request
pub fn advice_text(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(e @ CompletionError::MissingApiKey { .. }) => e.to_string(),
        Err(e) => format!("An error occurred: {}", e),
    }
}

/// Google Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    api_key_env: String,
    model: String,
    api_base: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Reads the key from the environment variable named in the config.
    /// A missing key is reported by [`CompletionClient::complete`], not here.
    pub fn from_env(config: &AdvisorConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(api_key, config)
    }

    pub fn new(api_key: Option<String>, config: &AdvisorConfig) -> Self {
        Self {
            api_key,
            api_key_env: config.api_key_env.clone(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl CompletionClient for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CompletionError::MissingApiKey {
                var: self.api_key_env.clone(),
            });
        };

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(model = %self.model, "sending generateContent request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let completion: GenerateResponse = response.json()?;
        extract_text(completion)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(CompletionError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
