//! OpenAI-compatible chat collaborator.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI, Groq and any
//! endpoint that exposes `/v1/chat/completions`.
//!
//! Each collaborator owns a role-specific system prompt; the orchestrator's
//! input becomes the single user message of a fresh, stateless conversation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarmwright_core::error::CollaboratorError;
use swarmwright_core::{Collaborator, CollaboratorResponse};
use tracing::{debug, warn};

/// An LLM endpoint playing one role.
pub struct ChatCollaborator {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl ChatCollaborator {
    /// Create a new collaborator with the default 120s HTTP timeout.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: String::new(),
            temperature: 0.7,
            max_tokens: None,
            client: http_client(Duration::from_secs(120)),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Replace the HTTP-level timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, input: &str) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(ApiMessage {
                role: "system".into(),
                content: Some(self.system_prompt.clone()),
            });
        }
        messages.push(ApiMessage {
            role: "user".into(),
            content: Some(input.to_string()),
        });

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Map a non-success HTTP status to an error.
fn classify_status(status: u16, body: String) -> CollaboratorError {
    match status {
        429 => CollaboratorError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => CollaboratorError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        _ => CollaboratorError::Api {
            status_code: status,
            message: body,
        },
    }
}

/// Pull the first choice's text out of a completion.
fn into_response(api_response: ApiResponse) -> Result<CollaboratorResponse, CollaboratorError> {
    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CollaboratorError::InvalidResponse("No choices in response".into()))?;

    Ok(CollaboratorResponse {
        content: choice.message.content.unwrap_or_default(),
        model: api_response.model,
    })
}

#[async_trait]
impl Collaborator for ChatCollaborator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<CollaboratorResponse, CollaboratorError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(collaborator = %self.name, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(input))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollaboratorError::Timeout(format!("{}: {e}", self.name))
                } else {
                    CollaboratorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(collaborator = %self.name, status = status.as_u16(), body = %error_body, "Endpoint returned error");
            return Err(classify_status(status.as_u16(), error_body));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            CollaboratorError::InvalidResponse(format!("Failed to parse response: {e}"))
        })?;

        into_response(api_response)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}
