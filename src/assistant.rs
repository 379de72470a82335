//! Chat assistant backed by a local LLM server (Ollama)
//!
//! The assistant answers bookmark-organization questions. Model choice is
//! discovered at request time from the server's tag list, falling back
//! through a preference order. Transport failures never surface as HTTP
//! errors: the client gets a friendly reply explaining how to start the
//! backend, flagged `success: false`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::constants::PREFERRED_CHAT_MODELS;

/// Persona prepended as a system message to every conversation
const PERSONA: &str = "You are the Webmark assistant, built into a bookmark \
manager. Help users organize their bookmarks into categories, name things \
consistently, and prune what they no longer need. Offer practical web \
browsing productivity tips when asked. Keep responses concise and focused \
on managing the user's collection.";

/// Reply returned when the LLM backend is unreachable
const FALLBACK_REPLY: &str = "I'm having trouble reaching my language model \
backend right now. To enable the assistant:\n\n\
1. Install Ollama from ollama.com\n\
2. Start it (`ollama serve`)\n\
3. Pull a model, e.g. `ollama pull mistral`\n\n\
Once the server is running I can help you organize your bookmarks!";

/// One message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Assistant reply surfaced to the API client
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub content: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// OLLAMA WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the local LLM server
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    /// Create a client for the given base URL (e.g. `http://localhost:11434`)
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Run a conversation through the assistant
    ///
    /// Prepends the persona system message, picks a model, and calls the
    /// chat endpoint. Any failure produces the fallback reply.
    pub async fn chat(&self, messages: &[ChatMessage]) -> ChatReply {
        let mut all_messages = Vec::with_capacity(messages.len() + 1);
        all_messages.push(ChatMessage {
            role: "system".to_string(),
            content: PERSONA.to_string(),
        });
        all_messages.extend_from_slice(messages);

        let model = self.pick_model().await;

        match self.complete(&model, &all_messages).await {
            Ok(content) => ChatReply {
                content,
                success: true,
                error: None,
            },
            Err(e) => {
                warn!("Chat backend unavailable: {e}");
                ChatReply {
                    content: FALLBACK_REPLY.to_string(),
                    success: false,
                    error: Some(e),
                }
            }
        }
    }

    /// Pick the first preferred model the server has pulled
    ///
    /// Prefix match so tagged variants (`mistral:7b`) count. Falls back to
    /// the first preference when discovery fails.
    async fn pick_model(&self) -> String {
        let default = PREFERRED_CHAT_MODELS[0].to_string();

        let url = format!("{}/api/tags", self.endpoint);
        let tags: OllamaTagsResponse = match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json().await {
                Ok(tags) => tags,
                Err(e) => {
                    warn!("Could not decode model list, using default: {e}");
                    return default;
                }
            },
            Ok(resp) => {
                warn!("Model list returned status {}, using default", resp.status());
                return default;
            }
            Err(e) => {
                warn!("Could not fetch model list, using default: {e}");
                return default;
            }
        };

        let available: Vec<String> = tags
            .models
            .iter()
            .map(|m| m.name.to_lowercase())
            .collect();

        for preferred in PREFERRED_CHAT_MODELS {
            if available
                .iter()
                .any(|name| name == preferred || name.starts_with(preferred))
            {
                return preferred.to_string();
            }
        }

        default
    }

    /// Non-streaming chat completion against the Ollama API
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, String> {
        let request = OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: 0.7,
                num_predict: 1024,
            },
        };

        let url = format!("{}/api/chat", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("API returned status: {}", response.status()));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {e}"))?;

        Ok(chat_response
            .message
            .map(|m| m.content)
            .unwrap_or_else(|| "I couldn't generate a response at this time.".to_string()))
    }

    /// Check if the LLM server is reachable
    pub async fn is_server_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
