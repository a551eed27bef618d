use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ChatMessage, CompletionBackend, EndpointConfig, LlmError};

/// OpenAI-style `chat/completions` client.
pub struct HttpCompletionClient {
    endpoint: EndpointConfig,
    client: Client,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

impl HttpCompletionClient {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|error| LlmError::Transport {
                endpoint: endpoint.name.clone(),
                message: format!("failed to build http client: {error}"),
            })?;

        Ok(Self { endpoint, client })
    }
}

impl CompletionBackend for HttpCompletionClient {
    fn name(&self) -> &str {
        &self.endpoint.name
    }

    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        let mut body = json!({
            "model": self.endpoint.model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(max_tokens) = self.endpoint.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        debug!(
            endpoint = %self.endpoint.name,
            url = %self.endpoint.url,
            model = %self.endpoint.model,
            messages = messages.len(),
            "sending completion request"
        );

        let mut request = self.client.post(&self.endpoint.url).json(&body);
        if let Some(api_key) = &self.endpoint.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().map_err(|error| LlmError::Transport {
            endpoint: self.endpoint.name.clone(),
            message: format!("{} ({error})", self.endpoint.url),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Http {
                endpoint: self.endpoint.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatCompletionResponse =
            response.json().map_err(|error| LlmError::InvalidResponse {
                endpoint: self.endpoint.name.clone(),
                message: error.to_string(),
            })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse {
                endpoint: self.endpoint.name.clone(),
                message: "response contained no choices".to_string(),
            })
    }
}
