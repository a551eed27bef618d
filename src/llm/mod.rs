//! Remote chat-completion collaborator.
//!
//! Two endpoints are configured side by side: a local server and a cloud
//! API. Which one is tried first is decided per call by a [`ModeSwitch`].

#[cfg(feature = "llm")]
mod http;
pub mod prompt;
#[cfg(test)]
mod tests;

#[cfg(feature = "llm")]
pub use http::HttpCompletionClient;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_LOCAL_API_URL: &str = "http://localhost:1337/v1/chat/completions";
pub const DEFAULT_LOCAL_MODEL: &str = "mistral:7b";
pub const DEFAULT_CLOUD_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_CLOUD_MODEL: &str = "codestral-latest";
pub const CLOUD_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to reach {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned http {status}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} returned an unreadable completion: {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("local endpoint failed ({local}); cloud fallback failed ({cloud})")]
    BothEndpointsFailed { local: String, cloud: String },
}

/// Anything able to turn a conversation into one completion.
pub trait CompletionBackend {
    fn name(&self) -> &str;

    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError>;
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum BackendMode {
    #[default]
    Local,
    Cloud,
}

impl BackendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

/// Shared, atomically swappable backend mode, local until set. Clones observe
/// the same value.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    cloud: Arc<AtomicBool>,
}

impl ModeSwitch {
    pub fn get(&self) -> BackendMode {
        if self.cloud.load(Ordering::Acquire) {
            BackendMode::Cloud
        } else {
            BackendMode::Local
        }
    }

    /// Returns the previous mode.
    pub fn set(&self, mode: BackendMode) -> BackendMode {
        let previous = self
            .cloud
            .swap(mode == BackendMode::Cloud, Ordering::AcqRel);
        if previous {
            BackendMode::Cloud
        } else {
            BackendMode::Local
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn local(url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            name: "local".to_string(),
            url: url.to_string(),
            model: model.to_string(),
            api_key: None,
            max_tokens: None,
            timeout,
        }
    }

    pub fn cloud(url: &str, model: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            name: "cloud".to_string(),
            url: url.to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            max_tokens: Some(CLOUD_MAX_TOKENS),
            timeout,
        }
    }
}

/// Local endpoint first with a single retry against the cloud endpoint, or
/// cloud only, depending on the current mode.
pub struct FailoverClient {
    local: Box<dyn CompletionBackend>,
    cloud: Box<dyn CompletionBackend>,
    mode: ModeSwitch,
}

impl FailoverClient {
    pub fn new(
        local: Box<dyn CompletionBackend>,
        cloud: Box<dyn CompletionBackend>,
        mode: ModeSwitch,
    ) -> Self {
        Self { local, cloud, mode }
    }

    pub fn mode(&self) -> &ModeSwitch {
        &self.mode
    }
}

impl CompletionBackend for FailoverClient {
    fn name(&self) -> &str {
        "failover"
    }

    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        if self.mode.get() == BackendMode::Cloud {
            return self.cloud.complete(messages, temperature);
        }

        match self.local.complete(messages, temperature) {
            Ok(content) => Ok(content),
            Err(local_error) => {
                warn!(
                    endpoint = self.local.name(),
                    error = %local_error,
                    "local completion failed; retrying against cloud endpoint"
                );
                let content = self
                    .cloud
                    .complete(messages, temperature)
                    .map_err(|cloud_error| LlmError::BothEndpointsFailed {
                        local: local_error.to_string(),
                        cloud: cloud_error.to_string(),
                    })?;
                info!(endpoint = self.cloud.name(), "cloud fallback succeeded");
                Ok(content)
            }
        }
    }
}
