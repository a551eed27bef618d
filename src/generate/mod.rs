//! Chatbot generation: ask the model for a structured skeleton, and fall back
//! to the heuristic synthesizer whenever its answer cannot be used.

mod structured;

pub use structured::StructuredChatbot;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{CompletionBackend, prompt};
use crate::model::GenerationParams;
use crate::synth::{self, SECTION_COUNT, normalize_text};

const PREVIEW_CHARS: usize = 100;
/// Welcome block, sections, sub-sections.
const HEURISTIC_DEPTH: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("no JSON object in model response")]
    NoJsonObject,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model response lacks `title` or `welcome_message`")]
    MissingRequiredKeys,
    #[error("model response does not follow the chatbot schema: {0}")]
    SchemaMismatch(String),
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoJsonObject => "no_json_object",
            Self::InvalidJson(_) => "invalid_json",
            Self::MissingRequiredKeys => "missing_required_keys",
            Self::SchemaMismatch(_) => "schema_mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Structured(StructuredChatbot),
    NeedsFallback(FallbackReason),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    Structured,
    Heuristic,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Heuristic => "heuristic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub chatmd: String,
    pub strategy: Strategy,
    pub fallback_reason: Option<FallbackReason>,
    pub section_names: Vec<String>,
}

/// Classifies a raw model answer. Text around the outermost braces is ignored.
pub fn interpret_response(raw: &str) -> GenerationOutcome {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return GenerationOutcome::NeedsFallback(FallbackReason::NoJsonObject);
    };
    if end < start {
        return GenerationOutcome::NeedsFallback(FallbackReason::NoJsonObject);
    }

    let value: Value = match serde_json::from_str(&raw[start..=end]) {
        Ok(value) => value,
        Err(error) => {
            return GenerationOutcome::NeedsFallback(FallbackReason::InvalidJson(
                error.to_string(),
            ));
        }
    };

    let has_required_keys = value
        .as_object()
        .is_some_and(|object| object.contains_key("title") && object.contains_key("welcome_message"));
    if !has_required_keys {
        return GenerationOutcome::NeedsFallback(FallbackReason::MissingRequiredKeys);
    }

    match StructuredChatbot::from_value(value) {
        Ok(chatbot) => GenerationOutcome::Structured(chatbot),
        Err(error) => {
            GenerationOutcome::NeedsFallback(FallbackReason::SchemaMismatch(error.to_string()))
        }
    }
}

/// Runs one generation. Without a backend only the heuristic path is used.
pub struct Generator<'a> {
    backend: Option<&'a dyn CompletionBackend>,
}

impl<'a> Generator<'a> {
    pub fn offline() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: &'a dyn CompletionBackend) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// The model sees normalized text; the heuristic gets `text` as given.
    pub fn generate(&self, text: &str, params: &GenerationParams) -> Result<Generation> {
        if text.trim().is_empty() {
            anyhow::bail!("document contains no text to generate a chatbot from");
        }

        let Some(backend) = self.backend else {
            info!("no completion backend configured; using heuristic synthesis");
            return Ok(heuristic(text, params, None));
        };

        let messages = prompt::generation_messages(&normalize_text(text), params);
        let response = backend
            .complete(&messages, prompt::GENERATION_TEMPERATURE)
            .with_context(|| format!("completion request via {} failed", backend.name()))?;

        debug!(
            preview = %preview(&response),
            chars = response.chars().count(),
            "received model response"
        );

        match interpret_response(&response) {
            GenerationOutcome::Structured(chatbot) => {
                info!(
                    responses = ?chatbot.response_ids(),
                    "using structured model response"
                );
                let section_names = chatbot
                    .welcome_choices
                    .iter()
                    .map(|choice| choice.target.clone())
                    .collect();
                Ok(Generation {
                    chatmd: chatbot.to_chatmd().render_compact(),
                    strategy: Strategy::Structured,
                    fallback_reason: None,
                    section_names,
                })
            }
            GenerationOutcome::NeedsFallback(reason) => {
                warn!(reason = %reason, "model response unusable; falling back to heuristic synthesis");
                Ok(heuristic(text, params, Some(reason)))
            }
        }
    }
}

fn heuristic(text: &str, params: &GenerationParams, reason: Option<FallbackReason>) -> Generation {
    if params.max_depth != HEURISTIC_DEPTH || params.choices_per_level as usize != SECTION_COUNT {
        debug!(
            max_depth = params.max_depth,
            choices_per_level = params.choices_per_level,
            "heuristic synthesis ignores depth and choice settings; emitting the fixed shape"
        );
    }

    let document = synth::synthesize(text, params);
    info!(
        document_type = params.document_type.as_str(),
        sections = ?document.section_names(),
        "heuristic synthesis complete"
    );

    Generation {
        chatmd: document.render(),
        strategy: Strategy::Heuristic,
        fallback_reason: reason,
        section_names: document.section_names(),
    }
}

fn preview(response: &str) -> String {
    response.chars().take(PREVIEW_CHARS).collect()
}
