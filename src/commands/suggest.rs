use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::SuggestArgs;
use crate::commands::{completion_client, emit};
use crate::llm::{CompletionBackend, prompt};

pub fn run(args: SuggestArgs) -> Result<()> {
    let chatmd = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    if chatmd.trim().is_empty() {
        bail!("{} is empty", args.input.display());
    }

    let client = completion_client(&args.endpoints)?;
    let mut suggestions = request_suggestions(&client, &chatmd, args.section.as_deref())?;
    if !suggestions.ends_with('\n') {
        suggestions.push('\n');
    }
    emit(None, &suggestions)
}

pub fn request_suggestions(
    backend: &dyn CompletionBackend,
    chatmd: &str,
    section: Option<&str>,
) -> Result<String> {
    info!(
        backend = backend.name(),
        section = section.unwrap_or(""),
        "requesting improvement suggestions"
    );

    let messages = prompt::suggestion_messages(chatmd, section);
    backend
        .complete(&messages, prompt::SUGGESTION_TEMPERATURE)
        .with_context(|| format!("suggestion request via {} failed", backend.name()))
}
