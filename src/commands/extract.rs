use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ExtractArgs;
use crate::commands::emit;
use crate::extract::extract_text;

pub fn run(args: ExtractArgs) -> Result<()> {
    let text = extract_text(&args.input)
        .with_context(|| format!("failed to extract text from {}", args.input.display()))?;

    info!(
        input = %args.input.display(),
        chars = text.chars().count(),
        "extracted text"
    );

    let mut contents = text;
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    emit(None, &contents)
}
