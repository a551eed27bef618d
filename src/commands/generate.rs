use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::GenerateArgs;
use crate::commands::{completion_client, emit};
use crate::extract::{SourceFormat, extract_text};
use crate::generate::{Generation, Generator};
use crate::model::GenerationReport;
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

const REPORT_MANIFEST_VERSION: u32 = 1;

pub fn run(args: GenerateArgs) -> Result<()> {
    let params = args.generation.params();
    let format = SourceFormat::from_path(&args.input)?;
    let text = extract_text(&args.input)
        .with_context(|| format!("failed to extract text from {}", args.input.display()))?;
    if text.trim().is_empty() {
        bail!("{} contains no text", args.input.display());
    }

    info!(
        input = %args.input.display(),
        format = format.as_str(),
        chars = text.chars().count(),
        document_type = params.document_type.as_str(),
        offline = args.offline,
        "generating chatbot"
    );

    let (generation, backend_mode) = if args.offline {
        (Generator::offline().generate(&text, &params)?, None)
    } else {
        let client = completion_client(&args.endpoints)?;
        let generation = Generator::with_backend(&client).generate(&text, &params)?;
        (generation, Some(client.mode().get().as_str().to_string()))
    };

    info!(
        strategy = generation.strategy.as_str(),
        fallback_reason = generation.fallback_reason.as_ref().map(|reason| reason.as_str()).unwrap_or("none"),
        sections = generation.section_names.len(),
        "chatbot generated"
    );

    emit(args.output.as_deref(), &generation.chatmd)?;

    if let Some(report_path) = &args.report_path {
        let report = build_report(&args, &text, format, &generation, backend_mode)?;
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote generation report");
    }

    Ok(())
}

fn build_report(
    args: &GenerateArgs,
    text: &str,
    format: SourceFormat,
    generation: &Generation,
    backend_mode: Option<String>,
) -> Result<GenerationReport> {
    Ok(GenerationReport {
        manifest_version: REPORT_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_path: args.input.display().to_string(),
        source_format: format.as_str().to_string(),
        source_sha256: sha256_file(&args.input)?,
        source_char_count: text.chars().count(),
        params: args.generation.params(),
        strategy: generation.strategy.as_str().to_string(),
        fallback_reason: generation
            .fallback_reason
            .as_ref()
            .map(|reason| reason.to_string()),
        backend_mode,
        section_names: generation.section_names.clone(),
        output_path: args.output.as_ref().map(|path| path.display().to_string()),
    })
}
