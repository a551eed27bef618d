use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::chatmd::{ChatmdParser, CheckReport, check_document};
use crate::cli::CheckArgs;
use crate::config::EditorConfig;

pub fn run(args: CheckArgs) -> Result<()> {
    let config = EditorConfig::load_or_create(&args.config)?;
    let text = read_upload(&config, &args.input)?;

    let parser = ChatmdParser::new()?;
    let report = check_document(&parser, &text);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize check report")?;
        println!("{rendered}");
    } else {
        log_report(&args.input, &report);
    }

    if !report.is_valid() {
        bail!(
            "{} is not a valid ChatMD document: {}",
            args.input.display(),
            report.problems().join("; ")
        );
    }

    Ok(())
}

/// Applies the editor's upload rules and returns the document text.
pub fn read_upload(config: &EditorConfig, path: &Path) -> Result<String> {
    if !config.allows_extension(path) {
        bail!(
            "{} has a disallowed extension (allowed: {})",
            path.display(),
            config.allowed_extensions.join(", ")
        );
    }

    let size = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if size > config.max_upload_bytes() {
        bail!(
            "{} is too large: {size} bytes (max: {} KB)",
            path.display(),
            config.max_upload_size_kb
        );
    }

    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    String::from_utf8(bytes)
        .with_context(|| format!("{} is not a valid UTF-8 text file", path.display()))
}

fn log_report(path: &Path, report: &CheckReport) {
    info!(
        input = %path.display(),
        title = report.title.as_deref().unwrap_or(""),
        front_matter = report.front_matter_present,
        blocks = report.block_count,
        links = report.link_count,
        "checked ChatMD document"
    );
    for target in &report.dangling_targets {
        warn!(target = %target, "link target has no matching block");
    }
    for heading in &report.duplicate_headings {
        warn!(heading = %heading, "heading is defined more than once");
    }
}
