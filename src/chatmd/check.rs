use std::collections::HashSet;

use serde::Serialize;

use super::ChatmdParser;

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub title: Option<String>,
    pub front_matter_present: bool,
    pub front_matter_error: Option<String>,
    pub block_count: usize,
    pub link_count: usize,
    pub dangling_targets: Vec<String>,
    /// Reported but tolerated; runtimes resolve a repeated heading to its first occurrence.
    pub duplicate_headings: Vec<String>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.problems().is_empty()
    }

    /// Reasons the document would fail to load, in reading order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(error) = &self.front_matter_error {
            problems.push(format!("invalid YAML front matter: {error}"));
        }
        if self.title.is_none() {
            problems.push("missing `# ` title line".to_string());
        }
        if !self.dangling_targets.is_empty() {
            problems.push(format!(
                "links to {} missing block(s): {}",
                self.dangling_targets.len(),
                self.dangling_targets.join(", ")
            ));
        }
        problems
    }
}

pub fn check_document(parser: &ChatmdParser, text: &str) -> CheckReport {
    let parsed = parser.parse(text);
    let document = &parsed.document;

    let front_matter_error = parsed.front_matter.as_deref().and_then(|raw| {
        serde_yaml::from_str::<serde_yaml::Value>(raw)
            .err()
            .map(|error| error.to_string())
    });

    let mut headings = HashSet::<&str>::new();
    let mut duplicate_headings = Vec::<String>::new();
    for block in &document.blocks {
        if !headings.insert(block.heading.as_str())
            && !duplicate_headings.contains(&block.heading)
        {
            duplicate_headings.push(block.heading.clone());
        }
    }

    let choices = document
        .welcome_choices
        .iter()
        .chain(document.blocks.iter().flat_map(|block| block.choices.iter()))
        .collect::<Vec<_>>();

    let mut dangling_targets = Vec::<String>::new();
    for choice in &choices {
        if !headings.contains(choice.target.as_str()) && !dangling_targets.contains(&choice.target)
        {
            dangling_targets.push(choice.target.clone());
        }
    }

    CheckReport {
        title: parsed.has_title.then(|| document.title.clone()),
        front_matter_present: parsed.front_matter.is_some(),
        front_matter_error,
        block_count: document.blocks.len(),
        link_count: choices.len(),
        dangling_targets,
        duplicate_headings,
    }
}
