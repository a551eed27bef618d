use tracing::debug;

use crate::chatmd::is_linkable;
use crate::model::DocumentType;

use super::normalize::{char_len, eq_ignore_case, normalize_whitespace};

pub const SECTION_COUNT: usize = 3;
pub const HOME_HEADING: &str = "Retour à l'accueil";

const HEADING_LINE_MAX_CHARS: usize = 50;
const SECTION_NAME_MAX_CHARS: usize = 30;
const HEADING_MAX_WORDS: usize = 5;

const SECTION_KEYWORDS: [&str; 12] = [
    "produits",
    "services",
    "histoire",
    "à propos",
    "contact",
    "équipe",
    "mission",
    "valeurs",
    "tarifs",
    "prix",
    "promotions",
    "offres",
];

/// Proposes exactly [`SECTION_COUNT`] section names, topping up with the
/// document type defaults when the heuristics find too few.
pub fn discover_sections(text: &str, document_type: DocumentType) -> Vec<String> {
    let lines = text.lines().collect::<Vec<&str>>();

    let mut candidates = Vec::<String>::new();
    candidates.extend(colon_headings(&lines));
    candidates.extend(uppercase_headings(&lines));
    candidates.extend(keyword_headings(&lines));

    let mut sections = dedupe_candidates(candidates);
    debug!(
        discovered = sections.len(),
        document_type = document_type.as_str(),
        "section candidates filtered"
    );

    if sections.len() < SECTION_COUNT {
        for fallback in document_type.default_sections() {
            if !sections.iter().any(|existing| eq_ignore_case(existing, fallback)) {
                sections.push(fallback.to_string());
            }
        }
    }

    sections.truncate(SECTION_COUNT);
    sections
}

fn colon_headings(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.ends_with(':') && char_len(line) < HEADING_LINE_MAX_CHARS)
        .filter_map(|line| short_heading(line.trim_end_matches(':')))
        .collect()
}

fn uppercase_headings(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| is_upper_case(line) && char_len(line) < HEADING_LINE_MAX_CHARS)
        .filter_map(short_heading)
        .collect()
}

fn keyword_headings(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| {
            let lowered = line.to_lowercase();
            SECTION_KEYWORDS
                .iter()
                .any(|keyword| lowered.starts_with(keyword))
        })
        .filter_map(short_heading)
        .collect()
}

fn short_heading(raw: &str) -> Option<String> {
    let heading = normalize_whitespace(raw);
    let words = heading.split(' ').count();
    if heading.is_empty() || words > HEADING_MAX_WORDS {
        return None;
    }
    Some(heading)
}

/// At least one cased character and no lower-case ones.
fn is_upper_case(line: &str) -> bool {
    let mut has_cased = false;
    for ch in line.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

fn dedupe_candidates(candidates: Vec<String>) -> Vec<String> {
    let mut kept = Vec::<String>::new();

    for candidate in candidates {
        if eq_ignore_case(&candidate, HOME_HEADING) || !is_linkable(&candidate) {
            continue;
        }
        if kept.iter().any(|existing| eq_ignore_case(existing, &candidate)) {
            continue;
        }
        if char_len(&candidate) <= SECTION_NAME_MAX_CHARS {
            kept.push(candidate);
        }
    }

    kept
}
