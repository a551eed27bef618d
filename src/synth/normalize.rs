/// Tokens strictly longer than this many characters count as significant.
const SIGNIFICANT_WORD_MIN_CHARS: usize = 3;

pub const DEFAULT_TITLE: &str = "Chatbot";

/// Replaces carriage returns and tabs with spaces and collapses runs of
/// spaces. Line feeds are left alone so blank-line paragraph breaks survive.
pub fn normalize_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_space = false;

    for ch in input.chars() {
        let ch = if matches!(ch, '\r' | '\t') { ' ' } else { ch };
        if ch == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        output.push(ch);
    }

    output
}

pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn significant_words(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .filter(|word| char_len(word) > SIGNIFICANT_WORD_MIN_CHARS)
        .map(|word| word.to_lowercase())
        .collect()
}

pub fn contains_any_keyword(text: &str, keywords: &[String]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| lowered.contains(keyword.as_str()))
}

pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Splits on blank lines; each paragraph keeps its inner line breaks.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::<String>::new();
    let mut current = Vec::<&str>::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n").trim().to_string());
                current.clear();
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        paragraphs.push(current.join("\n").trim().to_string());
    }

    paragraphs.retain(|paragraph| !paragraph.is_empty());
    paragraphs
}

pub fn extract_title(text: &str) -> String {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .map(normalize_whitespace)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Truncates to `max_chars` characters and appends `...` when anything was cut.
pub fn truncate_with_ellipsis(value: &str, max_chars: usize) -> String {
    if char_len(value) <= max_chars {
        return value.to_string();
    }

    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
