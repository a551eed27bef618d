use anyhow::{Context, Result};
use regex::Regex;

use super::{ChatmdDocument, Choice, ResponseBlock};

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Raw text between the opening and closing `---` lines.
    pub front_matter: Option<String>,
    pub has_title: bool,
    pub document: ChatmdDocument,
}

pub struct ChatmdParser {
    link_regex: Regex,
}

impl ChatmdParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            link_regex: Regex::new(r"^\s*\d+\.\s*\[(?P<label>.*)\]\((?P<target>.*)\)\s*$")
                .context("failed to compile ChatMD link regex")?,
        })
    }

    pub fn parse_link(&self, line: &str) -> Option<Choice> {
        let captures = self.link_regex.captures(line)?;
        Some(Choice::new(
            captures.name("label")?.as_str().trim(),
            captures.name("target")?.as_str().trim(),
        ))
    }

    pub fn parse(&self, text: &str) -> ParsedDocument {
        let lines = text.lines().collect::<Vec<&str>>();
        let (front_matter, body_start) = split_front_matter(&lines);

        let mut has_title = false;
        let mut document = ChatmdDocument {
            title: String::new(),
            welcome_message: String::new(),
            welcome_choices: Vec::new(),
            blocks: Vec::new(),
        };
        let mut welcome_lines = Vec::<&str>::new();
        let mut current: Option<BlockDraft> = None;

        for line in &lines[body_start..] {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(heading) = trimmed.strip_prefix("## ") {
                if let Some(draft) = current.take() {
                    document.blocks.push(draft.finish());
                }
                current = Some(BlockDraft::new(heading.trim()));
                continue;
            }

            if let Some(choice) = self.parse_link(trimmed) {
                match current.as_mut() {
                    Some(draft) => {
                        draft.triggers_open = false;
                        draft.choices.push(choice);
                    }
                    None => document.welcome_choices.push(choice),
                }
                continue;
            }

            match current.as_mut() {
                Some(draft) => {
                    if draft.triggers_open {
                        if let Some(trigger) = trimmed.strip_prefix("- ") {
                            draft.triggers.push(trigger.trim().to_string());
                            continue;
                        }
                    }
                    draft.triggers_open = false;
                    draft.content.push(trimmed);
                }
                None => {
                    if !has_title {
                        if let Some(title) = trimmed.strip_prefix("# ") {
                            document.title = title.trim().to_string();
                            has_title = true;
                            continue;
                        }
                    }
                    welcome_lines.push(trimmed);
                }
            }
        }

        if let Some(draft) = current.take() {
            document.blocks.push(draft.finish());
        }
        document.welcome_message = welcome_lines.join("\n");

        ParsedDocument {
            front_matter,
            has_title,
            document,
        }
    }
}

struct BlockDraft<'a> {
    heading: String,
    triggers: Vec<String>,
    triggers_open: bool,
    content: Vec<&'a str>,
    choices: Vec<Choice>,
}

impl<'a> BlockDraft<'a> {
    fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            triggers: Vec::new(),
            triggers_open: true,
            content: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn finish(self) -> ResponseBlock {
        ResponseBlock {
            heading: self.heading,
            triggers: self.triggers,
            content: self.content.join("\n"),
            choices: self.choices,
        }
    }
}

/// Returns the front matter and the index of the first body line. A `---`
/// block that is never closed is treated as body text.
fn split_front_matter(lines: &[&str]) -> (Option<String>, usize) {
    let Some(open) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return (None, 0);
    };
    if lines[open].trim() != "---" {
        return (None, 0);
    }

    let close = lines[open + 1..]
        .iter()
        .position(|line| line.trim() == "---")
        .map(|offset| open + 1 + offset);

    match close {
        Some(close) => (Some(lines[open + 1..close].join("\n")), close + 1),
        None => (None, 0),
    }
}
