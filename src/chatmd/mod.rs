//! ChatMD document model shared by every generator, with its renderer,
//! parser and link checker.

mod check;
mod parse;

pub use check::{CheckReport, check_document};
pub use parse::ChatmdParser;

use std::borrow::Cow;

use serde::Serialize;

/// Metadata block opening every generated document.
pub const FRONT_MATTER: &str = "---\ngestionGrosMots: true\ntitresRéponses: [\"## \"]\n---\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: String,
    pub target: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    /// A choice whose label is also its target.
    pub fn to(target: &str) -> Self {
        Self::new(target, target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBlock {
    pub heading: String,
    pub triggers: Vec<String>,
    pub content: String,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatmdDocument {
    pub title: String,
    pub welcome_message: String,
    pub welcome_choices: Vec<Choice>,
    pub blocks: Vec<ResponseBlock>,
}

impl ChatmdDocument {
    /// Blank line after the welcome message and after every block's content.
    pub fn render(&self) -> String {
        self.render_with("\n\n")
    }

    /// Links follow the welcome message and block content directly.
    pub fn render_compact(&self) -> String {
        self.render_with("\n")
    }

    fn render_with(&self, text_end: &str) -> String {
        let mut output = String::from(FRONT_MATTER);

        output.push_str("# ");
        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&self.welcome_message);
        output.push_str(text_end);
        push_choices(&mut output, &self.welcome_choices);

        for block in &self.blocks {
            output.push_str("## ");
            output.push_str(&block.heading);
            output.push('\n');
            for trigger in &block.triggers {
                output.push_str("- ");
                output.push_str(trigger);
                output.push('\n');
            }
            output.push_str(&block.content);
            output.push_str(text_end);
            push_choices(&mut output, &block.choices);
        }

        output
    }
}

fn push_choices(output: &mut String, choices: &[Choice]) {
    for (index, choice) in choices.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}]({})\n",
            index + 1,
            choice.label,
            choice.target
        ));
    }
    output.push('\n');
}

/// Link lines split label from target at the last `](`, so a name holding
/// one cannot round-trip as a target.
pub fn is_linkable(name: &str) -> bool {
    !name.contains("](")
}

/// Backslash-escapes every line the parser would read as a heading, a trigger
/// or a link, so free text always stays content.
pub fn escape_markup(text: &str) -> String {
    text.split('\n')
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    if body.starts_with('#') || body.starts_with("- ") {
        return Cow::Owned(format!("{indent}\\{body}"));
    }

    let digits = body
        .find(|c: char| !c.is_numeric())
        .unwrap_or(body.len());
    if digits > 0 {
        let rest = &body[digits..];
        if rest
            .strip_prefix('.')
            .is_some_and(|after| after.trim_start().starts_with('['))
        {
            return Cow::Owned(format!("{indent}{}\\{rest}", &body[..digits]));
        }
    }

    Cow::Borrowed(line)
}
