use tracing::debug;

use crate::chatmd::{ChatmdDocument, Choice, ResponseBlock, escape_markup};
use crate::model::{DialogueDocument, GenerationParams, Section, Subsection};

use super::content::assign_content;
use super::normalize::{
    char_len, contains_any_keyword, extract_title, normalize_whitespace, significant_words,
    split_paragraphs, truncate_with_ellipsis,
};
use super::sections::{HOME_HEADING, discover_sections};
use super::subsections::synthesize_subsections;

const SECTION_TRIGGER_LIMIT: usize = 3;
const SUBSECTION_TRIGGER_LIMIT: usize = 2;
const SUBSECTION_CONTENT_MAX_CHARS: usize = 300;
const WELCOME_MIN_CHARS: usize = 50;
const WELCOME_MAX_CHARS: usize = 300;

const SUBSECTION_PLACEHOLDER: &str = "Informations détaillées sur ce sujet.";
const HOME_TRIGGERS: [&str; 2] = ["retour", "accueil"];
const HOME_CONTENT: &str = "Retour à la page d'accueil.";

/// Runs the whole heuristic pipeline over extracted text. Length gates are
/// measured on the text as given; only emitted strings are collapsed.
pub fn synthesize(text: &str, params: &GenerationParams) -> DialogueDocument {
    let document_type = params.document_type;
    let title = extract_title(text);
    let paragraphs = split_paragraphs(text);

    let section_names = discover_sections(text, document_type);
    let contents = assign_content(&section_names, &paragraphs);

    let sections = section_names
        .iter()
        .zip(contents)
        .map(|(name, content)| {
            let subsections =
                synthesize_subsections(name, content.as_deref(), document_type, &section_names)
                    .into_iter()
                    .map(|subsection| build_subsection(subsection, name, &paragraphs))
                    .collect();

            Section {
                name: name.clone(),
                keywords: leading_keywords(name, SECTION_TRIGGER_LIMIT),
                content,
                subsections,
            }
        })
        .collect::<Vec<Section>>();

    let welcome_message = paragraphs
        .iter()
        .find(|paragraph| {
            let length = char_len(paragraph);
            length > WELCOME_MIN_CHARS && length < WELCOME_MAX_CHARS
        })
        .map(|paragraph| normalize_whitespace(paragraph))
        .unwrap_or_else(|| document_type.welcome_message(&title));

    debug!(
        title = %title,
        paragraphs = paragraphs.len(),
        sections = sections.len(),
        "assembled dialogue tree"
    );

    DialogueDocument {
        title,
        welcome_message,
        sections,
    }
}

fn build_subsection(name: String, parent: &str, paragraphs: &[String]) -> Subsection {
    let keywords = leading_keywords(&name, SUBSECTION_TRIGGER_LIMIT);
    let content = paragraphs
        .iter()
        .find(|paragraph| contains_any_keyword(paragraph, &keywords))
        .map(|paragraph| {
            truncate_with_ellipsis(
                &normalize_whitespace(paragraph),
                SUBSECTION_CONTENT_MAX_CHARS,
            )
        })
        .unwrap_or_else(|| SUBSECTION_PLACEHOLDER.to_string());

    Subsection {
        name,
        content,
        keywords,
        parent: parent.to_string(),
    }
}

fn leading_keywords(name: &str, limit: usize) -> Vec<String> {
    let mut keywords = significant_words(name);
    keywords.truncate(limit);
    keywords
}

impl DialogueDocument {
    /// Lays the tree out as ChatMD blocks: every section, then every
    /// sub-section in section order, then the home block. Document text is
    /// escaped so it cannot open blocks or add links.
    pub fn to_chatmd(&self) -> ChatmdDocument {
        let top_level = self
            .sections
            .iter()
            .map(|section| Choice::to(&section.name))
            .collect::<Vec<Choice>>();

        let mut blocks = self
            .sections
            .iter()
            .map(|section| ResponseBlock {
                heading: section.name.clone(),
                triggers: section.keywords.clone(),
                content: match &section.content {
                    Some(content) => escape_markup(content),
                    None => format!("Informations sur {}.", section.name),
                },
                choices: section
                    .subsections
                    .iter()
                    .map(|subsection| Choice::to(&subsection.name))
                    .collect(),
            })
            .collect::<Vec<ResponseBlock>>();

        blocks.extend(self.sections.iter().flat_map(|section| {
            section.subsections.iter().map(|subsection| ResponseBlock {
                heading: subsection.name.clone(),
                triggers: subsection.keywords.clone(),
                content: escape_markup(&subsection.content),
                choices: vec![Choice::new(
                    format!("Retour à {}", subsection.parent),
                    subsection.parent.clone(),
                )],
            })
        }));

        blocks.push(ResponseBlock {
            heading: HOME_HEADING.to_string(),
            triggers: HOME_TRIGGERS.iter().map(|value| value.to_string()).collect(),
            content: HOME_CONTENT.to_string(),
            choices: top_level.clone(),
        });

        ChatmdDocument {
            title: self.title.clone(),
            welcome_message: escape_markup(&self.welcome_message),
            welcome_choices: top_level,
            blocks,
        }
    }

    pub fn render(&self) -> String {
        self.to_chatmd().render()
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|section| section.name.clone())
            .collect()
    }
}
