use crate::chatmd::is_linkable;
use crate::model::DocumentType;

use super::normalize::{char_len, contains_any_keyword, eq_ignore_case, significant_words};
use super::sections::HOME_HEADING;

pub const SUBSECTIONS_PER_SECTION: usize = 3;

const SENTENCE_MIN_CHARS: usize = 10;
const SENTENCE_MAX_CHARS: usize = 40;

const GENERIC_SUBSECTIONS: [&str; 3] = [
    "Informations principales",
    "Détails supplémentaires",
    "Foire aux questions",
];

/// Names the sub-sections of one section. Sentences mined from the section's
/// content win when there are enough of them; otherwise a fixed triad is used.
/// Names matching a top-level heading (`reserved`) are never returned.
pub fn synthesize_subsections(
    section: &str,
    content: Option<&str>,
    document_type: DocumentType,
    reserved: &[String],
) -> Vec<String> {
    let mut mined = mine_sentences(content.unwrap_or_default(), section, reserved);
    if mined.len() >= SUBSECTIONS_PER_SECTION {
        mined.truncate(SUBSECTIONS_PER_SECTION);
        return mined;
    }

    default_subsections(section, document_type)
        .into_iter()
        .filter(|name| !is_reserved(name, reserved))
        .map(ToOwned::to_owned)
        .collect()
}

fn mine_sentences(content: &str, section: &str, reserved: &[String]) -> Vec<String> {
    let keywords = significant_words(section);
    let mut sentences = Vec::<String>::new();

    for fragment in content.split('.') {
        let sentence = fragment.trim();
        let length = char_len(sentence);
        if length <= SENTENCE_MIN_CHARS || length >= SENTENCE_MAX_CHARS {
            continue;
        }
        let starts_upper = sentence
            .chars()
            .next()
            .map(char::is_uppercase)
            .unwrap_or(false);
        if !starts_upper || !contains_any_keyword(sentence, &keywords) || !is_linkable(sentence) {
            continue;
        }
        if is_reserved(sentence, reserved)
            || sentences.iter().any(|kept| eq_ignore_case(kept, sentence))
        {
            continue;
        }
        sentences.push(sentence.to_string());
    }

    sentences
}

fn default_subsections(section: &str, document_type: DocumentType) -> [&'static str; 3] {
    if document_type != DocumentType::Company {
        return GENERIC_SUBSECTIONS;
    }

    let lowered = section.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

    if mentions(&["produit", "service"]) {
        ["Nos produits phares", "Services spéciaux", "Garanties et SAV"]
    } else if mentions(&["histoire", "propos"]) {
        [
            "Notre fondation",
            "Évolution de l'entreprise",
            "Valeurs et mission",
        ]
    } else if mentions(&["contact", "trouver"]) {
        ["Coordonnées", "Horaires d'ouverture", "Service client"]
    } else {
        GENERIC_SUBSECTIONS
    }
}

fn is_reserved(name: &str, reserved: &[String]) -> bool {
    eq_ignore_case(name, HOME_HEADING) || reserved.iter().any(|taken| eq_ignore_case(taken, name))
}
