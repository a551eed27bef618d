use super::normalize::{contains_any_keyword, normalize_whitespace, significant_words};

/// Gives each section at most one paragraph. A keyword pass claims matching
/// paragraphs first; sections still empty then take leftovers in pool order.
pub fn assign_content(sections: &[String], paragraphs: &[String]) -> Vec<Option<String>> {
    let mut pool = paragraphs.iter().map(String::as_str).collect::<Vec<&str>>();
    let mut assigned = vec![None; sections.len()];

    for (slot, section) in assigned.iter_mut().zip(sections) {
        let keywords = significant_words(section);
        let position = pool
            .iter()
            .position(|paragraph| contains_any_keyword(paragraph, &keywords));

        if let Some(position) = position {
            let paragraph = pool.remove(position);
            *slot = Some(normalize_whitespace(paragraph));
        }
    }

    for slot in assigned.iter_mut() {
        if slot.is_some() || pool.is_empty() {
            continue;
        }
        let paragraph = pool.remove(0);
        *slot = Some(normalize_whitespace(paragraph));
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn keyword_matches_are_claimed_before_leftovers() {
        let sections = owned(&["Produits", "Notre Histoire", "Contactez-nous"]);
        let paragraphs = owned(&[
            "Bienvenue sur le site.",
            "Notre histoire commence en 1990.",
            "Nos produits sont\nfabriqués en France.",
        ]);

        let assigned = assign_content(&sections, &paragraphs);

        assert_eq!(
            assigned,
            vec![
                Some("Nos produits sont fabriqués en France.".to_string()),
                Some("Notre histoire commence en 1990.".to_string()),
                Some("Bienvenue sur le site.".to_string()),
            ]
        );
    }

    #[test]
    fn a_paragraph_is_consumed_by_the_first_matching_section_only() {
        let sections = owned(&["Produits", "Produits phares", "Contact"]);
        let paragraphs = owned(&["Nos produits phares."]);

        let assigned = assign_content(&sections, &paragraphs);

        assert_eq!(assigned[0].as_deref(), Some("Nos produits phares."));
        assert_eq!(assigned[1], None);
        assert_eq!(assigned[2], None);
    }

    #[test]
    fn unmatched_sections_take_leftovers_in_pool_order() {
        let sections = owned(&["FAQ", "Prix", "Aide"]);
        let paragraphs = owned(&["premier", "second"]);

        let assigned = assign_content(&sections, &paragraphs);

        assert_eq!(assigned[0].as_deref(), Some("premier"));
        assert_eq!(assigned[1].as_deref(), Some("second"));
        assert_eq!(assigned[2], None);
    }
}
