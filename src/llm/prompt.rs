//! Prompt text sent to the completion endpoints.

use crate::model::{DocumentType, GenerationParams};

use super::ChatMessage;

pub const GENERATION_TEMPERATURE: f32 = 0.7;
pub const SUGGESTION_TEMPERATURE: f32 = 0.8;

const JSON_SCHEMA: &str = r#"```json
{
  "title": "Titre du chatbot basé sur le document",
  "welcome_message": "Message d'accueil qui présente le sujet principal du document",
  "welcome_choices": [
    { "text": "Premier choix", "target": "Réponse 1" },
    { "text": "Deuxième choix", "target": "Réponse 2" },
    { "text": "Troisième choix", "target": "Réponse 3" }
  ],
  "responses": {
    "Réponse 1": {
      "triggers": ["déclencheur 1", "déclencheur 2"],
      "content": "Contenu détaillé sur le premier aspect du document",
      "choices": [
        { "text": "Sous-option 1.1", "target": "Sous-réponse 1.1" },
        { "text": "Sous-option 1.2", "target": "Sous-réponse 1.2" }
      ]
    },
    "Sous-réponse 1.1": {
      "triggers": ["déclencheur spécifique"],
      "content": "Contenu détaillé sur cet aspect spécifique",
      "choices": [
        { "text": "Revenir en arrière", "target": "Réponse 1" }
      ]
    }
  }
}
```"#;

const COMPANY_EXAMPLE: &str = "
STRUCTURE SPÉCIFIQUE POUR UNE DESCRIPTION D'ENTREPRISE:

# [Nom de l'entreprise]
Bienvenue dans le chatbot de [Nom de l'entreprise]! Découvrez notre entreprise, nos produits et services.

1. [Produits et Services](Produits et Services)
2. [Notre Histoire](Notre Histoire)
3. [Contactez-nous](Contactez-nous)

## Produits et Services
- produits
- services
- offres
Découvrez notre gamme complète de produits et services:

1. [Produit/Service Phare](Produit/Service Phare)
2. [Autres Offres](Autres Offres)
3. [Tarifs et Disponibilité](Tarifs et Disponibilité)

## Notre Histoire
- histoire
- fondation
- évolution
[Nom de l'entreprise] a été fondée en [année] par [fondateur].

1. [Débuts et Vision](Débuts et Vision)
2. [Croissance et Développement](Croissance et Développement)
3. [Notre Mission et Nos Valeurs](Notre Mission et Nos Valeurs)

[Et continuer avec toutes les sous-sections...]
";

const BIOGRAPHY_EXAMPLE: &str = "
STRUCTURE SPÉCIFIQUE POUR UNE BIOGRAPHIE:

# [Nom de la Personne]
Découvrez la vie et l'œuvre de [Nom de la Personne], [brève description de sa notoriété].

1. [Jeunesse et Formation](Jeunesse et Formation)
2. [Carrière et Réalisations](Carrière et Réalisations)
3. [Vie Personnelle](Vie Personnelle)

## Jeunesse et Formation
- enfance
- éducation
- formation
[Nom] est né(e) le [date] à [lieu]. Voici les moments clés de sa jeunesse:

1. [Origines Familiales](Origines Familiales)
2. [Éducation et Influences](Éducation et Influences)
3. [Premiers Pas](Premiers Pas)

[Et continuer avec toutes les sous-sections...]
";

const COURSE_EXAMPLE: &str = "
STRUCTURE SPÉCIFIQUE POUR UN COURS:

# [Titre du Cours]
Bienvenue dans ce cours sur [Sujet]. Vous allez découvrir les concepts fondamentaux.

1. [Introduction et Concepts de Base](Introduction et Concepts de Base)
2. [Modules Principaux](Modules Principaux)
3. [Exercices Pratiques](Exercices Pratiques)

## Modules Principaux
- modules
- chapitres
- leçons
Le cours est divisé en plusieurs modules thématiques:

1. [Module 1: Titre](Module 1)
2. [Module 2: Titre](Module 2)
3. [Module 3: Titre](Module 3)

[Et continuer avec toutes les sous-sections, incluant des quiz à la fin de chaque module...]
";

const PRODUCT_EXAMPLE: &str = "
STRUCTURE SPÉCIFIQUE POUR UNE DESCRIPTION DE PRODUIT:

# [Nom du Produit]
Découvrez [Nom du Produit], [brève description du produit et de sa valeur principale].

1. [Caractéristiques et Avantages](Caractéristiques et Avantages)
2. [Utilisation et Applications](Utilisation et Applications)
3. [Prix et Disponibilité](Prix et Disponibilité)

## Prix et Disponibilité
- prix
- achat
- disponibilité
Informations sur l'achat de [Nom du Produit]:

1. [Options d'Achat](Options d'Achat)
2. [Garantie et Support](Garantie et Support)
3. [Produits Complémentaires](Produits Complémentaires)

[Et continuer avec toutes les sous-sections...]
";

const SUGGESTION_SYSTEM_PROMPT: &str = "Tu es un assistant spécialisé dans la création de chatbots au format ChatMD. \
Analyse le contenu fourni et suggère des améliorations pour le rendre plus engageant, informatif et interactif. \
Concentre-toi sur la structure, les choix proposés, les déclencheurs et la qualité du contenu.";

fn document_type_example(document_type: DocumentType) -> Option<&'static str> {
    match document_type {
        DocumentType::Company => Some(COMPANY_EXAMPLE),
        DocumentType::Biography => Some(BIOGRAPHY_EXAMPLE),
        DocumentType::Course => Some(COURSE_EXAMPLE),
        DocumentType::Product => Some(PRODUCT_EXAMPLE),
        DocumentType::Custom => None,
    }
}

/// System prompt asking for the structured JSON chatbot description.
pub fn system_prompt(params: &GenerationParams) -> String {
    let mut prompt = format!(
        "Tu es un expert en création de chatbots interactifs. Ta tâche est de transformer le document fourni \
en une structure JSON qui sera ensuite convertie en chatbot interactif.

IMPORTANT: Tu dois ABSOLUMENT générer une structure JSON valide et bien formée selon le schéma ci-dessous. \
Ne fais PAS une simple analyse de texte.

Schéma JSON requis:
{JSON_SCHEMA}

Directives OBLIGATOIRES:
- Ton: {tone}
- Niveau de complexité: {complexity}
- Profondeur maximale: {max_depth} niveaux (pas plus!)
- Nombre de choix par niveau: exactement {choices} options
- Inclure 2-3 déclencheurs pertinents pour chaque bloc de réponse
- Créer une structure cohérente et logique basée sur le contenu du document
- Assurer que TOUS les liens entre les blocs fonctionnent correctement (chaque \"target\" doit correspondre à une clé existante dans \"responses\")
- Générer un JSON valide et bien formé, sans erreurs de syntaxe
",
        tone = params.tone,
        complexity = params.complexity,
        max_depth = params.max_depth,
        choices = params.choices_per_level,
    );

    if let Some(example) = document_type_example(params.document_type) {
        prompt.push_str(example);
    }
    prompt
}

pub fn user_message(text: &str) -> String {
    format!("Voici le document à transformer en chatbot:\n\n{text}")
}

pub fn generation_messages(text: &str, params: &GenerationParams) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(params)),
        ChatMessage::user(user_message(text)),
    ]
}

/// Review request for an existing ChatMD document, optionally focused on one block.
pub fn suggestion_messages(chatmd: &str, section: Option<&str>) -> Vec<ChatMessage> {
    let mut user = format!("Voici le contenu actuel du chatbot:\n\n{chatmd}");
    if let Some(section) = section.filter(|section| !section.trim().is_empty()) {
        user.push_str(&format!(
            "\n\nJe souhaite améliorer spécifiquement la section: {section}"
        ));
    }

    vec![
        ChatMessage::system(SUGGESTION_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_carry_generation_parameters() {
        let params = GenerationParams {
            document_type: DocumentType::Course,
            tone: "formel".to_string(),
            complexity: "avancé".to_string(),
            max_depth: 2,
            choices_per_level: 4,
        };

        let prompt = system_prompt(&params);
        assert!(prompt.contains("- Ton: formel\n"));
        assert!(prompt.contains("- Niveau de complexité: avancé\n"));
        assert!(prompt.contains("Profondeur maximale: 2 niveaux"));
        assert!(prompt.contains("exactement 4 options"));
        assert!(prompt.contains("STRUCTURE SPÉCIFIQUE POUR UN COURS"));
        assert!(!prompt.contains("D'ENTREPRISE"));
    }

    #[test]
    fn custom_documents_get_no_structure_example() {
        let prompt = system_prompt(&GenerationParams::default());
        assert!(!prompt.contains("STRUCTURE SPÉCIFIQUE"));
        assert!(prompt.contains("\"welcome_message\""));
    }

    #[test]
    fn messages_are_system_then_user() {
        let messages = generation_messages("Mon document", &GenerationParams::default());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(
            messages[1],
            ChatMessage::user("Voici le document à transformer en chatbot:\n\nMon document")
        );
    }

    #[test]
    fn suggestion_focus_is_optional() {
        let messages = suggestion_messages("# Titre", None);
        assert_eq!(messages[1].content, "Voici le contenu actuel du chatbot:\n\n# Titre");

        let messages = suggestion_messages("# Titre", Some("Contact"));
        assert!(
            messages[1]
                .content
                .ends_with("\n\nJe souhaite améliorer spécifiquement la section: Contact")
        );

        let messages = suggestion_messages("# Titre", Some("  "));
        assert!(!messages[1].content.contains("spécifiquement"));
    }
}
