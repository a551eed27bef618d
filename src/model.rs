use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of source document; drives default sections, sub-sections and the
/// welcome sentence.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Company,
    Biography,
    Course,
    Product,
    #[default]
    Custom,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Biography => "biography",
            Self::Course => "course",
            Self::Product => "product",
            Self::Custom => "custom",
        }
    }

    pub fn default_sections(self) -> [&'static str; 3] {
        match self {
            Self::Company => ["Produits et Services", "Notre Histoire", "Contactez-nous"],
            Self::Biography => [
                "Jeunesse et Formation",
                "Carrière et Réalisations",
                "Vie Personnelle",
            ],
            Self::Course => ["Introduction", "Contenu du Cours", "Exercices Pratiques"],
            Self::Product => ["Caractéristiques", "Utilisation", "Prix et Disponibilité"],
            Self::Custom => ["À propos", "Informations", "Contact"],
        }
    }

    pub fn welcome_message(self, title: &str) -> String {
        match self {
            Self::Company => format!(
                "Bienvenue chez {title}! Découvrez notre entreprise, nos produits et services."
            ),
            Self::Biography => format!("Découvrez la vie et l'œuvre de {title}."),
            Self::Course => format!(
                "Bienvenue dans ce cours sur {title}. Vous allez découvrir de nouveaux concepts et développer vos compétences."
            ),
            Self::Product => format!("Découvrez {title} et ses caractéristiques exceptionnelles."),
            Self::Custom => format!("Bienvenue dans ce chatbot interactif sur {title}."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub document_type: DocumentType,
    pub tone: String,
    pub complexity: String,
    /// Advisory for the heuristic pipeline, which always emits two levels.
    pub max_depth: u32,
    /// Advisory for the heuristic pipeline, which always emits three choices.
    pub choices_per_level: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            document_type: DocumentType::Custom,
            tone: "conversational".to_string(),
            complexity: "intermediate".to_string(),
            max_depth: 3,
            choices_per_level: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub content: Option<String>,
    pub keywords: Vec<String>,
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub name: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueDocument {
    pub title: String,
    pub welcome_message: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_format: String,
    pub source_sha256: String,
    pub source_char_count: usize,
    pub params: GenerationParams,
    pub strategy: String,
    pub fallback_reason: Option<String>,
    pub backend_mode: Option<String>,
    pub section_names: Vec<String>,
    pub output_path: Option<String>,
}
