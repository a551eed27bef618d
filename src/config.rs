use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::util::write_json_pretty;

pub const DEFAULT_CONFIG_PATH: &str = "chatmd.config.json";

pub const BASE_TEMPLATE: &str = r###"---
gestionGrosMots: true
titresRéponses: ["## "]
---

# Mon Chatbot
Message initial du chatbot
1. [Premier choix](Réponse 1)
2. [Deuxième choix](Réponse 2)

## Réponse 1
- déclencheur 1
- déclencheur 2
Contenu de la réponse 1
1. [Option 1](Option 1)
2. [Option 2](Option 2)

## Réponse 2
- déclencheur
Contenu de la réponse 2
"###;

/// Editor settings persisted as JSON. Missing keys take their defaults and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_upload_size_kb: u64,
    pub allowed_extensions: Vec<String>,
    pub base_template: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_upload_size_kb: 1024,
            allowed_extensions: vec![".md".to_string()],
            base_template: BASE_TEMPLATE.to_string(),
        }
    }
}

impl EditorConfig {
    /// Reads `path`, writing the defaults there first if it does not exist.
    /// An unreadable or malformed file falls back to the defaults.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            write_json_pretty(path, &config)
                .with_context(|| format!("failed to create config {}", path.display()))?;
            info!(path = %path.display(), "created default editor config");
            return Ok(config);
        }

        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| serde_json::from_str::<Self>(&raw).map_err(anyhow::Error::from));

        match parsed {
            Ok(config) => Ok(config),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to load editor config; using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_kb.saturating_mul(1024)
    }

    /// Compares the lower-cased extension of `path`, dot included.
    pub fn allows_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let extension = format!(".{}", extension.to_ascii_lowercase());
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = EditorConfig::load_or_create(&path).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(path.exists());

        let written: EditorConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.max_upload_size_kb, 1024);
        assert_eq!(written.allowed_extensions, vec![".md"]);
    }

    #[test]
    fn partial_files_keep_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"max_upload_size_kb": 2, "port": 8000, "debug": false}"#,
        )
        .unwrap();

        let config = EditorConfig::load_or_create(&path).unwrap();
        assert_eq!(config.max_upload_size_kb, 2);
        assert_eq!(config.max_upload_bytes(), 2048);
        assert_eq!(config.base_template, BASE_TEMPLATE);
    }

    #[test]
    fn malformed_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = EditorConfig::load_or_create(&path).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn base_template_keeps_its_quoted_heading_marker() {
        assert!(BASE_TEMPLATE.starts_with(crate::chatmd::FRONT_MATTER));
        assert!(BASE_TEMPLATE.contains("titresRéponses: [\"## \"]\n---\n\n# Mon Chatbot\n"));
        assert!(BASE_TEMPLATE.ends_with("## Réponse 2\n- déclencheur\nContenu de la réponse 2\n"));

        let parser = crate::chatmd::ChatmdParser::new().unwrap();
        let report = crate::chatmd::check_document(&parser, BASE_TEMPLATE);
        assert!(report.front_matter_present);
        assert_eq!(report.front_matter_error, None);
        assert_eq!(report.title.as_deref(), Some("Mon Chatbot"));
        assert_eq!(report.block_count, 2);
    }

    #[test]
    fn extension_check_ignores_case() {
        let config = EditorConfig::default();
        assert!(config.allows_extension(Path::new("bot.md")));
        assert!(config.allows_extension(Path::new("BOT.MD")));
        assert!(!config.allows_extension(Path::new("bot.txt")));
        assert!(!config.allows_extension(Path::new("README")));
    }
}
