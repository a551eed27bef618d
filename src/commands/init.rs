use anyhow::{Result, bail};
use tracing::info;

use crate::cli::InitArgs;
use crate::commands::emit;
use crate::config::EditorConfig;

pub fn run(args: InitArgs) -> Result<()> {
    let config = EditorConfig::load_or_create(&args.config)?;

    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                output.display()
            );
        }
    }

    info!(config = %args.config.display(), "writing base template");
    emit(args.output.as_deref(), &config.base_template)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::config::BASE_TEMPLATE;

    use super::*;

    #[test]
    fn template_comes_from_the_editor_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let output = dir.path().join("bot.md");
        fs::write(&config, r##"{"base_template": "# Perso\nBonjour\n"}"##).unwrap();

        run(InitArgs {
            output: Some(output.clone()),
            config,
            force: false,
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "# Perso\nBonjour\n");
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let output = dir.path().join("bot.md");
        fs::write(&output, "garder").unwrap();

        let args = InitArgs {
            output: Some(output.clone()),
            config: config.clone(),
            force: false,
        };
        assert!(run(args.clone()).is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "garder");

        run(InitArgs { force: true, ..args }).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), BASE_TEMPLATE);
        assert!(config.exists());
    }
}
