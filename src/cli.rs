use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::llm::{
    BackendMode, DEFAULT_CLOUD_API_URL, DEFAULT_CLOUD_MODEL, DEFAULT_LOCAL_API_URL,
    DEFAULT_LOCAL_MODEL,
};
use crate::model::{DocumentType, GenerationParams};

#[derive(Parser, Debug)]
#[command(
    name = "chatmd",
    version,
    about = "Generate and check ChatMD chatbot documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn a txt/md/pdf/docx document into a ChatMD chatbot.
    Generate(GenerateArgs),
    /// Print the plain text extracted from a document.
    Extract(ExtractArgs),
    /// Validate a ChatMD document the way the editor does on upload.
    Check(CheckArgs),
    /// Write the editor's starter ChatMD document.
    Init(InitArgs),
    /// Ask the model how a ChatMD document could be improved.
    Suggest(SuggestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Skip the model and use heuristic synthesis only.
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    #[command(flatten)]
    pub generation: GenerationArgs,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    #[arg(long, value_enum, default_value_t = DocumentType::Custom)]
    pub doc_type: DocumentType,

    #[arg(long, default_value = "conversational")]
    pub tone: String,

    #[arg(long, default_value = "intermediate")]
    pub complexity: String,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: u32,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub choices_per_level: u32,
}

impl GenerationArgs {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            document_type: self.doc_type,
            tone: self.tone.clone(),
            complexity: self.complexity.clone(),
            max_depth: self.max_depth,
            choices_per_level: self.choices_per_level,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    #[arg(long, value_enum, default_value_t = BackendMode::Local)]
    pub mode: BackendMode,

    #[arg(long, env = "LOCAL_API_URL", default_value = DEFAULT_LOCAL_API_URL)]
    pub local_api_url: String,

    #[arg(long, env = "LOCAL_MODEL", default_value = DEFAULT_LOCAL_MODEL)]
    pub local_model: String,

    #[arg(long, env = "MISTRAL_API_URL", default_value = DEFAULT_CLOUD_API_URL)]
    pub cloud_api_url: String,

    #[arg(long, env = "MISTRAL_MODEL", default_value = DEFAULT_CLOUD_MODEL)]
    pub cloud_model: String,

    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    pub cloud_api_key: Option<String>,

    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print the report as JSON instead of log lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Block heading to focus the suggestions on.
    #[arg(long)]
    pub section: Option<String>,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}
