pub mod check;
pub mod extract;
pub mod generate;
pub mod init;
pub mod suggest;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::EndpointArgs;
use crate::llm::FailoverClient;
use crate::util::write_text;

#[cfg(feature = "llm")]
pub(crate) fn completion_client(args: &EndpointArgs) -> Result<FailoverClient> {
    use std::time::Duration;

    use tracing::{debug, warn};

    use crate::llm::{BackendMode, EndpointConfig, HttpCompletionClient, ModeSwitch};

    let timeout = Duration::from_secs(args.timeout_secs);
    let local = EndpointConfig::local(&args.local_api_url, &args.local_model, timeout);
    let cloud = EndpointConfig::cloud(
        &args.cloud_api_url,
        &args.cloud_model,
        args.cloud_api_key.clone(),
        timeout,
    );
    if cloud.api_key.is_none() && args.mode == BackendMode::Cloud {
        warn!("MISTRAL_API_KEY is not set; cloud requests will be unauthenticated");
    }

    info!(
        mode = args.mode.as_str(),
        local_url = %local.url,
        local_model = %local.model,
        cloud_url = %cloud.url,
        cloud_model = %cloud.model,
        timeout_secs = args.timeout_secs,
        "configured completion endpoints"
    );

    let client = FailoverClient::new(
        Box::new(HttpCompletionClient::new(local)?),
        Box::new(HttpCompletionClient::new(cloud)?),
        ModeSwitch::default(),
    );
    let previous = client.mode().set(args.mode);
    debug!(
        from = previous.as_str(),
        to = args.mode.as_str(),
        "switched backend mode"
    );
    Ok(client)
}

#[cfg(not(feature = "llm"))]
pub(crate) fn completion_client(_args: &EndpointArgs) -> Result<FailoverClient> {
    anyhow::bail!("model access is not available in this build; rebuild with `--features llm`")
}

/// Writes `contents` to `output`, or to stdout when no path is given.
pub(crate) fn emit(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            write_text(path, contents)?;
            info!(path = %path.display(), bytes = contents.len(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "llm"))]
mod tests {
    use crate::llm::{BackendMode, DEFAULT_CLOUD_API_URL, DEFAULT_LOCAL_API_URL};

    use super::*;

    fn endpoint_args(mode: BackendMode) -> EndpointArgs {
        EndpointArgs {
            mode,
            local_api_url: DEFAULT_LOCAL_API_URL.to_string(),
            local_model: "local-model".to_string(),
            cloud_api_url: DEFAULT_CLOUD_API_URL.to_string(),
            cloud_model: "cloud-model".to_string(),
            cloud_api_key: Some("secret".to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn client_starts_in_the_requested_mode() {
        let client = completion_client(&endpoint_args(BackendMode::Cloud)).unwrap();
        assert_eq!(client.mode().get(), BackendMode::Cloud);

        let client = completion_client(&endpoint_args(BackendMode::Local)).unwrap();
        assert_eq!(client.mode().get(), BackendMode::Local);
    }
}
