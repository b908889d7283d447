//! CLI command implementations.

mod convert;
mod list;

use std::path::PathBuf;

use clap::Args;
use diagex_config::{CliSettings, Config};
use diagex_diagrams::Fence;

use crate::error::CliError;

pub(crate) use convert::ConvertArgs;
pub(crate) use list::ListArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover diagex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown document to read (overrides config).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Code fence label marking diagrams (overrides config).
    #[arg(long)]
    fence: Option<String>,

    /// Enable verbose output (log each diagram).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with these arguments and `extra` applied on top.
    fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source: self.input.clone(),
            fence: self.fence.clone(),
            ..extra
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        match &config.config_path {
            Some(path) => tracing::debug!(path = %path.display(), "Loaded configuration"),
            None => tracing::debug!("No diagex.toml found, using defaults"),
        }
        Ok(config)
    }
}

/// Fence matcher for the configured label.
fn fence_matcher(config: &Config) -> Result<Fence, CliError> {
    Ok(Fence::new(&config.docs_resolved.fence)?)
}
