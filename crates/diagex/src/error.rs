//! CLI error types.

use diagex_config::ConfigError;
use diagex_diagrams::ExportError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("{failed} of {total} diagrams failed to render")]
    PartialFailure { failed: usize, total: usize },
}
