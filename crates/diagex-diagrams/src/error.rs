//! Error types for diagram export.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Error that ends an export run before or between blocks.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The source document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fence label produced an unusable pattern.
    #[error("Invalid fence label '{label}': {source}")]
    InvalidFence {
        label: String,
        #[source]
        source: regex::Error,
    },
}

/// Error converting a single diagram. Never aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing the staging file failed.
    #[error("Failed to stage diagram source: {0}")]
    Staging(#[source] std::io::Error),

    /// The renderer process could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer process exited unsuccessfully.
    #[error("'{command}' exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
