//! Per-diagram outcomes and the run summary.

use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// Result of converting one diagram.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// The renderer produced `output`.
    Succeeded {
        /// Block index.
        index: usize,
        /// Written file.
        output: PathBuf,
    },
    /// The renderer failed; other diagrams are unaffected.
    Failed {
        /// Block index.
        index: usize,
        /// File that should have been written.
        output: PathBuf,
        /// Why rendering failed.
        reason: RenderError,
    },
}

impl ConversionOutcome {
    /// Block index of this outcome.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Succeeded { index, .. } | Self::Failed { index, .. } => *index,
        }
    }

    /// Destination path of this outcome.
    #[must_use]
    pub fn output(&self) -> &Path {
        match self {
            Self::Succeeded { output, .. } | Self::Failed { output, .. } => output,
        }
    }

    /// Whether the diagram was rendered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Success and failure counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Diagrams rendered.
    pub succeeded: usize,
    /// Diagrams that failed to render.
    pub failed: usize,
}

impl RunReport {
    /// Fold outcomes into counts.
    #[must_use]
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |report, outcome| {
            if outcome.is_success() {
                Self {
                    succeeded: report.succeeded + 1,
                    ..report
                }
            } else {
                Self {
                    failed: report.failed + 1,
                    ..report
                }
            }
        })
    }

    /// Total diagrams attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every attempted diagram was rendered.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
