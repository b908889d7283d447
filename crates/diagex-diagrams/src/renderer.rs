//! Renderer capability used by the exporter.

use std::path::Path;

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_THEME};
use crate::error::RenderError;

/// Fixed rendering options passed with every job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Named visual theme (`default`, `dark`, `forest`, `neutral`).
    pub theme: String,
    /// Background color (`transparent` or any CSS color).
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            background: DEFAULT_BACKGROUND.to_owned(),
        }
    }
}

/// One diagram to convert.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    /// Zero-based block index, unique within a run.
    pub index: usize,
    /// Diagram source, passed through untouched.
    pub source: &'a str,
    /// Destination file.
    pub output: &'a Path,
    /// Rendering options.
    pub options: &'a RenderOptions,
}

/// Converts diagram source into an output file.
///
/// Implementations must write `job.output` on success and must not leave
/// temporary files behind on either path.
pub trait Renderer {
    /// Render one diagram.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the diagram could not be produced. The
    /// caller records the failure and continues with the next diagram.
    fn convert(&self, job: &RenderJob<'_>) -> Result<(), RenderError>;
}
