//! Source document loading.

use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Full text of a source document.
///
/// Immutable once loaded. Blocks and headings borrow from it.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Read a UTF-8 document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DocumentRead`] if the file cannot be read or is
    /// not valid UTF-8.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = std::fs::read_to_string(path).map_err(|source| ExportError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Loaded document");
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Create a document from in-memory text.
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Path the document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
