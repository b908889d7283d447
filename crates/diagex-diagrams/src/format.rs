//! Output formats supported by the Mermaid CLI.

use std::str::FromStr;

use serde::Deserialize;

/// Output format for rendered diagrams.
///
/// The Mermaid CLI picks the format from the output file extension, so the
/// format only decides which extension the exporter appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    /// Scalable vector graphics (default).
    #[default]
    Svg,
    /// Raster PNG image.
    Png,
    /// PDF document.
    Pdf,
}

/// Error for a format name outside [`DiagramFormat::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported format '{0}'")]
pub struct UnknownFormat(pub String);

impl DiagramFormat {
    /// Every supported format, in help-text order.
    pub const ALL: [Self; 3] = [Self::Svg, Self::Png, Self::Pdf];

    /// Return format as string representation (also the file extension).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    /// Upper-case label used in run summaries ("SVG", "PNG", "PDF").
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Svg => "SVG",
            Self::Png => "PNG",
            Self::Pdf => "PDF",
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}
