//! Export pipeline: extract, name, render, record.
//!
//! This module provides [`DiagramExporter`], which runs every diagram of a
//! document through a [`Renderer`] one at a time and collects a
//! [`ConversionOutcome`] per diagram.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::ExportError;
use crate::extract::{DiagramBlock, Fence};
use crate::format::DiagramFormat;
use crate::renderer::{RenderJob, RenderOptions, Renderer};
use crate::report::ConversionOutcome;
use crate::title::HeadingIndex;

/// A diagram with its resolved name and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDiagram<'a> {
    /// Extracted block.
    pub block: DiagramBlock<'a>,
    /// Resolved output name (without extension).
    pub name: String,
    /// Destination path (`<output_dir>/<name>.<ext>`).
    pub output: PathBuf,
}

/// Extract and name every diagram of `document`.
///
/// Does not touch the filesystem. Two diagrams resolving to the same name
/// share an output path; the later one overwrites the earlier when rendered.
#[must_use]
pub fn plan<'d>(
    document: &'d Document,
    fence: &Fence,
    output_dir: &Path,
    format: DiagramFormat,
) -> Vec<PlannedDiagram<'d>> {
    let text = document.text();
    let headings = HeadingIndex::new(text);
    let mut seen = HashSet::new();

    fence
        .blocks(text)
        .map(|block| {
            let name = headings.resolve(&block);
            if !seen.insert(name.clone()) {
                tracing::debug!(index = block.index, name = %name, "Output name reused, file will be overwritten");
            }
            let output = output_dir.join(format!("{name}.{}", format.as_str()));
            PlannedDiagram {
                block,
                name,
                output,
            }
        })
        .collect()
}

/// Converts the diagrams of a document into standalone files.
///
/// # Configuration
///
/// Create the exporter with a renderer and an output directory, then
/// configure using builder methods:
/// - [`format`](Self::format): output format (default: SVG)
/// - [`options`](Self::options): theme and background
/// - [`fence`](Self::fence): fence label to extract (default: `mermaid`)
///
/// # Example
///
/// ```ignore
/// use diagex_diagrams::{DiagramExporter, Document, MermaidCli};
///
/// let document = Document::load("docs/UML.md".as_ref())?;
/// let exporter = DiagramExporter::new(Box::new(MermaidCli::default()), "uml-diagrams-svg");
/// let outcomes = exporter.export(&document)?;
/// ```
pub struct DiagramExporter {
    renderer: Box<dyn Renderer>,
    output_dir: PathBuf,
    format: DiagramFormat,
    options: RenderOptions,
    fence: Fence,
}

impl DiagramExporter {
    /// Create an exporter writing into `output_dir`.
    #[must_use]
    pub fn new(renderer: Box<dyn Renderer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            format: DiagramFormat::default(),
            options: RenderOptions::default(),
            fence: Fence::default(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn format(mut self, format: DiagramFormat) -> Self {
        self.format = format;
        self
    }

    /// Set rendering options passed with every job.
    #[must_use]
    pub fn options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the fence matcher used for extraction.
    #[must_use]
    pub fn fence(mut self, fence: Fence) -> Self {
        self.fence = fence;
        self
    }

    /// Extract and name the diagrams of `document` without rendering.
    #[must_use]
    pub fn plan<'d>(&self, document: &'d Document) -> Vec<PlannedDiagram<'d>> {
        plan(document, &self.fence, &self.output_dir, self.format)
    }

    /// Render every diagram of `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::OutputDir`] if the output directory cannot be
    /// created. Rendering failures are reported per diagram instead.
    pub fn export(&self, document: &Document) -> Result<Vec<ConversionOutcome>, ExportError> {
        self.export_with(document, |_| {})
    }

    /// Render every diagram of `document`, reporting each outcome as it lands.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::OutputDir`] if the output directory cannot be
    /// created.
    pub fn export_with(
        &self,
        document: &Document,
        mut on_outcome: impl FnMut(&ConversionOutcome),
    ) -> Result<Vec<ConversionOutcome>, ExportError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let planned = self.plan(document);
        tracing::info!(
            path = %document.path().display(),
            fence = self.fence.label(),
            count = planned.len(),
            "Extracted diagrams"
        );

        let outcomes = planned
            .into_iter()
            .map(|diagram| {
                let outcome = self.convert(diagram);
                on_outcome(&outcome);
                outcome
            })
            .collect();
        Ok(outcomes)
    }

    /// Render one planned diagram.
    fn convert(&self, diagram: PlannedDiagram<'_>) -> ConversionOutcome {
        let job = RenderJob {
            index: diagram.block.index,
            source: diagram.block.content,
            output: &diagram.output,
            options: &self.options,
        };

        match self.renderer.convert(&job) {
            Ok(()) => {
                tracing::info!(index = job.index, output = %diagram.output.display(), "Rendered diagram");
                ConversionOutcome::Succeeded {
                    index: diagram.block.index,
                    output: diagram.output,
                }
            }
            Err(reason) => {
                tracing::warn!(index = job.index, output = %diagram.output.display(), error = %reason, "Diagram rendering failed");
                ConversionOutcome::Failed {
                    index: diagram.block.index,
                    output: diagram.output,
                    reason,
                }
            }
        }
    }
}
