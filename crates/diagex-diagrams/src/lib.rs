//! Diagram extraction and rendering for diagex.
//!
//! This crate turns the diagram code blocks of a markdown document into
//! standalone image files:
//! - [`Fence`] lazily extracts `` ```mermaid `` blocks in document order
//! - [`HeadingIndex`] names each block after its closest preceding `## ` heading
//! - [`Renderer`] abstracts the converter; [`MermaidCli`] shells out to `mmdc`
//! - [`DiagramExporter`] runs the pipeline and collects [`ConversionOutcome`]s
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `extract`: fenced block extraction (`Fence`, `DiagramBlock`)
//! - `title`: heading lookup and name derivation (`HeadingIndex`, `slugify`)
//! - `renderer`: renderer capability (`Renderer`, `RenderJob`, `RenderOptions`)
//! - `mmdc`: Mermaid CLI renderer with per-diagram staging files
//! - `exporter`: sequential export pipeline
//! - `report`: per-diagram outcomes and run counts
//!
//! # Example
//!
//! ```ignore
//! use diagex_diagrams::{DiagramExporter, Document, MermaidCli, RunReport};
//!
//! let document = Document::load("docs/UML.md".as_ref())?;
//! let exporter = DiagramExporter::new(Box::new(MermaidCli::default()), "uml-diagrams-svg");
//! let outcomes = exporter.export(&document)?;
//! let report = RunReport::from_outcomes(&outcomes);
//! ```

mod consts;
mod document;
mod error;
mod exporter;
mod extract;
mod format;
mod mmdc;
mod renderer;
mod report;
mod title;

pub use consts::{DEFAULT_BACKGROUND, DEFAULT_COMMAND, DEFAULT_FENCE, DEFAULT_THEME};
pub use document::Document;
pub use error::{ExportError, RenderError};
pub use exporter::{DiagramExporter, PlannedDiagram, plan};
pub use extract::{Blocks, DiagramBlock, Fence};
pub use format::{DiagramFormat, UnknownFormat};
pub use mmdc::MermaidCli;
pub use renderer::{RenderJob, RenderOptions, Renderer};
pub use report::{ConversionOutcome, RunReport};
pub use title::{HeadingIndex, slugify};
