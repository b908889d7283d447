//! `diagex list` command implementation.

use clap::Args;
use diagex_config::CliSettings;
use diagex_diagrams::{Document, PlannedDiagram, plan};

use super::{SourceArgs, fence_matcher};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// Never runs the renderer and never creates the output directory.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.source.load_config(CliSettings::default())?;
        let format = config.output_resolved.format;
        let fence = fence_matcher(&config)?;
        let document = Document::load(&config.docs_resolved.source)?;

        let planned = plan(&document, &fence, &config.output_resolved.dir, format);
        for diagram in &planned {
            output.info(&diagram_line(diagram));
        }
        output.info(&format!(
            "Found {} diagrams in {}",
            planned.len(),
            document.path().display()
        ));
        Ok(())
    }
}

/// Listing line for one planned diagram.
fn diagram_line(diagram: &PlannedDiagram<'_>) -> String {
    format!(
        "{}. {} -> {} ({} lines)",
        diagram.block.index + 1,
        diagram.name,
        diagram.output.display(),
        diagram.block.content.lines().count()
    )
}
