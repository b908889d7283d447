//! `diagex convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use diagex_config::CliSettings;
use diagex_diagrams::{
    DiagramExporter, DiagramFormat, Document, MermaidCli, RenderOptions, RunReport,
};

use super::{SourceArgs, fence_matcher};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory for rendered diagrams (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(long, value_parser = format_parser())]
    format: Option<DiagramFormat>,

    /// Mermaid theme (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// Background color (overrides config).
    #[arg(long)]
    background: Option<String>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long, env = "DIAGEX_MMDC")]
    mmdc: Option<String>,

    /// Exit with an error if any diagram fails to render.
    #[arg(long)]
    strict: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the document cannot be read,
    /// the output directory cannot be created, or `--strict` is set and a
    /// diagram failed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.source.load_config(CliSettings {
            output_dir: self.output_dir,
            format: self.format,
            command: self.mmdc,
            theme: self.theme,
            background: self.background,
            ..CliSettings::default()
        })?;
        let format = config.output_resolved.format;
        let fence = fence_matcher(&config)?;

        let document = Document::load(&config.docs_resolved.source)?;

        let renderer_config = &config.renderer_resolved;
        let mut renderer =
            MermaidCli::new(renderer_config.command.clone()).args(&renderer_config.args);
        if let Some(dir) = &renderer_config.staging_dir {
            renderer = renderer.staging_dir(dir);
        }

        let output_dir = &config.output_resolved.dir;
        let exporter = DiagramExporter::new(Box::new(renderer), output_dir)
            .format(format)
            .fence(fence)
            .options(RenderOptions {
                theme: renderer_config.theme.clone(),
                background: renderer_config.background.clone(),
            });

        let outcomes = exporter.export_with(&document, |outcome| output.outcome(outcome))?;
        let report = RunReport::from_outcomes(&outcomes);
        output.summary(&report, format, output_dir);

        if !report.all_succeeded() {
            output.warning(&format!(
                "{} of {} diagrams failed to render",
                report.failed,
                report.total()
            ));
            if self.strict {
                return Err(CliError::PartialFailure {
                    failed: report.failed,
                    total: report.total(),
                });
            }
        }

        Ok(())
    }
}

/// Parser for `--format` listing every [`DiagramFormat`] in help output.
fn format_parser() -> impl TypedValueParser<Value = DiagramFormat> {
    PossibleValuesParser::new(DiagramFormat::ALL.map(DiagramFormat::as_str))
        .try_map(|name| name.parse::<DiagramFormat>())
}
