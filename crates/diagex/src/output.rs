//! Colored terminal output for conversion runs.

use std::path::Path;

use console::{Style, Term};
use diagex_diagrams::{ConversionOutcome, DiagramFormat, RunReport};

/// Terminal output formatter.
///
/// Results go to stdout, diagnostics to stderr.
pub(crate) struct Output {
    out: Term,
    err: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print a plain result line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.out.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print the line for one conversion.
    pub(crate) fn outcome(&self, outcome: &ConversionOutcome) {
        let line = outcome_line(outcome);
        if outcome.is_success() {
            let _ = self.out.write_line(&self.green.apply_to(line).to_string());
        } else {
            self.error(&line);
        }
    }

    /// Print the closing summary of a run.
    pub(crate) fn summary(&self, report: &RunReport, format: DiagramFormat, output_dir: &Path) {
        let _ = self.out.write_line("");
        let line = summary_line(report, format, output_dir);
        let _ = self
            .out
            .write_line(&self.cyan_bold.apply_to(line).to_string());
    }
}

/// Console line for one conversion outcome.
pub(crate) fn outcome_line(outcome: &ConversionOutcome) -> String {
    match outcome {
        ConversionOutcome::Succeeded { output, .. } => {
            format!("Generated: {}", output.display())
        }
        ConversionOutcome::Failed { output, reason, .. } => {
            format!("Failed to generate {}: {reason}", output.display())
        }
    }
}

/// Closing summary line of a run.
pub(crate) fn summary_line(report: &RunReport, format: DiagramFormat, output_dir: &Path) -> String {
    format!(
        "Conversion complete! Generated {} {} files in the '{}' directory.",
        report.succeeded,
        format.label(),
        output_dir.display()
    )
}
