//! Mermaid CLI (`mmdc`) renderer.
//!
//! Each job is written to a staging file named after the block index, then
//! `mmdc -i <staging> -o <output> -t <theme> -b <background>` runs to
//! completion. The staging file is removed after the attempt whatever the
//! outcome.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use crate::consts::{DEFAULT_COMMAND, STAGING_EXTENSION};
use crate::error::RenderError;
use crate::renderer::{RenderJob, Renderer};

/// Renderer that shells out to the Mermaid CLI.
///
/// # Example
///
/// ```ignore
/// use diagex_diagrams::MermaidCli;
///
/// let renderer = MermaidCli::new("mmdc")
///     .args(&["--scale".to_owned(), "2".to_owned()])
///     .staging_dir("/tmp/diagex");
/// ```
#[derive(Debug, Clone)]
pub struct MermaidCli {
    /// Executable to run.
    command: String,
    /// Extra arguments appended after the standard ones.
    args: Vec<String>,
    /// Directory for staging files (system temp dir when `None`).
    staging_dir: Option<PathBuf>,
}

impl MermaidCli {
    /// Create a renderer running `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            staging_dir: None,
        }
    }

    /// Set extra arguments appended to every invocation.
    #[must_use]
    pub fn args(mut self, args: &[String]) -> Self {
        self.args = args.to_vec();
        self
    }

    /// Set the directory for staging files.
    #[must_use]
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Write the job's source to a fresh staging file.
    fn stage(&self, job: &RenderJob<'_>) -> Result<NamedTempFile, RenderError> {
        let prefix = format!("diagram_{}_", job.index);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(STAGING_EXTENSION);

        let mut staging = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(RenderError::Staging)?;

        staging
            .write_all(job.source.as_bytes())
            .and_then(|()| staging.flush())
            .map_err(RenderError::Staging)?;
        Ok(staging)
    }

    /// Run the renderer against a staged file and wait for it to exit.
    fn invoke(&self, input: &Path, job: &RenderJob<'_>) -> Result<(), RenderError> {
        tracing::debug!(
            command = %self.command,
            input = %input.display(),
            output = %job.output.display(),
            "Running renderer"
        );

        let output = Command::new(&self.command)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(job.output)
            .arg("-t")
            .arg(&job.options.theme)
            .arg("-b")
            .arg(&job.options.background)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RenderError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl Renderer for MermaidCli {
    fn convert(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let staging = self.stage(job)?;
        let result = self.invoke(staging.path(), job);

        let staging_path = staging.path().to_path_buf();
        if let Err(e) = staging.close() {
            tracing::warn!(
                path = %staging_path.display(),
                error = %e,
                "Failed to remove staging file"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderOptions;

    fn staged_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn test_stage_writes_source_with_index_prefix() {
        let staging_dir = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::default().staging_dir(staging_dir.path());
        let options = RenderOptions::default();
        let job = RenderJob {
            index: 4,
            source: "graph TD\n  A --> B\n",
            output: Path::new("unused.svg"),
            options: &options,
        };

        let staging = renderer.stage(&job).unwrap();

        let name = staging.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("diagram_4_"), "unexpected name {name}");
        assert!(name.ends_with(".mmd"), "unexpected name {name}");
        assert_eq!(
            std::fs::read_to_string(staging.path()).unwrap(),
            "graph TD\n  A --> B\n"
        );
    }

    #[test]
    fn test_missing_command_is_spawn_error_and_cleans_up() {
        let staging_dir = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::new("diagex-test-no-such-renderer")
            .staging_dir(staging_dir.path());
        let options = RenderOptions::default();
        let job = RenderJob {
            index: 0,
            source: "A-->B",
            output: &staging_dir.path().join("out.svg"),
            options: &options,
        };

        let err = renderer.convert(&job).unwrap_err();

        assert!(matches!(err, RenderError::Spawn { .. }));
        assert!(err.to_string().contains("diagex-test-no-such-renderer"));
        assert!(staged_files(staging_dir.path()).is_empty());
    }

    #[test]
    fn test_missing_staging_dir_is_staging_error() {
        let root = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::default().staging_dir(root.path().join("missing"));
        let options = RenderOptions::default();
        let job = RenderJob {
            index: 0,
            source: "A-->B",
            output: Path::new("out.svg"),
            options: &options,
        };

        let err = renderer.convert(&job).unwrap_err();

        assert!(matches!(err, RenderError::Staging(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_exit_cleans_up() {
        let staging_dir = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::new("true").staging_dir(staging_dir.path());
        let options = RenderOptions::default();
        let job = RenderJob {
            index: 1,
            source: "A-->B",
            output: Path::new("out.svg"),
            options: &options,
        };

        renderer.convert(&job).unwrap();

        assert!(staged_files(staging_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_failed_and_cleans_up() {
        let staging_dir = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::new("false").staging_dir(staging_dir.path());
        let options = RenderOptions::default();
        let job = RenderJob {
            index: 2,
            source: "A-->B",
            output: Path::new("out.svg"),
            options: &options,
        };

        let err = renderer.convert(&job).unwrap_err();

        match err {
            RenderError::Failed { command, status, .. } => {
                assert_eq!(command, "false");
                assert!(!status.success());
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(staged_files(staging_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_passes_standard_arguments() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let staging_dir = root.path().join("staging");
        std::fs::create_dir(&staging_dir).unwrap();
        let log = root.path().join("args.txt");
        let script = root.path().join("fake-mmdc");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\ncp \"$2\" \"$4\"\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let output = root.path().join("diagram.svg");
        let options = RenderOptions {
            theme: "dark".to_owned(),
            background: "white".to_owned(),
        };
        let job = RenderJob {
            index: 0,
            source: "graph LR\n  A --> B\n",
            output: &output,
            options: &options,
        };
        let renderer = MermaidCli::new(script.to_string_lossy())
            .args(&["--quiet".to_owned()])
            .staging_dir(&staging_dir);

        renderer.convert(&job).unwrap();

        let logged = std::fs::read_to_string(&log).unwrap();
        let args: Vec<&str> = logged.lines().collect();
        assert_eq!(args.len(), 9, "unexpected args {args:?}");
        assert_eq!(args[0], "-i");
        assert!(args[1].starts_with(&*staging_dir.to_string_lossy()));
        assert!(args[1].ends_with(".mmd"));
        assert_eq!(args[2..], ["-o", &*output.to_string_lossy(), "-t", "dark", "-b", "white", "--quiet"]);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "graph LR\n  A --> B\n"
        );
        assert!(staged_files(&staging_dir).is_empty());
    }
}
