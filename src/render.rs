//! External renderer seam.
//!
//! The [`Renderer`] trait is the single boundary between the planner and the
//! outside world: given a metadata file, an input and an output, a renderer
//! either produces the output or reports why it didn't. The production
//! implementation, [`PandocRenderer`], runs pandoc (or any command configured
//! in `[renderer]`) as a blocking child process.
//!
//! ## Invocation
//!
//! With stock settings a document renders as:
//!
//! ```text
//! pandoc --fail-if-warnings --metadata-file=<root>/pandoc.yaml --listings \
//!     --katex --toc --toc-depth=2 -s <dir>/index.md -o <dir>/index.html
//! ```
//!
//! The child inherits stdout and stderr so pandoc's own diagnostics reach the
//! terminal. Its exit status is the only thing inspected.

use crate::config::{MathEngine, RendererConfig};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Renderer command is empty")]
    EmptyCommand,
    #[error("Failed to start renderer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Paths for a single render.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub metadata_file: &'a Path,
    pub input: &'a Path,
    pub output: &'a Path,
}

/// How a render that did start ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Success,
    /// Non-zero exit; `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderOutcome::Success)
    }
}

/// Renders one document. Implementations block until the output is written
/// or the attempt has failed.
pub trait Renderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<RenderOutcome, RenderError>;
}

/// Runs the configured command with pandoc-style arguments.
#[derive(Debug, Clone)]
pub struct PandocRenderer {
    config: RendererConfig,
}

impl PandocRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Everything after the program name: leading command arguments, the
    /// option set, then input and output.
    pub fn arguments(&self, job: &RenderJob<'_>) -> Vec<OsString> {
        let config = &self.config;
        let mut args: Vec<OsString> = config.command.iter().skip(1).map(OsString::from).collect();

        if config.fail_if_warnings {
            args.push("--fail-if-warnings".into());
        }

        let mut metadata = OsString::from("--metadata-file=");
        metadata.push(job.metadata_file);
        args.push(metadata);

        if config.listings {
            args.push("--listings".into());
        }
        match config.math {
            MathEngine::Katex => args.push("--katex".into()),
            MathEngine::Mathjax => args.push("--mathjax".into()),
            MathEngine::Mathml => args.push("--mathml".into()),
            MathEngine::None => {}
        }
        args.push("--toc".into());
        args.push(format!("--toc-depth={}", config.toc_depth).into());
        if config.standalone {
            args.push("-s".into());
        }
        args.extend(config.extra_args.iter().map(OsString::from));

        args.push(job.input.into());
        args.push("-o".into());
        args.push(job.output.into());
        args
    }
}

impl Renderer for PandocRenderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<RenderOutcome, RenderError> {
        let program = self.config.command.first().ok_or(RenderError::EmptyCommand)?;
        let args = self.arguments(job);
        tracing::debug!(program = %program, ?args, "invoking renderer");

        let status = Command::new(program)
            .args(&args)
            .status()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(RenderOutcome::Success)
        } else {
            tracing::debug!(code = ?status.code(), input = %job.input.display(), "renderer failed");
            Ok(RenderOutcome::Failed {
                code: status.code(),
            })
        }
    }
}
