//! Rebuild planning and execution.
//!
//! For every discovered document the planner makes one stateless decision:
//! build (derived artifact stale or missing) or skip (fresh). Builds run the
//! renderer synchronously, one document at a time, in discovery order.
//!
//! ## Failure Handling
//!
//! A renderer that exits non-zero, or cannot be started at all, fails only
//! its own document. A directory the walk cannot read fails only itself; the
//! documents beside and after it are still processed. The walk always
//! completes; the returned [`BuildReport`] lists every failure and
//! [`BuildReport::is_success`] turns false so the CLI can exit non-zero at
//! the end. Only an unreadable root aborts the run.
//!
//! ## Progress Events
//!
//! [`build`] calls back with a [`BuildEvent`] per document, synchronously and
//! before the renderer starts, so a `Building` line always precedes the
//! renderer's own output for that document.

use crate::context::BuildContext;
use crate::discover::{self, DiscoverError, Discovery, Document};
use crate::freshness::{self, Freshness, Stamp};
use crate::render::{RenderJob, RenderOutcome, Renderer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Discovery error: {0}")]
    Discover(#[from] DiscoverError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Rebuild every document regardless of timestamps.
    pub force: bool,
}

/// What the planner will do with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    Skip,
}

#[derive(Debug, Clone)]
pub struct PlannedDocument {
    pub document: Document,
    /// Directory relative to the build root, for display.
    pub display_dir: PathBuf,
    pub freshness: Freshness,
}

impl PlannedDocument {
    pub fn action(&self) -> Action {
        if self.freshness.is_stale() {
            Action::Build
        } else {
            Action::Skip
        }
    }
}

/// Progress event emitted for each document.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Building { dir: PathBuf, reason: Freshness },
    Skipping { dir: PathBuf },
    Failed { dir: PathBuf, reason: FailureReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The renderer ran and exited non-zero (`None`: killed by a signal).
    Exit(Option<i32>),
    /// The renderer could not be started.
    Spawn(String),
    /// The walk could not read this directory.
    Unreadable(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exit(Some(code)) => write!(f, "renderer exited with code {}", code),
            FailureReason::Exit(None) => write!(f, "renderer terminated by signal"),
            FailureReason::Spawn(msg) => write!(f, "{}", msg),
            FailureReason::Unreadable(msg) => write!(f, "cannot read directory: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub dir: PathBuf,
    pub reason: FailureReason,
}

/// Outcome of a dry run.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub documents: Vec<PlannedDocument>,
    /// Directories the walk could not read.
    pub unreadable: Vec<Failure>,
}

/// Outcome of a full build run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub built: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<Failure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.built.len() + self.skipped.len() + self.failed.len()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "No documents found");
        }
        write!(
            f,
            "{} built, {} skipped, {} failed",
            self.built.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Read the mtimes shared by every document once per run.
fn shared_stamps(ctx: &BuildContext) -> Vec<Stamp> {
    ctx.shared_inputs().into_iter().map(Stamp::read).collect()
}

fn plan_document(
    ctx: &BuildContext,
    shared: &[Stamp],
    document: Document,
    options: BuildOptions,
) -> PlannedDocument {
    let freshness = if options.force {
        Freshness::Forced
    } else {
        let mut inputs = Vec::with_capacity(shared.len() + 1);
        inputs.push(Stamp::read(&document.source));
        inputs.extend_from_slice(shared);
        freshness::check(&document.output, &inputs)
    };
    let display_dir = document.display_dir(&ctx.root);
    tracing::debug!(dir = %display_dir.display(), %freshness, "planned document");
    PlannedDocument {
        document,
        display_dir,
        freshness,
    }
}

/// Turn a walk error below the root into a failure for that directory.
/// An error at the root is returned as-is: nothing can be discovered.
fn walk_failure(ctx: &BuildContext, err: DiscoverError) -> Result<Failure, BuildError> {
    if err.is_at_root() {
        return Err(err.into());
    }
    let dir = err
        .path()
        .map(|p| discover::relative_dir(p, &ctx.root))
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(dir = %dir.display(), error = %err, "skipping unreadable directory");
    Ok(Failure {
        dir,
        reason: FailureReason::Unreadable(err.cause()),
    })
}

/// Decide every document without touching the filesystem or the renderer.
pub fn plan(ctx: &BuildContext, options: BuildOptions) -> Result<Plan, BuildError> {
    let shared = shared_stamps(ctx);
    let mut plan = Plan::default();
    for document in Discovery::new(&ctx.root, &ctx.config).iter() {
        match document {
            Ok(document) => plan
                .documents
                .push(plan_document(ctx, &shared, document, options)),
            Err(err) => plan.unreadable.push(walk_failure(ctx, err)?),
        }
    }
    Ok(plan)
}

/// Plan and execute: render every stale document, skip the fresh ones.
///
/// Renderer failures and unreadable subdirectories are collected in the
/// report, never returned as `Err`; only an unreadable root aborts the run.
pub fn build(
    ctx: &BuildContext,
    options: BuildOptions,
    renderer: &impl Renderer,
    mut on_event: impl FnMut(&BuildEvent),
) -> Result<BuildReport, BuildError> {
    let shared = shared_stamps(ctx);
    let mut emit = |event: BuildEvent| on_event(&event);

    let mut report = BuildReport::default();
    for document in Discovery::new(&ctx.root, &ctx.config).iter() {
        let document = match document {
            Ok(document) => document,
            Err(err) => {
                let failure = walk_failure(ctx, err)?;
                emit(BuildEvent::Failed {
                    dir: failure.dir.clone(),
                    reason: failure.reason.clone(),
                });
                report.failed.push(failure);
                continue;
            }
        };
        let planned = plan_document(ctx, &shared, document, options);
        let dir = planned.display_dir.clone();

        if planned.action() == Action::Skip {
            emit(BuildEvent::Skipping { dir: dir.clone() });
            report.skipped.push(dir);
            continue;
        }

        emit(BuildEvent::Building {
            dir: dir.clone(),
            reason: planned.freshness.clone(),
        });
        let job = RenderJob {
            metadata_file: &ctx.metadata_file,
            input: &planned.document.source,
            output: &planned.document.output,
        };
        let failure = match renderer.render(&job) {
            Ok(RenderOutcome::Success) => None,
            Ok(RenderOutcome::Failed { code }) => Some(FailureReason::Exit(code)),
            Err(e) => Some(FailureReason::Spawn(e.to_string())),
        };

        match failure {
            None => report.built.push(dir),
            Some(reason) => {
                tracing::debug!(dir = %dir.display(), %reason, "document failed to render");
                emit(BuildEvent::Failed {
                    dir: dir.clone(),
                    reason: reason.clone(),
                });
                report.failed.push(Failure { dir, reason });
            }
        }
    }

    Ok(report)
}
