//! # docbuild
//!
//! Incremental pandoc builds for sites laid out as one directory per page.
//! Every directory holding an `index.md` is a document; its `index.html` is
//! rebuilt only when something it depends on has changed.
//!
//! # Architecture
//!
//! ```text
//! context   root, metadata file, program stamps, config  (resolved once)
//!    │
//! discover  walk root → Document { dir, source, output }  (sorted, lazy)
//!    │
//! freshness output mtime vs max(source, metadata, program) → build | skip
//!    │
//! render    stale documents → pandoc, one at a time, blocking
//!    │
//! plan      collects per-document outcomes into a BuildReport
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `docbuild.toml` loading and validation, stock defaults for unset keys |
//! | [`context`] | Paths resolved once at startup and passed down |
//! | [`discover`] | Sorted, restartable walk yielding documents |
//! | [`freshness`] | The timestamp-only staleness decision |
//! | [`render`] | `Renderer` trait and the pandoc implementation |
//! | [`plan`] | Dry-run planning and plan-and-execute |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Timestamps Only
//!
//! Freshness is decided from modification times alone: the derived artifact
//! must be at least as new as its source, the shared metadata file, and the
//! planner program. No manifest, no hashes, no include tracking. Touching
//! the metadata file rebuilds the whole site.
//!
//! ## Fail at End
//!
//! A document that fails to render does not stop the walk, and neither does
//! a subdirectory the walk cannot read. Every other stale document still
//! gets built, and the run exits non-zero once the walk is done. Failures are reported on their own line, never folded into "skipped".
//!
//! ## One Seam
//!
//! Everything outside the process goes through [`render::Renderer`]. The
//! planner is tested against a recording mock; the pandoc implementation is
//! tested for the arguments it builds.

pub mod config;
pub mod context;
pub mod discover;
pub mod freshness;
pub mod output;
pub mod plan;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
