//! Timestamp-only staleness decision.
//!
//! A derived artifact is fresh iff it exists and its mtime is not earlier than
//! the newest of its inputs: the document source, the shared metadata file,
//! and the planner program. There is no content hashing and no include
//! tracking.
//!
//! An input whose mtime cannot be read (typically a missing metadata file)
//! cannot vouch for the output, so the document is treated as stale and the
//! renderer gets to report the real problem.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A freshness input and its modification time, if readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl Stamp {
    /// Read the mtime of `path` from the filesystem.
    pub fn read(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            modified: modified(path),
        }
    }
}

/// Modification time of `path`, or `None` if it does not exist or the
/// platform cannot report it.
pub fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Output is at least as new as every input.
    Fresh,
    /// Output does not exist.
    Missing,
    /// Output is older than `newer`.
    Outdated { newer: PathBuf },
    /// The mtime of `input` could not be read.
    Unverifiable { input: PathBuf },
    /// Rebuild requested regardless of timestamps.
    Forced,
}

impl Freshness {
    pub fn is_stale(&self) -> bool {
        !matches!(self, Freshness::Fresh)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Freshness::Fresh => write!(f, "up to date"),
            Freshness::Missing => write!(f, "output missing"),
            Freshness::Outdated { newer } => write!(f, "{} is newer", newer.display()),
            Freshness::Unverifiable { input } => {
                write!(f, "cannot read mtime of {}", input.display())
            }
            Freshness::Forced => write!(f, "forced"),
        }
    }
}

/// Decide freshness from an output mtime and the input stamps.
///
/// The first input with the strictly newest mtime is named in
/// [`Freshness::Outdated`].
pub fn decide(output: Option<SystemTime>, inputs: &[Stamp]) -> Freshness {
    let Some(output) = output else {
        return Freshness::Missing;
    };

    let mut newest: Option<(&Path, SystemTime)> = None;
    for stamp in inputs {
        let Some(modified) = stamp.modified else {
            return Freshness::Unverifiable {
                input: stamp.path.clone(),
            };
        };
        if newest.is_none_or(|(_, t)| modified > t) {
            newest = Some((&stamp.path, modified));
        }
    }

    match newest {
        Some((path, latest)) if output < latest => Freshness::Outdated {
            newer: path.to_path_buf(),
        },
        _ => Freshness::Fresh,
    }
}

/// Read the output's mtime from disk and decide against `inputs`.
pub fn check(output: &Path, inputs: &[Stamp]) -> Freshness {
    decide(modified(output), inputs)
}
