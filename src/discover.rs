//! Document discovery.
//!
//! A document is any directory holding a file named exactly like the
//! configured source (`index.md` by default). Its derived artifact sits next
//! to the source:
//!
//! ```text
//! site/
//! ├── index.md          # the root itself is a document
//! ├── index.html
//! └── docs/
//!     ├── intro/
//!     │   ├── index.md
//!     │   └── index.html
//!     └── notes.md      # not a document: wrong file name
//! ```
//!
//! The walk is lazy and ordered by file name at every level, so documents come
//! out in lexicographic order of their source paths on every run
//! (`docs/a/deeper/index.md` before `docs/a/index.md`).

use crate::config::BuildConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl DiscoverError {
    /// True when the root itself could not be walked, so nothing below it
    /// can be discovered either.
    pub fn is_at_root(&self) -> bool {
        match self {
            DiscoverError::Walk(e) => e.depth() == 0,
        }
    }

    /// Path the walk failed on, if known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DiscoverError::Walk(e) => e.path(),
        }
    }

    /// The underlying cause without the path, for per-directory reports.
    pub fn cause(&self) -> String {
        match self {
            DiscoverError::Walk(e) => e
                .io_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| e.to_string()),
        }
    }
}

/// One directory-backed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub dir: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl Document {
    /// Directory relative to the build root, `.` for the root itself.
    pub fn display_dir(&self, root: &Path) -> PathBuf {
        relative_dir(&self.dir, root)
    }
}

/// `dir` relative to `root`: `.` for the root itself, unchanged when outside.
pub fn relative_dir(dir: &Path, root: &Path) -> PathBuf {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => dir.to_path_buf(),
    }
}

/// A restartable description of the documents under a root.
///
/// Each call to [`Discovery::iter`] starts a fresh walk.
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    source_name: String,
    output_name: String,
}

impl Discovery {
    pub fn new(root: &Path, config: &BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            source_name: config.documents.source_name.clone(),
            output_name: config.output_name(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Document, DiscoverError>> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Err(e) => Some(Err(DiscoverError::Walk(e))),
                Ok(entry) => {
                    if entry.file_name() != OsStr::new(&self.source_name) {
                        return None;
                    }
                    // Follows a symlinked source, but skips directories with the name
                    if !entry.path().is_file() {
                        return None;
                    }
                    let dir = entry.path().parent()?;
                    Some(Ok(self.document(dir)))
                }
            })
    }

    fn document(&self, dir: &Path) -> Document {
        Document {
            dir: dir.to_path_buf(),
            source: dir.join(&self.source_name),
            output: dir.join(&self.output_name),
        }
    }
}
