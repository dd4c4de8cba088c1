//! Shared test utilities: a temp-dir site fixture with controllable mtimes.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new();
//! site.add_document("docs/intro");
//! let ctx = site.context();
//! ```
//!
//! Every input the fixture creates (sources, metadata file, program stamp)
//! is backdated by [`INPUT_AGE_HOURS`], so any output written during a test
//! is newer than all of them.

use crate::config::BuildConfig;
use crate::context::BuildContext;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub const INPUT_AGE_HOURS: u64 = 24;

pub fn hours_ago(hours: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(hours * 3600)
}

pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .unwrap_or_else(|e| panic!("set mtime on {}: {e}", path.display()));
}

pub struct SiteFixture {
    pub tmp: TempDir,
    pub program: PathBuf,
}

impl SiteFixture {
    /// Empty site with a metadata file and a stand-in program executable.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let program = tmp.path().join(".bin/docbuild");
        let site = Self { tmp, program };
        site.write_input(&site.program.clone(), "#!/bin/false\n");
        site.write_input(&site.root().join("pandoc.yaml"), "toc-title: Contents\n");
        site
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.root().join("pandoc.yaml")
    }

    /// Create `<dir>/index.md` under the root; returns the document directory.
    pub fn add_document(&self, dir: &str) -> PathBuf {
        let path = self.root().join(dir);
        self.write_input(&path.join("index.md"), &format!("# {dir}\n\nBody.\n"));
        path
    }

    /// Write an already-built `index.html` with the given mtime.
    pub fn add_output(&self, dir: &str, modified: SystemTime) -> PathBuf {
        let path = self.root().join(dir).join("index.html");
        fs::write(&path, format!("<h1>{dir}</h1>\n")).unwrap();
        set_mtime(&path, modified);
        path
    }

    pub fn context(&self) -> BuildContext {
        BuildContext::new(
            self.root().to_path_buf(),
            BuildConfig::default(),
            self.program.clone(),
        )
    }

    fn write_input(&self, path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        set_mtime(path, hours_ago(INPUT_AGE_HOURS));
    }
}
