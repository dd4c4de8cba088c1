//! Build context resolved once at startup.
//!
//! Every path the planner needs that does not come from discovery lives here:
//! the build root, the shared metadata file, and the files whose timestamps
//! stand for the planner program itself. Nothing downstream recomputes them.

use crate::config::{self, BuildConfig, ConfigError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Build root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
}

#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Directory searched for documents.
    pub root: PathBuf,
    /// Metadata file passed to every render; also a freshness input.
    pub metadata_file: PathBuf,
    /// Files whose mtimes represent the planner program: the running
    /// executable, plus the config file when one is in use.
    pub program_stamps: Vec<PathBuf>,
    pub config: BuildConfig,
}

impl BuildContext {
    /// Build a context from already-resolved parts.
    ///
    /// The metadata file defaults to `renderer.metadata_file` joined onto the
    /// root (an absolute setting replaces the root entirely).
    pub fn new(root: PathBuf, config: BuildConfig, program: PathBuf) -> Self {
        let metadata_file = root.join(&config.renderer.metadata_file);
        Self {
            root,
            metadata_file,
            program_stamps: vec![program],
            config,
        }
    }

    /// Resolve the context for a CLI run.
    ///
    /// - `config_path`: explicit config file; must exist. Without it,
    ///   `docbuild.toml` in the root is used if present.
    /// - `metadata`: overrides the configured metadata file.
    pub fn resolve(
        root: &Path,
        config_path: Option<&Path>,
        metadata: Option<&Path>,
    ) -> Result<Self, ContextError> {
        if !root.is_dir() {
            return Err(ContextError::RootNotDirectory(root.to_path_buf()));
        }

        let config_file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(ContextError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => root.join(config::CONFIG_FILENAME),
        };
        let config = config::load_config_file(&config_file)?;

        let mut context = Self::new(root.to_path_buf(), config, std::env::current_exe()?);
        if config_file.is_file() {
            context.program_stamps.push(config_file);
        }
        if let Some(metadata) = metadata {
            context.metadata_file = metadata.to_path_buf();
        }

        tracing::debug!(
            root = %context.root.display(),
            metadata = %context.metadata_file.display(),
            program_stamps = ?context.program_stamps,
            "resolved build context"
        );
        Ok(context)
    }

    /// Freshness inputs shared by every document: the metadata file followed
    /// by the program stamps.
    pub fn shared_inputs(&self) -> Vec<&Path> {
        std::iter::once(self.metadata_file.as_path())
            .chain(self.program_stamps.iter().map(PathBuf::as_path))
            .collect()
    }
}
