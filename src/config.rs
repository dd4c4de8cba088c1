//! Build configuration module.
//!
//! Handles loading and validating `docbuild.toml`. Stock defaults
//! reproduce the classic pandoc invocation, so a site with no config file at
//! all builds exactly as it always did.
//!
//! ## Config File Location
//!
//! Place `docbuild.toml` in the build root, or point `--config` at a file
//! elsewhere:
//!
//! ```text
//! site/
//! ├── docbuild.toml            # Build config (optional)
//! ├── pandoc.yaml              # Metadata file handed to every render
//! ├── index.md
//! └── docs/
//!     └── intro/
//!         └── index.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [documents]
//! source_name = "index.md"      # File that marks a document directory
//! output_extension = "html"     # Derived artifact: source_name with this extension
//!
//! [renderer]
//! command = ["pandoc"]          # Program plus any leading arguments
//! metadata_file = "pandoc.yaml" # Relative to the build root
//! toc_depth = 2
//! fail_if_warnings = true
//! listings = true
//! math = "katex"                # katex | mathjax | mathml | none
//! standalone = true
//! extra_args = []
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the build root.
pub const CONFIG_FILENAME: &str = "docbuild.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `docbuild.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Which files mark documents and what they render to.
    pub documents: DocumentsConfig,
    /// How the external renderer is invoked.
    pub renderer: RendererConfig,
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let docs = &self.documents;
        let source = Path::new(&docs.source_name);
        if source.file_name() != Some(OsStr::new(&docs.source_name)) {
            return Err(ConfigError::Validation(
                "documents.source_name must be a bare file name".into(),
            ));
        }
        let Some(source_ext) = source.extension() else {
            return Err(ConfigError::Validation(
                "documents.source_name must have an extension".into(),
            ));
        };
        if docs.output_extension.is_empty() || docs.output_extension.contains('.') {
            return Err(ConfigError::Validation(
                "documents.output_extension must be non-empty and contain no dots".into(),
            ));
        }
        if source_ext.eq_ignore_ascii_case(docs.output_extension.as_str()) {
            return Err(ConfigError::Validation(
                "documents.output_extension must differ from the source extension".into(),
            ));
        }

        let renderer = &self.renderer;
        if renderer.command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "renderer.command must name a program".into(),
            ));
        }
        if !(1..=6).contains(&renderer.toc_depth) {
            return Err(ConfigError::Validation(
                "renderer.toc_depth must be 1-6".into(),
            ));
        }
        if renderer.metadata_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "renderer.metadata_file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// File name of the derived artifact, e.g. `index.html`.
    pub fn output_name(&self) -> String {
        Path::new(&self.documents.source_name)
            .with_extension(&self.documents.output_extension)
            .to_string_lossy()
            .into_owned()
    }
}

/// Document layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Exact file name that marks a directory as a document.
    pub source_name: String,
    /// Extension of the derived artifact written next to the source.
    pub output_extension: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            source_name: "index.md".to_string(),
            output_extension: "html".to_string(),
        }
    }
}

/// Math typesetting engine passed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathEngine {
    Katex,
    Mathjax,
    Mathml,
    None,
}

/// External renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Program followed by any leading arguments, e.g. `["pandoc"]`.
    pub command: Vec<String>,
    /// Metadata file, relative to the build root unless absolute.
    pub metadata_file: PathBuf,
    /// Depth of the generated table of contents.
    pub toc_depth: u8,
    /// Treat renderer warnings as failures.
    pub fail_if_warnings: bool,
    /// Format code blocks with the listings package.
    pub listings: bool,
    /// Math typesetting engine.
    pub math: MathEngine,
    /// Produce a standalone document with header and footer.
    pub standalone: bool,
    /// Appended after the fixed options, before the input path.
    pub extra_args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: vec!["pandoc".to_string()],
            metadata_file: PathBuf::from("pandoc.yaml"),
            toc_depth: 2,
            fail_if_warnings: true,
            listings: true,
            math: MathEngine::Katex,
            standalone: true,
            extra_args: Vec::new(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse `docbuild.toml` content and validate it.
///
/// Every table carries `#[serde(default)]`, so keys the file leaves out keep
/// their stock values.
pub fn parse_config(content: &str) -> Result<BuildConfig, ConfigError> {
    let config: BuildConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `docbuild.toml` in the given root directory.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILENAME))
}

/// Load config from an explicit file path, falling back to defaults if absent.
pub fn load_config_file(config_path: &Path) -> Result<BuildConfig, ConfigError> {
    if !config_path.exists() {
        return Ok(BuildConfig::default());
    }
    parse_config(&fs::read_to_string(config_path)?)
}

/// Returns a fully-commented stock `docbuild.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docbuild configuration
# ======================
# Every key is optional. Delete what you don't change; the values below
# are the built-in defaults.

[documents]
# A directory containing a file with this exact name is a document.
source_name = "index.md"

# The derived artifact is written next to the source, named after it with
# this extension (index.md -> index.html).
output_extension = "html"

[renderer]
# Program to run, followed by any leading arguments.
# e.g. ["docker", "run", "--rm", "-v", ".:/data", "pandoc/latex"]
command = ["pandoc"]

# Shared metadata file passed to every render. Relative paths resolve
# against the build root. Its modification time counts toward every
# document's staleness check.
metadata_file = "pandoc.yaml"

# Table of contents depth (1-6).
toc_depth = 2

# Make renderer warnings fail the document.
fail_if_warnings = true

# Format code blocks with the LaTeX listings package.
listings = true

# Math engine: "katex", "mathjax", "mathml" or "none".
math = "katex"

# Produce a standalone document with header and footer.
standalone = true

# Extra arguments appended after the options above.
extra_args = []
"##
}
