//! Configuration for rendering and exports.
//!
//! Configuration is stored in TOML. Every field has a default, so an empty or
//! partial file is valid and a missing file at the default location simply
//! yields [`Config::default`].
//!
//! ## Lookup order
//!
//! 1. An explicit path passed to [`Config::load`]
//! 2. The `BLOTTER_CONFIG` environment variable
//! 3. The platform config directory (see [`Config::default_path`])
//!
//! ## Example configuration file
//!
//! ```toml
//! [render]
//! color = "automatic"
//! prerender_threshold = 100
//! max_workers = 32
//! min_parallel_jobs = 32
//! max_body_size = 1048576
//!
//! [pdf]
//! page_width = 612.0
//! page_height = 792.0
//! margin = 36.0
//! ```
//!
//! ```rust
//! use blotter_core::Config;
//!
//! let config: Config = toml::from_str("[render]\ncolor = \"monochrome\"")?;
//! assert_eq!(config.render.prerender_threshold, 100);
//! # Ok::<(), toml::de::Error>(())
//! ```

use crate::renderer::{DEFAULT_MAX_WORKERS, DEFAULT_MIN_PARALLEL_JOBS, DEFAULT_PRERENDER_THRESHOLD};
use crate::style::ColorMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "BLOTTER_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document building and batch export.
    pub render: RenderConfig,
    /// PDF page layout.
    pub pdf: PdfConfig,
}

/// Settings for [`TextRenderer`](crate::TextRenderer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color mode of rendered documents.
    pub color: ColorMode,

    /// Batch exports with more entities than this pre-render response bodies
    /// in parallel before joining.
    pub prerender_threshold: usize,

    /// Worker count for the pre-render pass.
    pub max_workers: usize,

    /// Job count from which the pre-render pass uses `max_workers` workers
    /// instead of one.
    pub min_parallel_jobs: usize,

    /// Bodies larger than this many bytes are summarized instead of formatted.
    pub max_body_size: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Automatic,
            prerender_threshold: DEFAULT_PRERENDER_THRESHOLD,
            max_workers: DEFAULT_MAX_WORKERS,
            min_parallel_jobs: DEFAULT_MIN_PARALLEL_JOBS,
            max_body_size: None,
        }
    }
}

/// Page geometry for PDF export, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page width. US Letter by default.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Margin on every side.
    pub margin: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 36.0,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` or a path from `BLOTTER_CONFIG` must exist. A missing
    /// file at the default location yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if:
    /// - An explicitly named file does not exist or cannot be read
    /// - The file contains invalid TOML or invalid values
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = explicit {
            return Self::load_from(&path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    /// Platform location of the config file.
    ///
    /// - Linux: `~/.config/blotter/config.toml`
    /// - macOS: `~/Library/Application Support/dev.outfitter.blotter/config.toml`
    /// - Windows: `%APPDATA%\outfitter\blotter\config\config.toml`
    ///
    /// `None` when the platform has no home directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "outfitter", "blotter")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.render.max_workers == 0 {
            return Err(Error::Config("render.max_workers must be at least 1".into()));
        }
        let pdf = &self.pdf;
        if pdf.margin < 0.0 || pdf.page_width <= 2.0 * pdf.margin || pdf.page_height <= 2.0 * pdf.margin {
            return Err(Error::Config(
                "pdf page must be larger than twice its margin".into(),
            ));
        }
        Ok(())
    }
}
