//! Configuration types for archdraw rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are rendered. All types implement [`serde::Deserialize`] for loading from
//! TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Output format and Graphviz layout program.
//! - [`OutputFormat`] - Supported output file formats.
//! - [`load_config`] - Finds and loads a configuration file.
//!
//! # Example
//!
//! ```
//! # use archdraw::config::{AppConfig, OutputFormat};
//! let config: AppConfig = toml::from_str(r#"
//!     [render]
//!     format = "svg"
//!
//!     [style.graph]
//!     splines = "ortho"
//! "#).unwrap();
//!
//! assert_eq!(config.render().format(), Some(OutputFormat::Svg));
//! assert_eq!(config.style().graph().get("splines"), Some("ortho"));
//! ```

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use archdraw_core::style::GraphStyle;

use crate::{ArchdrawError, error::ConfigError};

/// Top-level configuration combining render and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Default global style, merged under each diagram's own style.
    #[serde(default)]
    style: GraphStyle,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified render and style configurations.
    pub fn new(render: RenderConfig, style: GraphStyle) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the default global style.
    pub fn style(&self) -> &GraphStyle {
        &self.style
    }
}

fn default_layout() -> String {
    "dot".to_string()
}

/// Output format and layout program selection.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Output format; inferred from the output path when unset.
    #[serde(default)]
    format: Option<OutputFormat>,

    /// Graphviz layout program (`dot`, `neato`, `fdp`, ...).
    #[serde(default = "default_layout")]
    layout: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: None,
            layout: default_layout(),
        }
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`].
    pub fn new(format: Option<OutputFormat>, layout: impl Into<String>) -> Self {
        Self {
            format,
            layout: layout.into(),
        }
    }

    /// Explicitly configured output format.
    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    /// Graphviz layout program name.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Format to use for `output`: the configured one, else the one implied
    /// by the file extension, else PNG.
    pub fn format_for(&self, output: &Path) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_path(output))
            .unwrap_or_default()
    }
}

/// Supported output file formats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Raster PNG (default)
    #[default]
    Png,
    /// Scalable vector graphics
    Svg,
    /// Portable document format
    Pdf,
    /// JPEG raster
    Jpg,
    /// Graphviz source, written without running a layout
    Dot,
}

impl OutputFormat {
    /// Infers the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Jpg => "jpg",
            Self::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err("Unsupported output format"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Directory-relative config file checked before the per-user one.
const LOCAL_CONFIG: &str = "archdraw/config.toml";

/// Config files `load_config` considers when no path is given, most specific
/// first: the working-directory file, then the per-user config directory.
fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("com", "archdraw", "archdraw") {
        Some(dirs) => candidates.push(dirs.config_dir().join("config.toml")),
        None => debug!("No per-user config directory on this platform"),
    }
    candidates
}

/// Loads the rendering configuration.
///
/// An explicit path must exist. Without one, the first existing file from
/// `archdraw/config.toml` and the per-user config directory is used, and
/// [`AppConfig::default`] when neither exists.
///
/// # Errors
///
/// [`ConfigError::MissingFile`] for a missing explicit path,
/// [`ConfigError::Parse`] for malformed TOML, and an I/O error when a file
/// exists but cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ArchdrawError> {
    let path = match explicit_path {
        Some(path) => path.as_ref().to_path_buf(),
        None => {
            let found = config_candidates().into_iter().find(|candidate| {
                let exists = candidate.is_file();
                debug!(path = candidate.display().to_string(), exists; "Checked config candidate");
                exists
            });
            let Some(found) = found else {
                debug!("No config file found, rendering with defaults");
                return Ok(AppConfig::default());
            };
            found
        }
    };

    let config = read_config(&path)?;
    info!(path = path.display().to_string(); "Configuration loaded");
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig, ArchdrawError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()).into())
}
