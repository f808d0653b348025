//! Render backends for finalized diagrams.
//!
//! This module provides the [`RenderBackend`] trait, the seam between the
//! diagram model and whatever lays out and rasterizes it. It is the final
//! stage of a diagram build.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramContext (elements, boundaries, relationships)
//!     ↓ close / finish
//! Diagram
//!     ↓ render (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`graphviz`] - DOT serialization and Graphviz execution (feature `graphviz`)
//!
//! # Error Handling
//!
//! Render operations return [`Error`]. Backends must not leave a partially
//! written file at the output path; [`write_atomically`] provides that
//! guarantee for byte output.

#[cfg(feature = "graphviz")]
pub mod graphviz;

use std::{
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::NamedTempFile;

use archdraw_core::semantic::Diagram;

/// Abstraction for diagram render backends.
///
/// Implementors turn a finalized [`Diagram`] into a single file at `output`.
/// The layout algorithm is entirely the backend's concern.
pub trait RenderBackend {
    /// Renders `diagram` to a file at `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if layout or rasterization fails, or
    /// [`Error::Io`] if writing the output fails. On error, no file is left
    /// at `output` by this call.
    fn render(&self, diagram: &Diagram, output: &Path) -> Result<(), Error>;
}

impl<T: RenderBackend + ?Sized> RenderBackend for &T {
    fn render(&self, diagram: &Diagram, output: &Path) -> Result<(), Error> {
        (**self).render(diagram, output)
    }
}

/// Errors that can occur while rendering a diagram.
///
/// This type is converted into [`ArchdrawError::Render`] at the crate
/// boundary.
///
/// [`ArchdrawError::Render`]: crate::ArchdrawError::Render
#[derive(Debug)]
pub enum Error {
    /// A layout or rasterization failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Writes `bytes` to `output` so that the file either appears complete or not at all.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `output`. If anything fails the temporary file is removed.
///
/// # Errors
///
/// Returns [`Error::Io`] if the temporary file cannot be created, written or
/// persisted.
pub fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(output).map_err(|err| Error::Io(err.error))?;

    debug!(path = output.display().to_string(), bytes = bytes.len(); "Output file written");
    Ok(())
}
