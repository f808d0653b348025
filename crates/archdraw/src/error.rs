//! Error types for archdraw operations.
//!
//! This module provides the main error type [`ArchdrawError`] which wraps the
//! error conditions of a diagram build:
//!
//! - [`ScopeError`] - lifecycle misuse, detected at the offending call
//! - [`ReferenceError`] - a handle that does not belong to the active context
//! - [`render::Error`] - backend failure, detected at close
//! - [`ConfigError`] - configuration loading failure

use std::{io, path::PathBuf};

use thiserror::Error;

use archdraw_core::identifier::{BoundaryId, ContextId, ElementId};

use crate::render;

/// The main error type for archdraw operations.
#[derive(Debug, Error)]
pub enum ArchdrawError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Render(#[from] render::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ArchdrawError {
    /// Returns `true` for [`ArchdrawError::Scope`].
    pub fn is_scope(&self) -> bool {
        matches!(self, Self::Scope(_))
    }

    /// Returns `true` for [`ArchdrawError::Reference`].
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns `true` for [`ArchdrawError::Render`].
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

/// Misuse of the diagram or boundary lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("a diagram context is already active")]
    ContextActive,

    #[error("cannot pop a boundary: no boundary is open")]
    EmptyBoundaryStack,

    #[error("cannot pop boundary {boundary}: it is closed by its guard")]
    GuardedBoundary { boundary: BoundaryId },

    #[error("cannot close diagram `{title}`: {open} boundary(ies) still open")]
    UnclosedBoundaries { title: String, open: usize },
}

/// A handle that was not produced by the context it is used with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("element {element} of {owner} is not registered in {context}")]
    UnknownElement {
        element: ElementId,
        owner: ContextId,
        context: ContextId,
    },

    #[error("boundary {boundary} of {owner} is not registered in {context}")]
    UnknownBoundary {
        boundary: BoundaryId,
        owner: ContextId,
        context: ContextId,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}
