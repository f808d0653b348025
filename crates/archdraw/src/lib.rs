//! Archdraw - A declarative builder for architecture diagrams.
//!
//! A diagram is declared in code: open a [`DiagramContext`], create elements
//! (people, containers, servers, storage, databases, network gateways),
//! group them into nested boundaries, connect them with labeled
//! relationships, then close the context to hand the finalized
//! [`semantic::Diagram`] to a [`render::RenderBackend`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use archdraw::{
//!     DiagramContext,
//!     config::load_config,
//!     render::graphviz::GraphvizBackend,
//!     semantic::{Direction, ElementKind},
//!     style::{Attributes, GraphStyle},
//! };
//!
//! let config = load_config(None::<&str>)?;
//! let backend = GraphvizBackend::new(&config);
//!
//! let mut ctx = DiagramContext::open("Web", Direction::LeftToRight, GraphStyle::default())?;
//! let user = ctx.create_element(ElementKind::Person, "User", "", Attributes::new());
//! let web = {
//!     let mut cloud = ctx.push_boundary("Cloud", Attributes::new());
//!     cloud.create_element(ElementKind::Container, "Web App", "Serves pages", Attributes::new())
//! };
//! ctx.connect(user, web, "HTTPS", Attributes::new())?;
//!
//! ctx.close(&backend, "web.png")?;
//! # Ok::<(), archdraw::ArchdrawError>(())
//! ```

pub mod config;
pub mod render;

mod context;
mod error;

pub use archdraw_core::{identifier, semantic, style};

pub use context::{BoundaryGuard, Chain, DiagramContext};
pub use error::{ArchdrawError, ConfigError, ReferenceError, ScopeError};
