//! Semantic model of a finalized architecture diagram.
//!
//! This is what a diagram build session produces when it closes and what
//! render backends consume:
//! - [`Diagram`] - Root aggregate with title, direction, global style and
//!   the containment forest
//! - [`Element`] / [`ElementKind`] - Typed nodes
//! - [`Boundary`] / [`Member`] - Nested groupings and their children
//! - [`Relationship`] - Directed, labeled edges between elements

mod boundary;
mod diagram;
mod element;
mod relationship;

pub use boundary::{Boundary, Member};
pub use diagram::{Diagram, Direction};
pub use element::{Element, ElementKind};
pub use relationship::Relationship;
