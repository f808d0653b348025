//! Archdraw Core Types and Definitions
//!
//! This crate provides the foundational types for archdraw architecture
//! diagrams. It includes:
//!
//! - **Identifiers**: Context-scoped handles for elements, boundaries and
//!   relationships ([`identifier`] module)
//! - **Style**: Ordered attribute maps and the recognized global style keys
//!   ([`style`] module)
//! - **Semantic**: The finalized diagram model handed to render backends
//!   ([`semantic`] module)

pub mod identifier;
pub mod semantic;
pub mod style;
