//! Handle types identifying diagram parts.
//!
//! Every handle records the [`ContextId`] of the build session that produced
//! it together with a dense index into that session's storage. Context ids are
//! allocated from a process-wide monotonic counter, so a handle minted by one
//! context is never mistaken for a handle of another, even after the first
//! context has been closed.
//!
//! # Examples
//!
//! ```
//! use archdraw_core::identifier::{ContextId, ElementId};
//!
//! let ctx = ContextId::next();
//! let id = ElementId::new(ctx, 3);
//!
//! assert_eq!(id.context(), ctx);
//! assert_eq!(id.index(), 3);
//! assert_eq!(id.to_string(), "e3");
//! ```

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Source of fresh context identities.
static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);

/// Identity of one diagram build session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocates a context id that has never been handed out before in this process.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}

/// Defines a context-scoped handle type.
///
/// The generated type is `Copy`, hashable and displays as `<prefix><index>`,
/// which is also the identifier used for the part in serialized graphs.
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            context: ContextId,
            index: usize,
        }

        impl $name {
            /// Creates a handle for slot `index` of the given context.
            pub fn new(context: ContextId, index: usize) -> Self {
                Self { context, index }
            }

            /// Returns the context that produced this handle.
            pub fn context(self) -> ContextId {
                self.context
            }

            /// Returns the dense index of this handle within its context.
            pub fn index(self) -> usize {
                self.index
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.index)
            }
        }
    };
}

define_handle!(
    /// Handle to an [`Element`](crate::semantic::Element).
    ElementId,
    "e"
);

define_handle!(
    /// Handle to a [`Boundary`](crate::semantic::Boundary).
    BoundaryId,
    "b"
);

define_handle!(
    /// Handle to a [`Relationship`](crate::semantic::Relationship).
    RelationshipId,
    "r"
);
