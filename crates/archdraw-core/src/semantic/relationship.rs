//! Directed relationships between elements.

use std::fmt;

use crate::{
    identifier::{ElementId, RelationshipId},
    style::Attributes,
};

/// Default attributes of every relationship.
const RELATIONSHIP_DEFAULTS: &[(&str, &str)] = &[
    ("style", "dashed"),
    ("color", "gray60"),
    ("fontcolor", "gray30"),
];

/// A directed, labeled edge from `source` to `target`.
///
/// There is no implicit reverse edge, and parallel relationships between the
/// same pair are distinct records.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    id: RelationshipId,
    source: ElementId,
    target: ElementId,
    label: String,
    style: Attributes,
}

impl Relationship {
    /// Create a new Relationship.
    pub fn new(
        id: RelationshipId,
        source: ElementId,
        target: ElementId,
        label: String,
        style: Attributes,
    ) -> Self {
        Self {
            id,
            source,
            target,
            label,
            style,
        }
    }

    /// Get the relationship handle.
    pub fn id(&self) -> RelationshipId {
        self.id
    }

    /// Get the source element handle.
    pub fn source(&self) -> ElementId {
        self.source
    }

    /// Get the target element handle.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Edge label, may be empty.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Caller-supplied style overrides.
    pub fn style(&self) -> &Attributes {
        &self.style
    }

    /// Relationship defaults with the relationship's own overrides applied on top.
    pub fn effective_style(&self) -> Attributes {
        let defaults = Attributes::from_defaults(RELATIONSHIP_DEFAULTS);
        Attributes::layered([&defaults, &self.style])
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
