//! Boundaries: named nested groupings.

use crate::{
    identifier::{BoundaryId, ElementId},
    style::Attributes,
};

/// Default attributes of every boundary.
const BOUNDARY_DEFAULTS: &[(&str, &str)] = &[
    ("style", "dashed"),
    ("bgcolor", "white"),
    ("margin", "16"),
    ("labeljust", "l"),
    ("fontcolor", "gray25"),
];

/// A child slot of a boundary or of the diagram root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    /// An element.
    Element(ElementId),
    /// A nested boundary.
    Boundary(BoundaryId),
}

/// A named grouping that owns an ordered list of elements and nested boundaries.
///
/// Containment is a tree: a boundary's parent is always created before it, so
/// the parent chain of any boundary is finite and acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    id: BoundaryId,
    name: String,
    style: Attributes,
    parent: Option<BoundaryId>,
    children: Vec<Member>,
}

impl Boundary {
    /// Create a new, empty Boundary.
    pub fn new(id: BoundaryId, name: String, style: Attributes, parent: Option<BoundaryId>) -> Self {
        Self {
            id,
            name,
            style,
            parent,
            children: Vec::new(),
        }
    }

    /// Get the boundary handle.
    pub fn id(&self) -> BoundaryId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Caller-supplied style overrides.
    pub fn style(&self) -> &Attributes {
        &self.style
    }

    /// Mutable access to the style overrides.
    pub fn style_mut(&mut self) -> &mut Attributes {
        &mut self.style
    }

    /// Enclosing boundary, `None` for top-level boundaries.
    pub fn parent(&self) -> Option<BoundaryId> {
        self.parent
    }

    /// Children in creation order.
    pub fn children(&self) -> &[Member] {
        &self.children
    }

    /// Appends a child.
    pub fn push_child(&mut self, member: Member) {
        self.children.push(member);
    }

    /// Handles of the elements directly inside this boundary.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.children.iter().filter_map(|member| match member {
            Member::Element(id) => Some(*id),
            Member::Boundary(_) => None,
        })
    }

    /// Handles of the boundaries directly inside this boundary.
    pub fn boundaries(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.children.iter().filter_map(|member| match member {
            Member::Boundary(id) => Some(*id),
            Member::Element(_) => None,
        })
    }

    /// Boundary defaults with the boundary's own overrides applied on top.
    pub fn effective_style(&self) -> Attributes {
        let defaults = Attributes::from_defaults(BOUNDARY_DEFAULTS);
        Attributes::layered([&defaults, &self.style])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::ContextId;

    #[test]
    fn test_children_keep_creation_order() {
        let ctx = ContextId::next();
        let mut boundary = Boundary::new(
            BoundaryId::new(ctx, 0),
            "Local LLM Servers".to_string(),
            Attributes::new(),
            None,
        );

        boundary.push_child(Member::Boundary(BoundaryId::new(ctx, 1)));
        boundary.push_child(Member::Element(ElementId::new(ctx, 4)));
        boundary.push_child(Member::Boundary(BoundaryId::new(ctx, 2)));

        assert_eq!(boundary.children().len(), 3);
        assert_eq!(
            boundary.elements().collect::<Vec<_>>(),
            vec![ElementId::new(ctx, 4)]
        );
        assert_eq!(
            boundary.boundaries().collect::<Vec<_>>(),
            vec![BoundaryId::new(ctx, 1), BoundaryId::new(ctx, 2)]
        );
    }

    #[test]
    fn test_effective_style_fill_override() {
        let ctx = ContextId::next();
        let boundary = Boundary::new(
            BoundaryId::new(ctx, 0),
            "Integration Layer".to_string(),
            Attributes::from([("bgcolor", "lightgreen")]),
            None,
        );

        let style = boundary.effective_style();

        assert_eq!(style.get("bgcolor"), Some("lightgreen"));
        assert_eq!(style.get("style"), Some("dashed"));
    }
}
