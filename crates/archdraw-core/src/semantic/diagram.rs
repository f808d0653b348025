//! Root diagram aggregate.

use std::{
    fmt::{self, Display},
    iter,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    identifier::{BoundaryId, ContextId, ElementId},
    semantic::{Boundary, Element, Member, Relationship},
    style::GraphStyle,
};

/// Layout direction requested from the render backend.
///
/// The names match external configuration strings (snake_case); the
/// Graphviz spellings (`TB`, `LR`, ...) are accepted as well.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ranks flow downward (default)
    #[default]
    TopToBottom,
    /// Ranks flow upward
    BottomToTop,
    /// Ranks flow rightward
    LeftToRight,
    /// Ranks flow leftward
    RightToLeft,
}

impl Direction {
    /// Graphviz `rankdir` value.
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_to_bottom" | "TB" => Ok(Self::TopToBottom),
            "bottom_to_top" | "BT" => Ok(Self::BottomToTop),
            "left_to_right" | "LR" => Ok(Self::LeftToRight),
            "right_to_left" | "RL" => Ok(Self::RightToLeft),
            _ => Err("Unsupported layout direction"),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TopToBottom => "top_to_bottom",
            Self::BottomToTop => "bottom_to_top",
            Self::LeftToRight => "left_to_right",
            Self::RightToLeft => "right_to_left",
        };
        write!(f, "{s}")
    }
}

/// A finalized architecture diagram.
///
/// Produced once per build session and handed to a render backend. Elements
/// and boundaries are stored densely by handle index; `roots` lists the
/// top-level members of the containment forest in creation order, and
/// `relationships` is the flat edge list in declaration order.
///
/// All handles stored in a diagram belong to the context returned by
/// [`Diagram::context`].
#[derive(Debug, Clone)]
pub struct Diagram {
    context: ContextId,
    title: String,
    direction: Direction,
    style: GraphStyle,
    elements: Vec<Element>,
    boundaries: Vec<Boundary>,
    roots: Vec<Member>,
    relationships: Vec<Relationship>,
}

impl Diagram {
    /// Create a new Diagram from its finalized parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: ContextId,
        title: String,
        direction: Direction,
        style: GraphStyle,
        elements: Vec<Element>,
        boundaries: Vec<Boundary>,
        roots: Vec<Member>,
        relationships: Vec<Relationship>,
    ) -> Self {
        Self {
            context,
            title,
            direction,
            style,
            elements,
            boundaries,
            roots,
            relationships,
        }
    }

    /// Context the diagram was built in.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested layout direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Global style configuration as supplied at open time.
    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    /// All elements, indexed by handle.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All boundaries, indexed by handle.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Top-level members of the containment forest.
    pub fn roots(&self) -> &[Member] {
        &self.roots
    }

    /// All relationships in declaration order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Returns `true` when the diagram has no elements, boundaries or relationships.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.boundaries.is_empty() && self.relationships.is_empty()
    }

    /// Looks up an element; `None` for handles of other contexts.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        if id.context() != self.context {
            return None;
        }
        self.elements.get(id.index())
    }

    /// Looks up a boundary; `None` for handles of other contexts.
    pub fn boundary(&self, id: BoundaryId) -> Option<&Boundary> {
        if id.context() != self.context {
            return None;
        }
        self.boundaries.get(id.index())
    }

    /// Top-level elements, i.e. elements not inside any boundary.
    pub fn top_level_elements(&self) -> impl Iterator<Item = &Element> {
        self.roots.iter().filter_map(|member| match member {
            Member::Element(id) => self.element(*id),
            Member::Boundary(_) => None,
        })
    }

    /// Top-level boundaries.
    pub fn top_level_boundaries(&self) -> impl Iterator<Item = &Boundary> {
        self.roots.iter().filter_map(|member| match member {
            Member::Boundary(id) => self.boundary(*id),
            Member::Element(_) => None,
        })
    }

    /// Iterates over the enclosing boundaries of `id`, innermost first.
    ///
    /// Yields nothing for top-level boundaries and for unknown handles.
    pub fn ancestors(&self, id: BoundaryId) -> impl Iterator<Item = &Boundary> {
        let mut next = self.boundary(id).and_then(Boundary::parent);
        iter::from_fn(move || {
            let current = self.boundary(next?)?;
            next = current.parent();
            Some(current)
        })
    }

    /// Number of boundaries enclosing `id`.
    pub fn depth(&self, id: BoundaryId) -> usize {
        self.ancestors(id).count()
    }
}
