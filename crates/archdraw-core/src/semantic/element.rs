//! Diagram element types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    identifier::{BoundaryId, ElementId},
    style::Attributes,
};

/// The kind of system component an element represents.
///
/// Each kind carries a table of default style attributes, see
/// [`ElementKind::default_attributes`]. The names match external
/// configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A human actor.
    Person,
    /// A deployable application or service.
    Container,
    /// A compute host.
    Server,
    /// File or blob storage.
    Storage,
    /// A database.
    Database,
    /// A load balancer, proxy or other network device.
    NetworkGateway,
    /// Anything else.
    #[default]
    Generic,
}

const PERSON_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "box"),
    ("style", "rounded,filled"),
    ("fillcolor", "dodgerblue4"),
    ("fontcolor", "white"),
];

const CONTAINER_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "box"),
    ("style", "rounded,filled"),
    ("fillcolor", "dodgerblue3"),
    ("fontcolor", "white"),
];

const SERVER_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "box3d"),
    ("style", "filled"),
    ("fillcolor", "lightsteelblue1"),
];

const STORAGE_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "folder"),
    ("style", "filled"),
    ("fillcolor", "khaki1"),
];

const DATABASE_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "cylinder"),
    ("style", "filled"),
    ("fillcolor", "dodgerblue3"),
    ("fontcolor", "white"),
    ("labelloc", "c"),
];

const NETWORK_GATEWAY_DEFAULTS: &[(&str, &str)] = &[
    ("shape", "hexagon"),
    ("style", "filled"),
    ("fillcolor", "darkseagreen2"),
];

const GENERIC_DEFAULTS: &[(&str, &str)] = &[("shape", "box"), ("style", "rounded")];

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [ElementKind; 7] = [
        Self::Person,
        Self::Container,
        Self::Server,
        Self::Storage,
        Self::Database,
        Self::NetworkGateway,
        Self::Generic,
    ];

    /// Default style attributes for elements of this kind.
    pub fn default_attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Person => PERSON_DEFAULTS,
            Self::Container => CONTAINER_DEFAULTS,
            Self::Server => SERVER_DEFAULTS,
            Self::Storage => STORAGE_DEFAULTS,
            Self::Database => DATABASE_DEFAULTS,
            Self::NetworkGateway => NETWORK_GATEWAY_DEFAULTS,
            Self::Generic => GENERIC_DEFAULTS,
        }
    }

    /// Human readable tag shown under an element's label, e.g. `Person`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Container => "Container",
            Self::Server => "Server",
            Self::Storage => "Storage",
            Self::Database => "Database",
            Self::NetworkGateway => "Network Gateway",
            Self::Generic => "Component",
        }
    }
}

impl FromStr for ElementKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "container" => Ok(Self::Container),
            "server" => Ok(Self::Server),
            "storage" => Ok(Self::Storage),
            "database" => Ok(Self::Database),
            "network_gateway" => Ok(Self::NetworkGateway),
            "generic" => Ok(Self::Generic),
            _ => Err("Unsupported element kind"),
        }
    }
}

impl From<ElementKind> for &'static str {
    fn from(val: ElementKind) -> Self {
        match val {
            ElementKind::Person => "person",
            ElementKind::Container => "container",
            ElementKind::Server => "server",
            ElementKind::Storage => "storage",
            ElementKind::Database => "database",
            ElementKind::NetworkGateway => "network_gateway",
            ElementKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A diagram node representing one system component.
///
/// Labels are display text only; identity is the [`ElementId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    label: String,
    detail: String,
    style: Attributes,
    parent: Option<BoundaryId>,
}

impl Element {
    /// Create a new Element owned by `parent`, or by the diagram root when `None`.
    pub fn new(
        id: ElementId,
        kind: ElementKind,
        label: String,
        detail: String,
        style: Attributes,
        parent: Option<BoundaryId>,
    ) -> Self {
        Self {
            id,
            kind,
            label,
            detail,
            style,
            parent,
        }
    }

    /// Get the element handle.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Get the element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Primary display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Secondary description, possibly spanning several lines.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Caller-supplied style overrides.
    pub fn style(&self) -> &Attributes {
        &self.style
    }

    /// Mutable access to the style overrides.
    pub fn style_mut(&mut self) -> &mut Attributes {
        &mut self.style
    }

    /// Boundary that owns this element, `None` for top-level elements.
    pub fn parent(&self) -> Option<BoundaryId> {
        self.parent
    }

    /// Kind defaults with the element's own overrides applied on top.
    pub fn effective_style(&self) -> Attributes {
        let defaults = Attributes::from_defaults(self.kind.default_attributes());
        Attributes::layered([&defaults, &self.style])
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
