//! Style attributes and global style configuration.
//!
//! Style values are opaque strings handed to the render backend. Keys that are
//! not in [`RECOGNIZED_KEYS`] are passed through unchanged; no key or value is
//! validated here.
//!
//! # Overview
//!
//! - [`Attributes`]: Ordered string-to-string map attached to elements,
//!   boundaries, relationships and the diagram itself.
//! - [`GraphStyle`]: Global style configuration split into graph, node and
//!   edge attribute sets.
//! - [`StyleKey`]: A recognized global style key with its documented default.
//!
//! # Example
//!
//! ```
//! use archdraw_core::style::{GraphStyle, keys};
//!
//! let style = GraphStyle::new()
//!     .with_splines("ortho")
//!     .with_rank_separation("0.4")
//!     .with_graph_attr("bgcolor", "transparent");
//!
//! let resolved = style.resolved();
//! assert_eq!(resolved.graph().get(keys::SPLINES), Some("ortho"));
//! assert_eq!(resolved.graph().get(keys::NODE_SEPARATION), Some("0.60"));
//! assert_eq!(resolved.graph().get("bgcolor"), Some("transparent"));
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Names of the recognized global style keys.
pub mod keys {
    /// Edge routing mode.
    pub const SPLINES: &str = "splines";
    /// Base font size.
    pub const FONT_SIZE: &str = "fontsize";
    /// Title font size.
    pub const TITLE_FONT_SIZE: &str = "labelfontsize";
    /// Title font face, used to select weight (e.g. `bold`).
    pub const TITLE_FONT_NAME: &str = "labelfontname";
    /// Title justification (`l`, `c` or `r`).
    pub const TITLE_JUSTIFICATION: &str = "labeljust";
    /// Outer padding around the drawing.
    pub const PAD: &str = "pad";
    /// Spacing between nodes in the same rank.
    pub const NODE_SEPARATION: &str = "nodesep";
    /// Spacing between ranks.
    pub const RANK_SEPARATION: &str = "ranksep";
    /// Per-node width hint.
    pub const NODE_WIDTH: &str = "width";
    /// Per-node height hint.
    pub const NODE_HEIGHT: &str = "height";
}

/// Ordered map of style attributes.
///
/// Insertion order is preserved so serialized output is stable. Setting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every attribute of `other` into `self`, overriding existing keys.
    pub fn extend_from(&mut self, other: &Attributes) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Builds an attribute map from static defaults.
    pub fn from_defaults(defaults: &[(&str, &str)]) -> Self {
        defaults.iter().copied().collect()
    }

    /// Layers attribute maps; later layers win.
    ///
    /// Keys keep the position of their first appearance.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a Attributes>) -> Self {
        let mut merged = Self::new();
        for layer in layers {
            merged.extend_from(layer);
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Attributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Which attribute set of a [`GraphStyle`] a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleScope {
    /// Graph-wide attributes.
    Graph,
    /// Defaults applied to every node.
    Node,
    /// Defaults applied to every edge.
    Edge,
}

/// A recognized global style key and its documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleKey {
    scope: StyleScope,
    name: &'static str,
    default: &'static str,
}

impl StyleKey {
    const fn new(scope: StyleScope, name: &'static str, default: &'static str) -> Self {
        Self {
            scope,
            name,
            default,
        }
    }

    /// Attribute set this key lives in.
    pub fn scope(&self) -> StyleScope {
        self.scope
    }

    /// Attribute name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value used when the key is not configured.
    pub fn default_value(&self) -> &'static str {
        self.default
    }
}

/// Global style keys with their defaults.
pub const RECOGNIZED_KEYS: &[StyleKey] = &[
    StyleKey::new(StyleScope::Graph, keys::SPLINES, "ortho"),
    StyleKey::new(StyleScope::Graph, keys::FONT_SIZE, "15"),
    StyleKey::new(StyleScope::Graph, keys::TITLE_FONT_SIZE, "15"),
    StyleKey::new(StyleScope::Graph, keys::TITLE_FONT_NAME, "Sans-Serif"),
    StyleKey::new(StyleScope::Graph, keys::TITLE_JUSTIFICATION, "c"),
    StyleKey::new(StyleScope::Graph, keys::PAD, "2.0"),
    StyleKey::new(StyleScope::Graph, keys::NODE_SEPARATION, "0.60"),
    StyleKey::new(StyleScope::Graph, keys::RANK_SEPARATION, "0.75"),
    StyleKey::new(StyleScope::Node, keys::NODE_WIDTH, "1.4"),
    StyleKey::new(StyleScope::Node, keys::NODE_HEIGHT, "1.4"),
];

/// Returns the recognized key with the given scope and name, if any.
pub fn recognized_key(scope: StyleScope, name: &str) -> Option<&'static StyleKey> {
    RECOGNIZED_KEYS
        .iter()
        .find(|key| key.scope == scope && key.name == name)
}

/// Global style configuration of a diagram.
///
/// Split into the three attribute sets a graph layout backend understands.
/// Only values explicitly set are stored; [`GraphStyle::resolved`] fills in the
/// documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStyle {
    /// Graph-wide attributes.
    #[serde(default)]
    graph: Attributes,

    /// Default node attributes.
    #[serde(default)]
    node: Attributes,

    /// Default edge attributes.
    #[serde(default)]
    edge: Attributes,
}

impl GraphStyle {
    /// Creates an empty style configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph-wide attributes.
    pub fn graph(&self) -> &Attributes {
        &self.graph
    }

    /// Default node attributes.
    pub fn node(&self) -> &Attributes {
        &self.node
    }

    /// Default edge attributes.
    pub fn edge(&self) -> &Attributes {
        &self.edge
    }

    /// Returns the attribute set for `scope`.
    pub fn scope(&self, scope: StyleScope) -> &Attributes {
        match scope {
            StyleScope::Graph => &self.graph,
            StyleScope::Node => &self.node,
            StyleScope::Edge => &self.edge,
        }
    }

    fn scope_mut(&mut self, scope: StyleScope) -> &mut Attributes {
        match scope {
            StyleScope::Graph => &mut self.graph,
            StyleScope::Node => &mut self.node,
            StyleScope::Edge => &mut self.edge,
        }
    }

    /// Sets an attribute in the given scope.
    pub fn set(&mut self, scope: StyleScope, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if recognized_key(scope, &key).is_none() {
            debug!(key, scope:?; "Passing through unrecognized style key");
        }
        self.scope_mut(scope).set(key, value);
    }

    /// Returns the style with a graph attribute set.
    pub fn with_graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(StyleScope::Graph, key, value);
        self
    }

    /// Returns the style with a node attribute set.
    pub fn with_node_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(StyleScope::Node, key, value);
        self
    }

    /// Returns the style with an edge attribute set.
    pub fn with_edge_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(StyleScope::Edge, key, value);
        self
    }

    /// Sets the edge routing mode (`splines`).
    pub fn with_splines(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::SPLINES, value)
    }

    /// Sets the base font size.
    pub fn with_font_size(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::FONT_SIZE, value)
    }

    /// Sets the title font size.
    pub fn with_title_font_size(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::TITLE_FONT_SIZE, value)
    }

    /// Sets the title font face.
    pub fn with_title_font_name(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::TITLE_FONT_NAME, value)
    }

    /// Sets the title justification.
    pub fn with_title_justification(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::TITLE_JUSTIFICATION, value)
    }

    /// Sets the outer padding.
    pub fn with_pad(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::PAD, value)
    }

    /// Sets the inter-node spacing.
    pub fn with_node_separation(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::NODE_SEPARATION, value)
    }

    /// Sets the inter-rank spacing.
    pub fn with_rank_separation(self, value: impl Into<String>) -> Self {
        self.with_graph_attr(keys::RANK_SEPARATION, value)
    }

    /// Sets the per-node width hint.
    pub fn with_node_width(self, value: impl Into<String>) -> Self {
        self.with_node_attr(keys::NODE_WIDTH, value)
    }

    /// Sets the per-node height hint.
    pub fn with_node_height(self, value: impl Into<String>) -> Self {
        self.with_node_attr(keys::NODE_HEIGHT, value)
    }

    /// Returns a copy of `self` with every attribute of `overrides` applied on top.
    pub fn merged_with(&self, overrides: &GraphStyle) -> GraphStyle {
        GraphStyle {
            graph: Attributes::layered([&self.graph, &overrides.graph]),
            node: Attributes::layered([&self.node, &overrides.node]),
            edge: Attributes::layered([&self.edge, &overrides.edge]),
        }
    }

    /// Returns the style with defaults filled in for every recognized key
    /// that was not set explicitly.
    pub fn resolved(&self) -> GraphStyle {
        let mut resolved = self.clone();
        for key in RECOGNIZED_KEYS {
            let attrs = resolved.scope_mut(key.scope);
            if !attrs.contains(key.name) {
                attrs.set(key.name, key.default);
            }
        }
        resolved
    }
}
