//! Graphviz render backend.
//!
//! Serializes a [`Diagram`] into a DOT digraph and runs the configured
//! Graphviz layout program on it. Boundaries become `cluster_*` subgraphs so
//! Graphviz draws them as enclosing boxes.
//!
//! ```standalone_crate
//! use archdraw::{
//!     DiagramContext,
//!     render::graphviz::GraphvizBackend,
//!     semantic::{Direction, ElementKind},
//!     style::{Attributes, GraphStyle},
//! };
//!
//! let mut ctx = DiagramContext::open("Two nodes", Direction::LeftToRight, GraphStyle::default())?;
//! let a = ctx.create_element(ElementKind::Server, "a", "", Attributes::new());
//! let b = ctx.create_element(ElementKind::Database, "b", "", Attributes::new());
//! ctx.connect(a, b, "reads", Attributes::new())?;
//! let diagram = ctx.finish()?;
//!
//! let dot = GraphvizBackend::default().to_dot(&diagram);
//! assert!(dot.contains("rankdir=LR"));
//! assert!(dot.contains("e0"));
//! # Ok::<(), archdraw::ArchdrawError>(())
//! ```

mod label;

use std::path::Path;

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec_dot,
    printer::PrinterContext,
};
use log::{debug, info, trace};

use archdraw_core::{
    identifier::{BoundaryId, ElementId},
    semantic::{Diagram, Member},
    style::{Attributes, GraphStyle, keys},
};

use super::{Error, RenderBackend, write_atomically};
use crate::config::{AppConfig, OutputFormat, RenderConfig};

/// Backend that renders through the Graphviz command line tools.
#[derive(Debug, Clone, Default)]
pub struct GraphvizBackend {
    render: RenderConfig,
    defaults: GraphStyle,
}

impl GraphvizBackend {
    /// Creates a backend from the loaded application configuration.
    ///
    /// The configured style sits between the built-in defaults and each
    /// diagram's own style.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            render: config.render().clone(),
            defaults: config.style().clone(),
        }
    }

    /// Render configuration in use.
    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// Builds the DOT graph for `diagram`.
    pub fn to_graph(&self, diagram: &Diagram) -> Graph {
        let style = self.defaults.merged_with(diagram.style()).resolved();

        let mut stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(graph_attributes(
            diagram, &style,
        )))];
        // A bare `node` or `edge` statement is a DOT syntax error
        if !style.node().is_empty() {
            stmts.push(Stmt::GAttribute(GraphAttributes::Node(attributes(style.node()))));
        }
        if !style.edge().is_empty() {
            stmts.push(Stmt::GAttribute(GraphAttributes::Edge(attributes(style.edge()))));
        }

        for member in diagram.roots() {
            stmts.push(member_stmt(diagram, *member));
        }

        for relationship in diagram.relationships() {
            let mut attrs = Vec::new();
            if let Some(html) = label::relationship(relationship.label()) {
                attrs.push(attr("label", Id::Html(html)));
            }
            attrs.extend(attributes(&relationship.effective_style()));

            stmts.push(Stmt::Edge(Edge {
                ty: EdgeTy::Pair(
                    Vertex::N(element_node_id(relationship.source())),
                    Vertex::N(element_node_id(relationship.target())),
                ),
                attributes: attrs,
            }));
        }

        Graph::DiGraph {
            id: value_id(diagram.title()),
            strict: false,
            stmts,
        }
    }

    /// Serializes `diagram` to DOT source.
    pub fn to_dot(&self, diagram: &Diagram) -> String {
        let graph = self.to_graph(diagram);
        graphviz_rust::print(graph, &mut PrinterContext::default())
    }
}

impl RenderBackend for GraphvizBackend {
    fn render(&self, diagram: &Diagram, output: &Path) -> Result<(), Error> {
        let format = self.render.format_for(output);
        let dot = self.to_dot(diagram);
        trace!(dot; "Serialized diagram");

        let bytes = match graphviz_format(format) {
            None => {
                debug!("Writing DOT source without running Graphviz");
                dot.into_bytes()
            }
            Some(graphviz_format) => {
                info!(layout = self.render.layout(), format:% = format; "Running Graphviz");
                let args = vec![
                    CommandArg::Format(graphviz_format),
                    CommandArg::Custom(format!("-K{}", self.render.layout())),
                ];
                let bytes = exec_dot(dot, args)
                    .map_err(|err| Error::Render(format!("graphviz failed: {err}")))?;
                if bytes.is_empty() {
                    return Err(Error::Render("graphviz produced no output".to_string()));
                }
                bytes
            }
        };

        write_atomically(output, &bytes)
    }
}

/// Graphviz `-T` format for `format`, `None` for DOT source output.
fn graphviz_format(format: OutputFormat) -> Option<Format> {
    match format {
        OutputFormat::Png => Some(Format::Png),
        OutputFormat::Svg => Some(Format::Svg),
        OutputFormat::Pdf => Some(Format::Pdf),
        OutputFormat::Jpg => Some(Format::Jpg),
        OutputFormat::Dot => None,
    }
}

fn graph_attributes(diagram: &Diagram, style: &GraphStyle) -> Vec<Attribute> {
    let graph = style.graph();
    let mut attrs = Vec::new();

    if !diagram.title().is_empty() {
        let title = label::title(
            diagram.title(),
            graph.get(keys::TITLE_FONT_SIZE),
            graph.get(keys::TITLE_FONT_NAME),
        );
        attrs.push(attr("label", Id::Html(title)));
        attrs.push(attr("labelloc", value_id("t")));
    }
    attrs.push(attr("rankdir", value_id(diagram.direction().rankdir())));

    // Title font keys are folded into the title label above
    attrs.extend(
        graph
            .iter()
            .filter(|(key, _)| *key != keys::TITLE_FONT_SIZE && *key != keys::TITLE_FONT_NAME)
            .map(|(key, value)| attr(key, value_id(value))),
    );
    attrs
}

fn member_stmt(diagram: &Diagram, member: Member) -> Stmt {
    match member {
        Member::Element(id) => element_stmt(diagram, id),
        Member::Boundary(id) => boundary_stmt(diagram, id),
    }
}

fn element_stmt(diagram: &Diagram, id: ElementId) -> Stmt {
    let mut attributes = Vec::new();
    if let Some(element) = diagram.element(id) {
        attributes.push(attr("label", Id::Html(label::element(element))));
        attributes.extend(self::attributes(&element.effective_style()));
    }

    Stmt::Node(Node {
        id: element_node_id(id),
        attributes,
    })
}

fn boundary_stmt(diagram: &Diagram, id: BoundaryId) -> Stmt {
    let mut stmts = Vec::new();
    if let Some(boundary) = diagram.boundary(id) {
        stmts.push(Stmt::Attribute(attr(
            "label",
            Id::Html(label::boundary(boundary)),
        )));
        stmts.extend(
            boundary
                .effective_style()
                .iter()
                .map(|(key, value)| Stmt::Attribute(attr(key, value_id(value)))),
        );
        stmts.extend(
            boundary
                .children()
                .iter()
                .map(|child| member_stmt(diagram, *child)),
        );
    }

    Stmt::Subgraph(Subgraph {
        id: Id::Plain(format!("cluster_{id}")),
        stmts,
    })
}

fn element_node_id(id: ElementId) -> NodeId {
    NodeId(Id::Plain(id.to_string()), None)
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(value_id(key), value)
}

fn attributes(attrs: &Attributes) -> Vec<Attribute> {
    attrs
        .iter()
        .map(|(key, value)| attr(key, value_id(value)))
        .collect()
}

/// DOT id for an arbitrary string: bare when it is a plain identifier or
/// number, quoted otherwise.
fn value_id(value: &str) -> Id {
    if is_plain(value) {
        Id::Plain(value.to_string())
    } else {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
        Id::Escaped(format!("\"{escaped}\""))
    }
}

fn is_plain(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        Some(c) if c.is_ascii_digit() || c == '.' => {
            value.parse::<f64>().is_ok() && !value.contains(['e', 'E'])
        }
        _ => false,
    }
}
