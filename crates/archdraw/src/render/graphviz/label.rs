//! HTML-like label markup for Graphviz.
//!
//! Every function returns the full `<...>` form, ready to be used as an
//! [`Id::Html`](dot_structures::Id::Html) value.

use std::fmt::Write;

use archdraw_core::semantic::{Boundary, Element};

const TAG_POINT_SIZE: u32 = 9;
const DETAIL_POINT_SIZE: u32 = 10;
const EDGE_POINT_SIZE: u32 = 10;

/// Escapes text for use inside an HTML-like label.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes multi-line text, joining the lines with `<br/>`.
pub fn escape_lines(text: &str) -> String {
    text.lines().map(escape).collect::<Vec<_>>().join("<br/>")
}

/// Label in bold, kind tag in brackets, then the detail text line by line.
pub fn element(element: &Element) -> String {
    let mut html = format!(
        "<<b>{}</b><br/><font point-size=\"{TAG_POINT_SIZE}\">[{}]</font>",
        escape_lines(element.label()),
        escape(element.kind().tag()),
    );

    if !element.detail().trim().is_empty() {
        let _ = write!(
            html,
            "<br/><br/><font point-size=\"{DETAIL_POINT_SIZE}\">{}</font>",
            escape_lines(element.detail())
        );
    }

    html.push('>');
    html
}

pub fn boundary(boundary: &Boundary) -> String {
    format!("<<b>{}</b>>", escape_lines(boundary.name()))
}

/// Edge label, `None` when there is nothing to show.
pub fn relationship(label: &str) -> Option<String> {
    if label.is_empty() {
        return None;
    }
    Some(format!(
        "<<font point-size=\"{EDGE_POINT_SIZE}\">{}</font>>",
        escape_lines(label)
    ))
}

/// Diagram title, with optional font size and face.
pub fn title(title: &str, size: Option<&str>, face: Option<&str>) -> String {
    let mut attrs = String::new();
    if let Some(size) = size {
        let _ = write!(attrs, " point-size=\"{}\"", escape(size));
    }
    if let Some(face) = face {
        let _ = write!(attrs, " face=\"{}\"", escape(face));
    }

    if attrs.is_empty() {
        format!("<{}>", escape_lines(title))
    } else {
        format!("<<font{attrs}>{}</font>>", escape_lines(title))
    }
}
