//! Parser for the main document part: raw `word/document.xml` bytes in, a
//! normalized [`TableGrid`] out.
//!
//! OOXML serializes cardinality-1 lists as single elements, so every fan-out
//! point (body→tables, table→rows, row→cells, cell→paragraphs, paragraph→runs)
//! is normalized the same way: collect matching children into a `Vec`. That
//! one rule replaces ad hoc single-vs-list checks everywhere.

use crate::error::Error;
use crate::model::{Cell, Row, Table, TableGrid};

pub(crate) const WML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const WPD_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

/// The uniform fan-out normalization: all WML children with this tag name,
/// in document order, whether the document holds one or many.
fn wml_all<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Vec<roxmltree::Node<'a, 'a>> {
    node.children()
        .filter(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
        .collect()
}

/// Parse a WML attribute that holds a dxa count. Empty and non-numeric
/// values are treated the same as an absent attribute: unknown, never 0.
fn dxa_attr(node: roxmltree::Node, attr: &str) -> Option<u32> {
    node.attribute((WML_NS, attr))
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&v| v > 0)
}

fn row_height_dxa(tr: roxmltree::Node) -> Option<u32> {
    wml(tr, "trPr")
        .and_then(|pr| wml(pr, "trHeight"))
        .and_then(|h| dxa_attr(h, "val"))
}

fn cell_width_dxa(tc: roxmltree::Node, col_widths: &[Option<u32>], col: usize) -> Option<u32> {
    wml(tc, "tcPr")
        .and_then(|pr| wml(pr, "tcW"))
        .and_then(|w| dxa_attr(w, "w"))
        .or_else(|| col_widths.get(col).copied().flatten())
}

/// Concatenate every run's text inside every paragraph of the cell, in
/// document order, with no separators. Run boundaries are deliberately
/// discarded so a token split across runs still matches.
fn cell_text(tc: roxmltree::Node) -> String {
    let mut text = String::new();
    for p in wml_all(tc, "p") {
        for r in wml_all(p, "r") {
            for t in wml_all(r, "t") {
                if let Some(s) = t.text() {
                    text.push_str(s);
                }
            }
        }
    }
    text
}

fn parse_table(tbl: roxmltree::Node) -> Table {
    // Per-column widths from w:tblGrid, the fallback when a cell has no tcW.
    let col_widths: Vec<Option<u32>> = wml(tbl, "tblGrid")
        .map(|grid| {
            wml_all(grid, "gridCol")
                .iter()
                .map(|n| dxa_attr(*n, "w"))
                .collect()
        })
        .unwrap_or_default();

    let rows = wml_all(tbl, "tr")
        .iter()
        .map(|tr| {
            let height_dxa = row_height_dxa(*tr);
            let cells = wml_all(*tr, "tc")
                .iter()
                .enumerate()
                .map(|(ci, tc)| Cell {
                    width_dxa: cell_width_dxa(*tc, &col_widths, ci),
                    text: cell_text(*tc),
                })
                .collect();
            Row { height_dxa, cells }
        })
        .collect();

    Table { rows }
}

/// Parse the main document part into the grid model.
///
/// The only fatal condition is a missing `w:body` — a template with zero
/// tables, or cells without dimensions, parses fine and degrades to an empty
/// grid / unknown sizes, which are policy decisions left to the caller.
pub fn parse(xml: &[u8]) -> Result<TableGrid, Error> {
    let text = std::str::from_utf8(xml)
        .map_err(|_| Error::MalformedDocument("word/document.xml is not valid UTF-8"))?;
    let doc = roxmltree::Document::parse(text).map_err(|source| Error::Xml {
        part: "word/document.xml",
        source,
    })?;

    let body = wml(doc.root_element(), "body")
        .ok_or(Error::MalformedDocument("missing w:body in word/document.xml"))?;

    let tables = wml_all(body, "tbl").iter().map(|t| parse_table(*t)).collect();

    Ok(TableGrid { tables })
}
