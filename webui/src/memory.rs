//! In-memory [`Document`] for driving the page behaviour without a browser.
//!
//! Markup is tokenized with `quick-xml` in lenient mode: doctypes and
//! comments are skipped, HTML void elements (`<meta>`, `<link>`, ...) take no
//! closing tag, and end tags are matched here rather than by the reader.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Markup replaced through
//! `set_inner_html` detaches the old nodes but never reclaims them, so every
//! id handed out stays valid for the life of the document.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use quick_xml::escape::{escape, partial_escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::dom::Document;

pub type NodeId = usize;

const TEXT_TAG: &str = "#text";

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unexpected end of markup inside <{0}>")]
    Unclosed(String),
    #[error("unexpected </{found}> at offset {offset}")]
    UnexpectedClose { found: String, offset: usize },
    #[error("malformed markup at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
}

impl Node {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    fn is_void(&self) -> bool {
        is_void(&self.tag)
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// A parsed document plus a record of what the behaviour did to it.
pub struct MemoryDocument {
    nodes: RefCell<Vec<Node>>,
    root: NodeId,
    handlers: RefCell<HashMap<NodeId, Rc<dyn Fn()>>>,
    class_writes: RefCell<Vec<(NodeId, String)>>,
    markup_writes: Cell<usize>,
    errors: RefCell<Vec<String>>,
}

impl MemoryDocument {
    pub fn parse(html: &str) -> Result<Self, MarkupError> {
        let mut nodes = vec![Node { tag: "#document".to_string(), ..Node::default() }];
        let children = parse_fragment(html, &mut nodes)?;
        nodes[0].children = children;
        Ok(Self {
            nodes: RefCell::new(nodes),
            root: 0,
            handlers: RefCell::new(HashMap::new()),
            class_writes: RefCell::new(Vec::new()),
            markup_writes: Cell::new(0),
            errors: RefCell::new(Vec::new()),
        })
    }

    /// Runs the click handler of the element with `id`; false when there is
    /// no such element or it has no handler.
    pub fn click(&self, id: &str) -> bool {
        let handler = match self.element_by_id(id) {
            Some(node) => self.handlers.borrow().get(&node).cloned(),
            None => None,
        };
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn has_handler(&self, id: &str) -> bool {
        self.element_by_id(id)
            .map(|node| self.handlers.borrow().contains_key(&node))
            .unwrap_or(false)
    }

    /// Number of elements that currently carry a click handler.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn class_of(&self, id: &str) -> Option<String> {
        let node = self.element_by_id(id)?;
        self.nodes.borrow()[node].attribute("class").map(str::to_string)
    }

    /// Every class value written to `node`, oldest first.
    pub fn class_history(&self, node: NodeId) -> Vec<String> {
        self.class_writes
            .borrow()
            .iter()
            .filter(|(n, _)| *n == node)
            .map(|(_, class)| class.clone())
            .collect()
    }

    /// Number of `set_inner_html` calls so far.
    pub fn markup_writes(&self) -> usize {
        self.markup_writes.get()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Text of cell `cell` for each row of the first body of table `table_id`.
    pub fn column(&self, table_id: &str, cell: usize) -> Vec<String> {
        self.element_by_id(table_id)
            .and_then(|table| self.table_body(&table))
            .map(|body| {
                self.rows(&body)
                    .iter()
                    .map(|row| self.cell_text(row, cell).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `data-{name}` of cell `cell` for each row of table `table_id`.
    pub fn column_data(&self, table_id: &str, cell: usize, name: &str) -> Vec<String> {
        self.element_by_id(table_id)
            .and_then(|table| self.table_body(&table))
            .map(|body| {
                self.rows(&body)
                    .iter()
                    .map(|row| self.cell_data(row, cell, name).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn children_tagged(&self, node: NodeId, tags: &[&str]) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        nodes[node]
            .children
            .iter()
            .copied()
            .filter(|&c| tags.contains(&nodes[c].tag.as_str()))
            .collect()
    }

    fn cell(&self, row: NodeId, cell: usize) -> Option<NodeId> {
        self.children_tagged(row, &["td", "th"]).get(cell).copied()
    }

    fn text_content(nodes: &[Node], node: NodeId, out: &mut String) {
        let n = &nodes[node];
        if n.is_text() {
            out.push_str(&n.text);
        }
        for &child in &n.children {
            Self::text_content(nodes, child, out);
        }
    }

    fn serialize(nodes: &[Node], node: NodeId, out: &mut String) {
        let n = &nodes[node];
        if n.is_text() {
            out.push_str(&partial_escape(n.text.as_str()));
            return;
        }
        out.push('<');
        out.push_str(&n.tag);
        for (name, value) in &n.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
        }
        out.push('>');
        if n.is_void() {
            return;
        }
        for &child in &n.children {
            Self::serialize(nodes, child, out);
        }
        out.push_str(&format!("</{}>", n.tag));
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if nodes[node].attribute("id") == Some(id) {
                return Some(node);
            }
            stack.extend(nodes[node].children.iter().rev());
        }
        None
    }

    fn set_class_name(&self, element: &NodeId, class_name: &str) {
        self.nodes.borrow_mut()[*element].set_attribute("class", class_name);
        self.class_writes.borrow_mut().push((*element, class_name.to_string()));
    }

    fn table_body(&self, table: &NodeId) -> Option<NodeId> {
        self.children_tagged(*table, &["tbody"]).first().copied()
    }

    fn rows(&self, body: &NodeId) -> Vec<NodeId> {
        self.children_tagged(*body, &["tr"])
    }

    fn cell_data(&self, row: &NodeId, cell: usize, name: &str) -> Option<String> {
        let cell = self.cell(*row, cell)?;
        let attribute = format!("data-{name}");
        self.nodes.borrow()[cell].attribute(&attribute).map(str::to_string)
    }

    fn cell_text(&self, row: &NodeId, cell: usize) -> Option<String> {
        let cell = self.cell(*row, cell)?;
        let mut text = String::new();
        Self::text_content(&self.nodes.borrow(), cell, &mut text);
        Some(text)
    }

    fn outer_html(&self, element: &NodeId) -> String {
        let mut out = String::new();
        Self::serialize(&self.nodes.borrow(), *element, &mut out);
        out
    }

    fn set_inner_html(&self, element: &NodeId, html: &str) {
        self.markup_writes.set(self.markup_writes.get() + 1);
        let mut nodes = self.nodes.borrow_mut();
        let children = match parse_fragment(html, &mut nodes) {
            Ok(children) => children,
            Err(err) => {
                self.errors.borrow_mut().push(err.to_string());
                Vec::new()
            }
        };
        nodes[*element].children = children;
    }

    fn on_click(&self, element: &NodeId, handler: Box<dyn Fn()>) {
        self.handlers.borrow_mut().insert(*element, Rc::from(handler));
    }

    fn report_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

fn syntax_error(reader: &Reader<&[u8]>, message: impl ToString) -> MarkupError {
    MarkupError::Syntax {
        offset: usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX),
        message: message.to_string(),
    }
}

fn decode(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, MarkupError> {
    reader
        .decoder()
        .decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| syntax_error(reader, e))
}

fn element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Node, MarkupError> {
    let tag = decode(reader, start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| syntax_error(reader, e))?;
        let name = decode(reader, attr.key.as_ref())?;
        let raw = decode(reader, &attr.value)?;
        let value = unescape(&raw).map_err(|e| syntax_error(reader, e))?.into_owned();
        attributes.push((name, value));
    }
    Ok(Node { tag, attributes, ..Node::default() })
}

/// Parses `html` into new arena nodes and returns the top-level ones.
fn parse_fragment(html: &str, nodes: &mut Vec<Node>) -> Result<Vec<NodeId>, MarkupError> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut top = Vec::new();
    // Open elements, innermost last.
    let mut open: Vec<NodeId> = Vec::new();

    let attach = |nodes: &mut Vec<Node>, open: &[NodeId], top: &mut Vec<NodeId>, node: Node| {
        nodes.push(node);
        let id = nodes.len() - 1;
        match open.last() {
            Some(&parent) => nodes[parent].children.push(id),
            None => top.push(id),
        }
        id
    };
    let push_text = |nodes: &mut Vec<Node>, open: &[NodeId], top: &mut Vec<NodeId>, text: &str| {
        let siblings = match open.last() {
            Some(&parent) => &nodes[parent].children,
            None => &*top,
        };
        // Entity references split text runs; merge them back into one node.
        if let Some(&last) = siblings.last() {
            if nodes[last].is_text() {
                nodes[last].text.push_str(text);
                return;
            }
        }
        attach(nodes, open, top, Node { tag: TEXT_TAG.to_string(), text: text.to_string(), ..Node::default() });
    };

    loop {
        let event = reader.read_event().map_err(|e| syntax_error(&reader, e))?;
        match event {
            Event::Start(start) => {
                let node = element(&reader, &start)?;
                let void = node.is_void();
                let id = attach(nodes, &open, &mut top, node);
                if !void {
                    open.push(id);
                }
            }
            Event::Empty(start) => {
                let node = element(&reader, &start)?;
                attach(nodes, &open, &mut top, node);
            }
            Event::End(end) => {
                let found = decode(&reader, end.name().as_ref())?;
                if is_void(&found) {
                    continue;
                }
                match open.last() {
                    Some(&current) if nodes[current].tag == found => {
                        open.pop();
                    }
                    _ => {
                        let offset = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
                        return Err(MarkupError::UnexpectedClose { found, offset });
                    }
                }
            }
            Event::Text(text) => {
                let text = text.decode().map_err(|e| syntax_error(&reader, e))?;
                push_text(nodes, &open, &mut top, &text);
            }
            Event::CData(data) => {
                let text = decode(&reader, &data)?;
                push_text(nodes, &open, &mut top, &text);
            }
            Event::GeneralRef(entity) => {
                let name = entity.decode().map_err(|e| syntax_error(&reader, e))?;
                let text = unescape(&format!("&{name};")).map_err(|e| syntax_error(&reader, e))?.into_owned();
                push_text(nodes, &open, &mut top, &text);
            }
            Event::Eof => break,
            Event::DocType(_) | Event::Comment(_) | Event::Decl(_) | Event::PI(_) => {}
        }
    }

    match open.last() {
        Some(&unclosed) => Err(MarkupError::Unclosed(nodes[unclosed].tag.clone())),
        None => Ok(top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_what_it_parses() {
        let html = r#"<table id="t"><tbody><tr class="depth-1"><td data-size="5">+5.1 kB</td><td>a &amp; b</td></tr></tbody></table>"#;
        let doc = MemoryDocument::parse(html).unwrap();
        let table = doc.element_by_id("t").unwrap();
        assert_eq!(doc.outer_html(&table), html);
    }

    #[test]
    fn reads_cells() {
        let doc = MemoryDocument::parse(
            r#"<table id="t"><tbody><tr><td data-size="-3">x</td><td>dir/<b>sub</b> &lt;1&gt;</td></tr></tbody></table>"#,
        )
        .unwrap();
        assert_eq!(doc.column_data("t", 0, "size"), vec!["-3"]);
        assert_eq!(doc.column("t", 1), vec!["dir/sub <1>"]);
    }

    #[test]
    fn accepts_doctype_and_void_elements() {
        let html = concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\">",
            "<link rel=\"stylesheet\" href=\"/style.css\"><br/></head>",
            "<body><div><meta charset=\"UTF-8\"><span id=\"x\">a</span></div></body></html>\n",
        );
        let doc = MemoryDocument::parse(html).unwrap();
        let span = doc.element_by_id("x").unwrap();
        assert_eq!(doc.outer_html(&span), r#"<span id="x">a</span>"#);
    }

    #[test]
    fn void_elements_serialize_without_end_tag() {
        let doc = MemoryDocument::parse(r#"<div id="d"><meta charset="UTF-8">x</div>"#).unwrap();
        let div = doc.element_by_id("d").unwrap();
        assert_eq!(doc.outer_html(&div), r#"<div id="d"><meta charset="UTF-8">x</div>"#);
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            MemoryDocument::parse("<p><b></p>"),
            Err(MarkupError::UnexpectedClose { .. })
        ));
        assert_eq!(MemoryDocument::parse("<p>").err(), Some(MarkupError::Unclosed("p".to_string())));
        assert!(matches!(
            MemoryDocument::parse("x</p>"),
            Err(MarkupError::UnexpectedClose { found, .. }) if found == "p"
        ));
    }

    #[test]
    fn replaced_markup_detaches_old_nodes() {
        let doc = MemoryDocument::parse(r#"<div id="outer"><span id="inner">x</span></div>"#).unwrap();
        let outer = doc.element_by_id("outer").unwrap();
        doc.set_inner_html(&outer, r#"<span id="fresh">y</span>"#);
        assert!(doc.element_by_id("inner").is_none());
        assert!(doc.element_by_id("fresh").is_some());
        assert_eq!(doc.markup_writes(), 1);
    }
}
