//! Tree reader abstraction over wire payloads
//!
//! Decoders never look at payload text directly. They walk a cursor that
//! exposes the pydevd message as a tree of named nodes with string
//! attributes, the same model XStream's pull reader gives the IDE side.
//!
//! ## Cursor contract
//!
//! A freshly opened reader sits on the root element (the `<xml>` envelope
//! pydevd wraps every message in). [`TreeReader::move_down`] enters the
//! next unread child and [`TreeReader::move_up`] returns to the parent, so
//! the canonical loop over children is:
//!
//! ```rust
//! use pydebug_core::reader::{TreeReader, XmlTreeReader};
//!
//! let mut reader = XmlTreeReader::parse(r#"<xml><var name="a"/><var name="b"/></xml>"#).unwrap();
//! let mut names = Vec::new();
//! while reader.has_more_children() {
//!     reader.move_down();
//!     names.push(reader.attribute("name").unwrap_or_default().to_string());
//!     reader.move_up();
//! }
//! assert_eq!(names, ["a", "b"]);
//! ```

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Streaming cursor over a message tree.
///
/// Implementations are exclusively owned by one decode call; they carry
/// mutable cursor state and are not meant to be shared.
pub trait TreeReader {
    /// Whether the current node has children that have not been visited yet.
    fn has_more_children(&self) -> bool;

    /// Enter the next unvisited child.
    ///
    /// Returns `false` (and leaves the cursor in place) when no child is left.
    fn move_down(&mut self) -> bool;

    /// Return to the parent of the current node. No-op at the root.
    fn move_up(&mut self);

    /// Tag name of the current node.
    fn node_name(&self) -> &str;

    /// Raw attribute text of the current node, before percent-decoding.
    fn attribute(&self, name: &str) -> Option<&str>;
}

#[derive(Debug)]
struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    node: usize,
    next_child: usize,
}

/// [`TreeReader`] over an XML payload, backed by `quick-xml`.
///
/// The payload is tokenized once into a small node arena; text content is
/// ignored since pydevd only transports data in attributes.
#[derive(Debug)]
pub struct XmlTreeReader {
    nodes: Vec<XmlNode>,
    path: Vec<Cursor>,
}

impl XmlTreeReader {
    /// Tokenize `text` and position the cursor on its root element.
    ///
    /// Fails with [`Error::EmptyMessage`] when the text holds no element at
    /// all and with [`Error::Xml`] when it is not well-formed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let idx = push_node(&mut nodes, &open, &start)?;
                    open.push(idx);
                }
                Event::Empty(start) => {
                    push_node(&mut nodes, &open, &start)?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&idx) = open.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", nodes[idx].name)));
        }
        if nodes.is_empty() {
            return Err(Error::EmptyMessage(text.to_string()));
        }

        Ok(Self {
            nodes,
            path: vec![Cursor {
                node: 0,
                next_child: 0,
            }],
        })
    }

    /// Nesting depth of the cursor; the root element is depth 0.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    fn current(&self) -> &XmlNode {
        &self.nodes[self.cursor().node]
    }

    fn cursor(&self) -> Cursor {
        // path always holds the root cursor
        self.path[self.path.len() - 1]
    }
}

fn push_node(nodes: &mut Vec<XmlNode>, open: &[usize], start: &BytesStart<'_>) -> Result<usize> {
    let name = utf8(start.name().as_ref())?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    let idx = nodes.len();
    match open.last() {
        Some(&parent) => nodes[parent].children.push(idx),
        None if idx > 0 => {
            return Err(Error::Xml(format!(
                "multiple root elements: <{}> after <{}>",
                name, nodes[0].name
            )))
        }
        None => {}
    }

    nodes.push(XmlNode {
        name,
        attributes,
        children: Vec::new(),
    });
    Ok(idx)
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::Xml(e.to_string()))
}

impl TreeReader for XmlTreeReader {
    fn has_more_children(&self) -> bool {
        let cursor = self.cursor();
        cursor.next_child < self.nodes[cursor.node].children.len()
    }

    fn move_down(&mut self) -> bool {
        if !self.has_more_children() {
            return false;
        }
        let last = self.path.len() - 1;
        let cursor = self.path[last];
        let child = self.nodes[cursor.node].children[cursor.next_child];
        self.path[last].next_child += 1;
        self.path.push(Cursor {
            node: child,
            next_child: 0,
        });
        true
    }

    fn move_up(&mut self) {
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    fn node_name(&self) -> &str {
        &self.current().name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.current()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
