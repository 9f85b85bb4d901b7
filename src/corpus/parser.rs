//! Element tree for wrapped corpus files
//!
//! The tree keeps only what field extraction needs: element names, the order
//! of child nodes and text content. Comments, processing instructions and
//! attributes are dropped while parsing.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::document::ParsedDocument;
use crate::config::TagNames;
use crate::error::TrecdexError;
use crate::Result;

/// Index of a node inside an [`ElementTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node of the parsed tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element { name: String, children: Vec<NodeId> },
    Text(String),
}

/// Arena-backed element tree with a single root element
#[derive(Clone, Debug)]
pub struct ElementTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ElementTree {
    /// Parse well-formed XML with exactly one root element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| malformed(position, e.to_string()))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let id = NodeId(nodes.len());
                    nodes.push(Node::Element {
                        name,
                        children: Vec::new(),
                    });

                    match stack.last() {
                        Some(parent) => push_child(&mut nodes, *parent, id),
                        None if root.is_none() => root = Some(id),
                        None => {
                            return Err(malformed(position, "content outside the root element"));
                        }
                    }

                    if !is_empty {
                        stack.push(id);
                    }
                }
                Event::End(ref e) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| malformed(position, "unexpected closing tag"))?;
                    let closing = e.name();
                    if let Node::Element { name, .. } = &nodes[open.0] {
                        if name.as_bytes() != closing.as_ref() {
                            return Err(malformed(
                                position,
                                format!(
                                    "expected </{}>, found </{}>",
                                    name,
                                    String::from_utf8_lossy(closing.as_ref())
                                ),
                            ));
                        }
                    }
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| malformed(position, err.to_string()))?;
                    push_text(&mut nodes, &stack, text.into_owned(), position)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).to_string();
                    push_text(&mut nodes, &stack, text, position)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            let name = match &nodes[open.0] {
                Node::Element { name, .. } => name.clone(),
                Node::Text(_) => String::new(),
            };
            return Err(malformed(
                reader.buffer_position() as u64,
                format!("unclosed element <{}>", name),
            ));
        }

        let root = root.ok_or_else(|| malformed(0, "no root element"))?;
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Element name, or `None` for text nodes
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Element { name, .. } => Some(name),
            Node::Text(_) => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Element { children, .. } => children,
            Node::Text(_) => &[],
        }
    }

    /// All descendant elements named `name`, in document order, excluding `id` itself
    pub fn descendants_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

        while let Some(next) = pending.pop() {
            if let Node::Element { name: tag, children } = self.node(next) {
                if tag == name {
                    found.push(next);
                }
                pending.extend(children.iter().rev().copied());
            }
        }

        found
    }

    /// Text of the first child node, when that child is text
    pub fn first_text(&self, id: NodeId) -> Option<&str> {
        match self.children(id).first().map(|child| self.node(*child)) {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Space-terminated concatenation of every matching descendant's first text
    pub fn extract_field(&self, id: NodeId, tag: &str) -> String {
        let mut value = String::new();
        for element in self.descendants_named(id, tag) {
            value.push_str(self.first_text(element).unwrap_or(""));
            value.push(' ');
        }
        value
    }
}

fn push_child(nodes: &mut [Node], parent: NodeId, child: NodeId) {
    if let Node::Element { children, .. } = &mut nodes[parent.0] {
        children.push(child);
    }
}

fn push_text(nodes: &mut Vec<Node>, stack: &[NodeId], text: String, position: u64) -> Result<()> {
    match stack.last() {
        Some(parent) => {
            let id = NodeId(nodes.len());
            nodes.push(Node::Text(text));
            push_child(nodes, *parent, id);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed(position, "content outside the root element")),
    }
}

fn malformed(position: u64, message: impl Into<String>) -> TrecdexError {
    TrecdexError::MalformedCorpusXml {
        path: None,
        position,
        message: message.into(),
    }
}

/// Parse wrapped corpus text into one document per `DOC` element
pub fn parse_documents(xml: &str, tags: &TagNames) -> Result<Vec<ParsedDocument>> {
    let tree = ElementTree::parse(xml)?;

    let documents = tree
        .descendants_named(tree.root(), &tags.doc)
        .into_iter()
        .map(|doc| ParsedDocument {
            docno: tree.extract_field(doc, &tags.docno),
            head: tree.extract_field(doc, &tags.head),
            byline: tree.extract_field(doc, &tags.byline),
            dateline: tree.extract_field(doc, &tags.dateline),
            text: tree.extract_field(doc, &tags.text),
        })
        .collect();

    Ok(documents)
}
