//! XML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names, namespace URIs and character data
//! - Namespace URIs resolved once, while building

use memchr::memchr;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::namespace::NamespaceResolver;
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode, DOCUMENT_NODE};
use super::strings::StringPool;
use super::DocumentAccess;
use crate::error::ParseError;

/// A parsed XML document stored in arena format.
///
/// The document is immutable once built; every accessor takes `&self`, so a
/// single instance can be shared freely between threads.
#[derive(Debug)]
pub struct XmlDocument {
    /// Original input, kept for pass-through serialization
    source: String,
    /// Arena of nodes; slot 0 is the document node
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl XmlDocument {
    /// Parse an XML document.
    ///
    /// Input without any element (empty or whitespace-only) yields a document
    /// without a root element rather than an error; lookups against it report
    /// the document as malformed.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut doc = XmlDocument {
            source: input.to_owned(),
            nodes: Vec::with_capacity(64),
            attributes: Vec::with_capacity(16),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(XmlNode::document());

        Builder::new(&mut doc).run(input)?;

        debug!(
            nodes = doc.nodes.len(),
            attributes = doc.attributes.len(),
            has_root = doc.root_element.is_some(),
            "parsed XML document"
        );
        Ok(doc)
    }

    /// Get the document root node (index 0)
    pub fn document_node(&self) -> &XmlNode {
        &self.nodes[DOCUMENT_NODE as usize]
    }

    /// Get the root element (first element child of document)
    pub fn root_element(&self) -> Option<&XmlNode> {
        self.root_element.and_then(|id| self.nodes.get(id as usize))
    }

    /// Get root element name
    pub fn root_name(&self) -> Option<&str> {
        self.root_element.and_then(|id| self.node_name(id))
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    fn push_node(&mut self, node: XmlNode) -> NodeId {
        let parent_id = node.parent.unwrap_or(DOCUMENT_NODE);
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent_id, node_id);
        node_id
    }
}

impl DocumentAccess for XmlDocument {
    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        self.get_node(id)
            .and_then(|node| {
                let start = node.attr_start as usize;
                self.attributes.get(start..start + node.attr_count as usize)
            })
            .unwrap_or(&[])
    }

    fn strings(&self) -> &StringPool {
        &self.strings
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builds the arena from `quick-xml` pull events.
struct Builder<'d> {
    doc: &'d mut XmlDocument,
    /// Open elements; starts with the document node
    stack: Vec<NodeId>,
    /// Qualified names of open elements, for error reporting
    tag_stack: Vec<String>,
    resolver: NamespaceResolver,
    /// Character data collected since the last markup event; entity
    /// references arrive as separate events and are folded in here
    pending_text: String,
}

impl<'d> Builder<'d> {
    fn new(doc: &'d mut XmlDocument) -> Self {
        let resolver = NamespaceResolver::new(&mut doc.strings);
        Builder {
            doc,
            stack: vec![DOCUMENT_NODE],
            tag_stack: Vec::new(),
            resolver,
            pending_text: String::new(),
        }
    }

    fn run(mut self, input: &str) -> Result<(), ParseError> {
        let mut reader = Reader::from_str(input);

        loop {
            let event = reader.read_event().map_err(|source| ParseError::Syntax {
                position: reader.buffer_position() as u64,
                source,
            })?;

            match event {
                Event::Start(elem) => {
                    self.flush_text()?;
                    self.handle_element(&elem, false)?;
                }
                Event::Empty(elem) => {
                    self.flush_text()?;
                    self.handle_element(&elem, true)?;
                }
                Event::End(_) => {
                    // Tag matching is enforced by the reader
                    self.flush_text()?;
                    self.stack.pop();
                    self.tag_stack.pop();
                    self.resolver.pop_scope();
                }
                Event::Text(text) => {
                    self.pending_text.push_str(&text.xml10_content()?);
                }
                Event::GeneralRef(reference) => {
                    let name = std::str::from_utf8(&reference)?;
                    self.pending_text.push_str(&resolve_reference(name)?);
                }
                Event::CData(content) => {
                    self.flush_text()?;
                    if self.stack.len() == 1 {
                        return Err(ParseError::TextOutsideRoot);
                    }
                    let content = content.xml10_content()?;
                    self.push_character_data(NodeKind::CData, &content);
                }
                Event::Comment(content) => {
                    self.flush_text()?;
                    let content = std::str::from_utf8(&content)?;
                    self.push_character_data(NodeKind::Comment, content);
                }
                Event::PI(pi) => {
                    self.flush_text()?;
                    let target = std::str::from_utf8(pi.target())?;
                    let data = std::str::from_utf8(pi.content())?.trim_start();
                    let target_id = self.doc.strings.intern(target);
                    let data_id = self.doc.strings.intern(data);
                    let (parent, depth) = self.position();
                    self.doc.push_node(XmlNode::processing_instruction(
                        target_id, data_id, parent, depth,
                    ));
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        self.flush_text()?;
        if let Some(unclosed) = self.tag_stack.first() {
            return Err(ParseError::UnclosedElement(unclosed.clone()));
        }
        Ok(())
    }

    fn position(&self) -> (NodeId, u16) {
        (
            *self.stack.last().unwrap_or(&DOCUMENT_NODE),
            self.stack.len() as u16,
        )
    }

    fn push_character_data(&mut self, kind: NodeKind, content: &str) {
        let content_id = self.doc.strings.intern(content);
        let (parent, depth) = self.position();
        self.doc
            .push_node(XmlNode::character_data(kind, content_id, parent, depth));
    }

    fn flush_text(&mut self) -> Result<(), ParseError> {
        if self.pending_text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending_text);
        if self.stack.len() == 1 {
            if text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r')) {
                return Ok(());
            }
            return Err(ParseError::TextOutsideRoot);
        }
        self.push_character_data(NodeKind::Text, &text);
        Ok(())
    }

    /// Handle start/empty element
    fn handle_element(&mut self, elem: &BytesStart<'_>, is_empty: bool) -> Result<(), ParseError> {
        let (parent_id, depth) = self.position();
        if parent_id == DOCUMENT_NODE && self.doc.root_element.is_some() {
            return Err(ParseError::MultipleRoots);
        }

        let name = std::str::from_utf8(elem.name().as_ref())?.to_owned();
        let (prefix, local) = split_qname(&name);

        self.resolver.push_scope();

        // Namespace declarations first, so they apply to this element's own name
        let mut attrs: Vec<(String, String)> = Vec::new();
        for attr in elem.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_owned();
            let value = attr
                .unescape_value()
                .map_err(ParseError::AttributeValue)?
                .into_owned();

            if key == "xmlns" {
                let uri_id = self.doc.strings.intern(&value);
                self.resolver.declare_default(uri_id);
            } else if let Some(declared) = key.strip_prefix("xmlns:") {
                let prefix_id = self.doc.strings.intern(declared);
                let uri_id = self.doc.strings.intern(&value);
                self.resolver.declare(prefix_id, uri_id);
            }
            attrs.push((key, value));
        }

        let namespace_id = match prefix {
            Some(prefix) => self.resolve_prefix(prefix)?,
            None => self.resolver.resolve_default().unwrap_or(0),
        };
        for (key, _) in &attrs {
            if let (Some(prefix), _) = split_qname(key) {
                if prefix != "xmlns" {
                    self.resolve_prefix(prefix)?;
                }
            }
        }

        let name_id = self.doc.strings.intern(&name);
        let local_id = self.doc.strings.intern(local);
        let mut node = XmlNode::element(name_id, local_id, parent_id, depth);
        node.namespace_id = namespace_id;

        node.attr_start = self.doc.attributes.len() as u32;
        node.attr_count = attrs.len().min(u16::MAX as usize) as u16;
        for (key, value) in attrs.iter().take(node.attr_count as usize) {
            let attr_name_id = self.doc.strings.intern(key);
            let attr_value_id = self.doc.strings.intern(value);
            self.doc
                .attributes
                .push(XmlAttribute::new(attr_name_id, attr_value_id));
        }

        let node_id = self.doc.push_node(node);
        if parent_id == DOCUMENT_NODE {
            self.doc.root_element = Some(node_id);
        }

        if is_empty {
            self.resolver.pop_scope();
        } else {
            self.stack.push(node_id);
            self.tag_stack.push(name);
        }
        Ok(())
    }

    fn resolve_prefix(&mut self, prefix: &str) -> Result<u32, ParseError> {
        let prefix_id = self.doc.strings.intern(prefix);
        self.resolver
            .resolve(prefix_id)
            .filter(|&uri| uri != 0)
            .ok_or_else(|| ParseError::UnboundPrefix(prefix.to_owned()))
    }
}

/// Split a qualified name into prefix and local part at the first colon
pub(crate) fn split_qname(name: &str) -> (Option<&str>, &str) {
    match memchr(b':', name.as_bytes()) {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}

/// Expand a predefined entity or character reference (without `&` and `;`)
fn resolve_reference(name: &str) -> Result<String, ParseError> {
    let expanded = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };
    expanded
        .map(String::from)
        .ok_or_else(|| ParseError::UnknownEntity(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const H004: &str = "urn:org:ebics:H004";
    const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

    #[test]
    fn test_parse_simple() {
        let doc = XmlDocument::parse("<root>hello</root>").unwrap();
        assert!(doc.root_element().is_some());
        assert_eq!(doc.root_name(), Some("root"));
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.string_value(root), "hello");
    }

    #[test]
    fn test_parse_nested() {
        let doc = XmlDocument::parse("<a><b><c/></b></a>").unwrap();
        let root = doc.root_element_id().unwrap();
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_name(children[0]), Some("b"));
    }

    #[test]
    fn test_siblings() {
        let doc = XmlDocument::parse("<root><a/><b/><c/></root>").unwrap();
        let root = doc.root_element_id().unwrap();
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children.len(), 3);

        let first = doc.get_node(children[0]).unwrap();
        assert!(first.prev_sibling.is_none());
        assert_eq!(first.next_sibling, Some(children[1]));
    }

    #[test]
    fn test_default_namespace_is_inherited() {
        let xml = format!("<ebicsRequest xmlns=\"{H004}\"><header/></ebicsRequest>");
        let doc = XmlDocument::parse(&xml).unwrap();
        let root = doc.root_element_id().unwrap();
        let header = doc.children(root).next().unwrap();
        assert_eq!(doc.namespace_uri(root), Some(H004));
        assert_eq!(doc.namespace_uri(header), Some(H004));
        assert_eq!(doc.node_local_name(header), Some("header"));
    }

    #[test]
    fn test_prefixed_namespaces() {
        let xml = format!(
            "<e:ebicsResponse xmlns:e=\"{H004}\" xmlns:ds=\"{DSIG}\">\
             <e:AuthSignature><ds:SignedInfo/></e:AuthSignature>\
             </e:ebicsResponse>"
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        let root = doc.root_element_id().unwrap();
        let auth = doc.children(root).next().unwrap();
        let signed_info = doc.children(auth).next().unwrap();
        assert_eq!(doc.node_name(auth), Some("e:AuthSignature"));
        assert_eq!(doc.node_local_name(auth), Some("AuthSignature"));
        assert_eq!(doc.namespace_uri(signed_info), Some(DSIG));
    }

    #[test]
    fn test_undeclared_default_has_no_namespace() {
        let xml = format!("<root xmlns=\"{H004}\"><inner xmlns=\"\"/></root>");
        let doc = XmlDocument::parse(&xml).unwrap();
        let root = doc.root_element_id().unwrap();
        let inner = doc.children(root).next().unwrap();
        assert_eq!(doc.namespace_uri(inner), None);
    }

    #[test]
    fn test_entities_are_folded_into_text() {
        let doc = XmlDocument::parse("<r>a &amp; b &#x41;&#66;</r>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.children(root).count(), 1);
        assert_eq!(doc.string_value(root), "a & b AB");
    }

    #[test]
    fn test_line_ends_are_normalized() {
        let doc = XmlDocument::parse("<r>AAAA\r\nBBBB\rCC<![CDATA[x\r\ny]]></r>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.string_value(root), "AAAA\nBBBB\nCCx\ny");
        assert!(doc.source().contains("\r\n"));
    }

    #[test]
    fn test_processing_instruction_data() {
        let doc = XmlDocument::parse("<r><?target  a=\"1\"?></r>").unwrap();
        let root = doc.root_element_id().unwrap();
        let pi = doc.children(root).next().unwrap();
        assert_eq!(doc.node_name(pi), Some("target"));
        assert_eq!(doc.text_content(pi), Some("a=\"1\""));
    }

    #[test]
    fn test_attributes() {
        let doc =
            XmlDocument::parse("<r><d Version=\"E002\" Algorithm=\"a&amp;b\"/></r>").unwrap();
        let root = doc.root_element_id().unwrap();
        let d = doc.children(root).next().unwrap();
        assert_eq!(doc.get_attribute(d, "Version"), Some("E002"));
        assert_eq!(doc.get_attribute(d, "Algorithm"), Some("a&b"));
        assert_eq!(doc.get_attribute(d, "Missing"), None);
    }

    #[test]
    fn test_cdata_contributes_to_string_value() {
        let doc = XmlDocument::parse("<r>x<![CDATA[<y>]]><!-- no --></r>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.string_value(root), "x<y>");
    }

    #[test]
    fn test_empty_input_has_no_root() {
        let doc = XmlDocument::parse("").unwrap();
        assert!(doc.root_element_id().is_none());
        assert_eq!(doc.node_count(), 1);

        let doc = XmlDocument::parse("<?xml version=\"1.0\"?>\n  ").unwrap();
        assert!(doc.root_element_id().is_none());
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            XmlDocument::parse("<a/><b/>"),
            Err(ParseError::MultipleRoots)
        ));
        assert!(XmlDocument::parse("<a><b></b>").is_err());
        assert!(matches!(
            XmlDocument::parse("text<a/>"),
            Err(ParseError::TextOutsideRoot)
        ));
        assert!(matches!(
            XmlDocument::parse("<x:a/>"),
            Err(ParseError::UnboundPrefix(p)) if p == "x"
        ));
        assert!(matches!(
            XmlDocument::parse("<a>&nbsp;</a>"),
            Err(ParseError::UnknownEntity(e)) if e == "nbsp"
        ));
        assert!(matches!(
            XmlDocument::parse("<a></b>"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_source_is_passed_through() {
        let xml = "<r  a='1'>\n  <b/>\n</r>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.source(), xml);
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("ds:Reference"), (Some("ds"), "Reference"));
        assert_eq!(split_qname("header"), (None, "header"));
    }
}
