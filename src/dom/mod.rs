//! DOM Module - Arena-based XML Document
//!
//! Implements an efficient DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for element/attribute names and namespace URIs
//! - Namespace resolution stack

pub mod document;
pub mod namespace;
pub mod node;
pub mod serialize;
pub mod strings;

pub use document::XmlDocument;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode, DOCUMENT_NODE};
pub use strings::StringPool;

/// Read-only access to a parsed document.
///
/// This is the seam between the field locator and whatever produced the
/// document tree: the locator only ever walks nodes through this trait.
///
/// The trait is tied to the arena layout. Implementors hand out [`XmlNode`]
/// records and the [`StringPool`] their names were interned in, so another
/// store must be arena-shaped; a foreign tree needs converting first. Node
/// ids must be in document order.
pub trait DocumentAccess {
    /// Get root element ID
    fn root_element_id(&self) -> Option<NodeId>;

    /// Get a node by ID
    fn get_node(&self, id: NodeId) -> Option<&XmlNode>;

    /// Get attributes for an element
    fn attributes(&self, id: NodeId) -> &[XmlAttribute];

    /// Get the string pool for direct access
    fn strings(&self) -> &StringPool;

    /// The full document as text
    fn source(&self) -> &str;

    /// Get total number of nodes
    fn node_count(&self) -> usize;

    /// Get node name as written, including any prefix
    fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => {
                self.strings().get_str(node.name_id)
            }
            _ => None,
        }
    }

    /// Get element local name (without prefix)
    fn node_local_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings().get_str(node.local_id)
        } else {
            None
        }
    }

    /// Get the resolved namespace URI of an element
    fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() && node.namespace_id != 0 {
            self.strings().get_str(node.namespace_id)
        } else {
            None
        }
    }

    /// Get text content of a text, CDATA or comment node, or the data of a
    /// processing instruction
    fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Text | NodeKind::CData | NodeKind::Comment => {
                self.strings().get_str(node.name_id)
            }
            NodeKind::ProcessingInstruction => self.strings().get_str(node.local_id),
            _ => None,
        }
    }

    /// Get attribute value by name as written
    fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        let strings = self.strings();
        self.attributes(node_id)
            .iter()
            .find(|attr| strings.get_str(attr.name_id) == Some(name))
            .and_then(|attr| strings.get_str(attr.value_id))
    }

    /// Get all attribute names and values for a node
    fn get_attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)> {
        let strings = self.strings();
        self.attributes(node_id)
            .iter()
            .filter_map(|attr| {
                let name = strings.get_str(attr.name_id)?;
                let value = strings.get_str(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    /// Iterate over children of a node
    fn children(&self, id: NodeId) -> ChildIter<'_, Self> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            next: first,
        }
    }

    /// Concatenated text and CDATA of all descendants, in document order
    fn string_value(&self, id: NodeId) -> String {
        let mut value = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get_node(current) else {
                continue;
            };
            if node.is_text() {
                value.push_str(self.strings().get_str(node.name_id).unwrap_or(""));
                continue;
            }
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        value
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d, D: ?Sized> {
    doc: &'d D,
    next: Option<NodeId>,
}

impl<'d, D: DocumentAccess + ?Sized> Iterator for ChildIter<'d, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}
