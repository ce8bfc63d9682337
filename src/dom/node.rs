//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Node ID of the document node; always the first arena slot.
pub const DOCUMENT_NODE: NodeId = 0;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// An XML node in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String id of the qualified name (elements, PIs) or the content (text, CDATA, comments)
    pub name_id: u32,
    /// String id of the local part of an element name, or of a processing
    /// instruction's data; 0 otherwise
    pub local_id: u32,
    /// String id of the resolved namespace URI, or 0 when the element is in no namespace
    pub namespace_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
    /// Depth in document tree
    pub depth: u16,
}

impl XmlNode {
    fn new(kind: NodeKind, parent: Option<NodeId>, depth: u16) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            local_id: 0,
            namespace_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::new(NodeKind::Document, None, 0)
    }

    /// Create a new element node
    pub fn element(name_id: u32, local_id: u32, parent: NodeId, depth: u16) -> Self {
        XmlNode {
            name_id,
            local_id,
            ..Self::new(NodeKind::Element, Some(parent), depth)
        }
    }

    /// Create a character-data node (text, CDATA or comment) holding `content_id`
    pub fn character_data(kind: NodeKind, content_id: u32, parent: NodeId, depth: u16) -> Self {
        debug_assert!(matches!(
            kind,
            NodeKind::Text | NodeKind::CData | NodeKind::Comment
        ));
        XmlNode {
            name_id: content_id,
            ..Self::new(kind, Some(parent), depth)
        }
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target_id: u32, data_id: u32, parent: NodeId, depth: u16) -> Self {
        XmlNode {
            name_id: target_id,
            local_id: data_id,
            ..Self::new(NodeKind::ProcessingInstruction, Some(parent), depth)
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this node contributes to an element's string value
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name, as written
    pub name_id: u32,
    /// Index into string pool for attribute value (entities decoded)
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute { name_id, value_id }
    }
}
