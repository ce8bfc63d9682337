//! Node serialization
//!
//! Re-renders a subtree as markup. Names keep the prefixes they were written
//! with and namespace declarations are carried as ordinary attributes, so a
//! fragment is only self-contained if its declarations sit on or below it.

use super::{DocumentAccess, NodeId, NodeKind};

/// Serialize a node to an XML string
/// Uses iterative approach with explicit stack to avoid stack overflow on deep XML
pub fn serialize_node<D: DocumentAccess + ?Sized>(doc: &D, node_id: NodeId) -> String {
    let mut buf = String::with_capacity(256);

    enum StackEntry {
        Enter(NodeId),
        Close(NodeId),
    }

    let mut stack: Vec<StackEntry> = Vec::with_capacity(32);
    stack.push(StackEntry::Enter(node_id));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id) => {
                if let Some(name) = doc.node_name(id) {
                    buf.push_str("</");
                    buf.push_str(name);
                    buf.push('>');
                }
            }
            StackEntry::Enter(current_id) => {
                let Some(node) = doc.get_node(current_id) else {
                    continue;
                };

                match node.kind {
                    NodeKind::Element => {
                        let name = doc.node_name(current_id).unwrap_or("");
                        buf.push('<');
                        buf.push_str(name);

                        for (attr_name, attr_value) in doc.get_attribute_values(current_id) {
                            buf.push(' ');
                            buf.push_str(attr_name);
                            buf.push_str("=\"");
                            escape_xml_to_buf(attr_value, &mut buf);
                            buf.push('"');
                        }

                        if node.first_child.is_none() {
                            buf.push_str("/>");
                        } else {
                            buf.push('>');

                            // Closing tag is processed after the children
                            stack.push(StackEntry::Close(current_id));

                            let mut child_id = node.last_child;
                            while let Some(cid) = child_id {
                                stack.push(StackEntry::Enter(cid));
                                child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                            }
                        }
                    }
                    NodeKind::Text => {
                        escape_xml_to_buf(doc.text_content(current_id).unwrap_or(""), &mut buf);
                    }
                    NodeKind::CData => {
                        buf.push_str("<![CDATA[");
                        buf.push_str(doc.text_content(current_id).unwrap_or(""));
                        buf.push_str("]]>");
                    }
                    NodeKind::Comment => {
                        buf.push_str("<!--");
                        buf.push_str(doc.text_content(current_id).unwrap_or(""));
                        buf.push_str("-->");
                    }
                    NodeKind::ProcessingInstruction => {
                        buf.push_str("<?");
                        buf.push_str(doc.node_name(current_id).unwrap_or(""));
                        let data = doc.text_content(current_id).unwrap_or("");
                        if !data.is_empty() {
                            buf.push(' ');
                            buf.push_str(data);
                        }
                        buf.push_str("?>");
                    }
                    NodeKind::Document => {
                        if let Some(root_id) = doc.root_element_id() {
                            stack.push(StackEntry::Enter(root_id));
                        }
                    }
                }
            }
        }
    }

    buf
}

/// Escape XML special characters to buffer
#[inline]
fn escape_xml_to_buf(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{XmlDocument, DOCUMENT_NODE};

    #[test]
    fn test_serialize_subtree() {
        let doc = XmlDocument::parse(
            "<r xmlns=\"urn:org:ebics:H004\"><body><ReturnCode>091005</ReturnCode><x/></body></r>",
        )
        .unwrap();
        let root = doc.root_element_id().unwrap();
        let body = doc.children(root).next().unwrap();
        assert_eq!(
            serialize_node(&doc, body),
            "<body><ReturnCode>091005</ReturnCode><x/></body>"
        );
    }

    #[test]
    fn test_serialize_escapes() {
        let doc = XmlDocument::parse("<r a=\"&quot;x&quot;\">1 &lt; 2<![CDATA[<raw>]]></r>").unwrap();
        assert_eq!(
            serialize_node(&doc, DOCUMENT_NODE),
            "<r a=\"&quot;x&quot;\">1 &lt; 2<![CDATA[<raw>]]></r>"
        );
    }

    #[test]
    fn test_serialize_keeps_processing_instruction_data() {
        let doc = XmlDocument::parse("<ReturnCode><?pi some data?>1<?bare?></ReturnCode>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(
            serialize_node(&doc, root),
            "<ReturnCode><?pi some data?>1<?bare?></ReturnCode>"
        );
        assert_eq!(doc.string_value(root), "1");
    }
}
