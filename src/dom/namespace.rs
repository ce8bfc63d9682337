//! Namespace Resolution
//!
//! Stack-based namespace resolver used while building the arena document.

use super::strings::StringPool;

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Namespace binding (prefix -> URI). Prefix id 0 is the default namespace.
#[derive(Debug, Clone)]
struct NsBinding {
    prefix_id: u32,
    uri_id: u32,
    depth: u16,
}

/// Stack-based namespace resolver
#[derive(Debug)]
pub struct NamespaceResolver {
    bindings: Vec<NsBinding>,
    depth: u16,
    xml_prefix_id: u32,
    xmlns_prefix_id: u32,
}

impl NamespaceResolver {
    /// Create a new namespace resolver with pre-declared xml and xmlns namespaces
    pub fn new(strings: &mut StringPool) -> Self {
        let xml_prefix_id = strings.intern("xml");
        let xmlns_prefix_id = strings.intern("xmlns");
        let xml_uri_id = strings.intern(ns::XML);
        let xmlns_uri_id = strings.intern(ns::XMLNS);

        NamespaceResolver {
            bindings: vec![
                NsBinding {
                    prefix_id: xml_prefix_id,
                    uri_id: xml_uri_id,
                    depth: 0,
                },
                NsBinding {
                    prefix_id: xmlns_prefix_id,
                    uri_id: xmlns_uri_id,
                    depth: 0,
                },
            ],
            depth: 0,
            xml_prefix_id,
            xmlns_prefix_id,
        }
    }

    /// Enter a new element scope
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a namespace binding for the current scope
    pub fn declare(&mut self, prefix_id: u32, uri_id: u32) {
        // xml and xmlns are fixed
        if prefix_id == self.xml_prefix_id || prefix_id == self.xmlns_prefix_id {
            return;
        }

        self.bindings.push(NsBinding {
            prefix_id,
            uri_id,
            depth: self.depth,
        });
    }

    /// Declare the default namespace for the current scope.
    /// An empty URI (id 0) undeclares it.
    pub fn declare_default(&mut self, uri_id: u32) {
        self.declare(0, uri_id);
    }

    /// Resolve a prefix to a namespace URI ID
    pub fn resolve(&self, prefix_id: u32) -> Option<u32> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix_id == prefix_id)
            .map(|b| b.uri_id)
    }

    /// Resolve the default namespace; `None` when unset or undeclared
    pub fn resolve_default(&self) -> Option<u32> {
        self.resolve(0).filter(|&uri| uri != 0)
    }

    /// Get current depth
    pub fn depth(&self) -> u16 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespaces() {
        let mut strings = StringPool::new();
        let resolver = NamespaceResolver::new(&mut strings);

        let xml_id = strings.intern("xml");
        assert!(resolver.resolve(xml_id).is_some());
        assert_eq!(resolver.resolve_default(), None);
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut strings = StringPool::new();
        let mut resolver = NamespaceResolver::new(&mut strings);

        let ds_prefix = strings.intern("ds");
        let ds_uri = strings.intern("http://www.w3.org/2000/09/xmldsig#");

        resolver.push_scope();
        resolver.declare(ds_prefix, ds_uri);

        assert_eq!(resolver.resolve(ds_prefix), Some(ds_uri));
    }

    #[test]
    fn test_scope_pop() {
        let mut strings = StringPool::new();
        let mut resolver = NamespaceResolver::new(&mut strings);

        let uri = strings.intern("urn:org:ebics:H004");

        resolver.push_scope();
        resolver.declare_default(uri);
        assert_eq!(resolver.resolve_default(), Some(uri));

        resolver.pop_scope();
        assert_eq!(resolver.resolve_default(), None);
        assert_eq!(resolver.depth(), 0);
    }

    #[test]
    fn test_shadow_and_undeclare_default() {
        let mut strings = StringPool::new();
        let mut resolver = NamespaceResolver::new(&mut strings);

        let uri = strings.intern("urn:org:ebics:H004");

        resolver.push_scope();
        resolver.declare_default(uri);

        resolver.push_scope();
        resolver.declare_default(0);
        assert_eq!(resolver.resolve_default(), None);

        resolver.pop_scope();
        assert_eq!(resolver.resolve_default(), Some(uri));
    }

    #[test]
    fn test_xml_prefix_cannot_be_rebound() {
        let mut strings = StringPool::new();
        let mut resolver = NamespaceResolver::new(&mut strings);
        let xml_prefix = strings.intern("xml");
        let other = strings.intern("urn:example");

        resolver.push_scope();
        resolver.declare(xml_prefix, other);
        assert_eq!(resolver.resolve(xml_prefix), strings.lookup(ns::XML));
    }
}
