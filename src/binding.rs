//! Namespace Binding Table
//!
//! Maps the two namespace roles a field path can use onto caller-chosen
//! prefixes and URIs. Matching against a document is done by URI; the
//! prefixes only name the roles in rendered paths.

use std::fmt;

use crate::error::ConfigurationError;

/// Which of the two bound namespaces qualifies a path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceRole {
    /// The EBICS message vocabulary
    Protocol,
    /// XML digital signatures
    Signature,
}

impl NamespaceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            NamespaceRole::Protocol => "protocol",
            NamespaceRole::Signature => "signature",
        }
    }
}

impl fmt::Display for NamespaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    prefix: String,
    uri: String,
}

/// Immutable pair of (prefix, URI) bindings for the protocol and signature
/// namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    protocol: Slot,
    signature: Slot,
}

impl NamespaceBinding {
    /// Build a binding.
    ///
    /// Fails if a prefix or URI is empty, if a prefix is not an NCName or is
    /// reserved (`xml`, `xmlns`, in any letter case), or if both roles share one prefix.
    pub fn new(
        protocol_prefix: impl Into<String>,
        protocol_uri: impl Into<String>,
        signature_prefix: impl Into<String>,
        signature_uri: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let protocol = Slot::new(NamespaceRole::Protocol, protocol_prefix, protocol_uri)?;
        let signature = Slot::new(NamespaceRole::Signature, signature_prefix, signature_uri)?;
        if protocol.prefix == signature.prefix {
            return Err(ConfigurationError::DuplicatePrefix(protocol.prefix));
        }
        Ok(NamespaceBinding {
            protocol,
            signature,
        })
    }

    fn slot(&self, role: NamespaceRole) -> &Slot {
        match role {
            NamespaceRole::Protocol => &self.protocol,
            NamespaceRole::Signature => &self.signature,
        }
    }

    /// Prefix bound to `role`
    pub fn prefix(&self, role: NamespaceRole) -> &str {
        &self.slot(role).prefix
    }

    /// Namespace URI bound to `role`
    pub fn uri(&self, role: NamespaceRole) -> &str {
        &self.slot(role).uri
    }

    /// Qualify `local` with the prefix bound to `role`
    pub fn qualify<'a>(&'a self, role: NamespaceRole, local: &'a str) -> QualifiedName<'a> {
        let slot = self.slot(role);
        QualifiedName {
            prefix: &slot.prefix,
            uri: &slot.uri,
            local,
        }
    }

    /// `protocolPrefix:local`
    pub fn qualify_protocol<'a>(&'a self, local: &'a str) -> QualifiedName<'a> {
        self.qualify(NamespaceRole::Protocol, local)
    }

    /// `signaturePrefix:local`
    pub fn qualify_signature<'a>(&'a self, local: &'a str) -> QualifiedName<'a> {
        self.qualify(NamespaceRole::Signature, local)
    }
}

impl Slot {
    fn new(
        role: NamespaceRole,
        prefix: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let prefix = prefix.into();
        let uri = uri.into();
        let role_name = role.as_str();

        if prefix.is_empty() {
            return Err(ConfigurationError::EmptyPrefix { role: role_name });
        }
        if uri.is_empty() {
            return Err(ConfigurationError::EmptyUri { role: role_name });
        }
        let reserved = prefix.eq_ignore_ascii_case("xml") || prefix.eq_ignore_ascii_case("xmlns");
        if reserved || !is_ncname(&prefix) {
            return Err(ConfigurationError::InvalidPrefix {
                role: role_name,
                prefix,
            });
        }
        Ok(Slot { prefix, uri })
    }
}

fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// A namespace-qualified element name, borrowed from a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    pub prefix: &'a str,
    pub uri: &'a str,
    pub local: &'a str,
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const H004: &str = "urn:org:ebics:H004";
    const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

    #[test]
    fn test_qualify() {
        let binding = NamespaceBinding::new("ebics", H004, "ds", DSIG).unwrap();
        assert_eq!(binding.qualify_protocol("header").to_string(), "ebics:header");
        assert_eq!(
            binding.qualify_signature("SignedInfo").to_string(),
            "ds:SignedInfo"
        );
        assert_eq!(binding.qualify_signature("Modulus").uri, DSIG);
        assert_eq!(binding.uri(NamespaceRole::Protocol), H004);
        assert_eq!(binding.prefix(NamespaceRole::Signature), "ds");
    }

    #[rstest]
    #[case("", H004, "ds", DSIG, ConfigurationError::EmptyPrefix { role: "protocol" })]
    #[case("urn", H004, "", DSIG, ConfigurationError::EmptyPrefix { role: "signature" })]
    #[case("urn", "", "ds", DSIG, ConfigurationError::EmptyUri { role: "protocol" })]
    #[case("urn", H004, "ds", "", ConfigurationError::EmptyUri { role: "signature" })]
    #[case("ds", H004, "ds", DSIG, ConfigurationError::DuplicatePrefix("ds".into()))]
    #[case("a:b", H004, "ds", DSIG, ConfigurationError::InvalidPrefix { role: "protocol", prefix: "a:b".into() })]
    #[case("urn", H004, "xmlns", DSIG, ConfigurationError::InvalidPrefix { role: "signature", prefix: "xmlns".into() })]
    #[case("XML", H004, "ds", DSIG, ConfigurationError::InvalidPrefix { role: "protocol", prefix: "XML".into() })]
    #[case("urn", H004, "XmlNs", DSIG, ConfigurationError::InvalidPrefix { role: "signature", prefix: "XmlNs".into() })]
    fn test_rejects_invalid_bindings(
        #[case] protocol_prefix: &str,
        #[case] protocol_uri: &str,
        #[case] signature_prefix: &str,
        #[case] signature_uri: &str,
        #[case] expected: ConfigurationError,
    ) {
        let err = NamespaceBinding::new(
            protocol_prefix,
            protocol_uri,
            signature_prefix,
            signature_uri,
        )
        .unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn test_same_uri_different_prefixes_is_allowed() {
        assert!(NamespaceBinding::new("a", H004, "b", H004).is_ok());
    }

    #[test]
    fn test_binding_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<NamespaceBinding>();
    }
}
