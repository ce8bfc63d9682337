//! Error types.
//!
//! Absence of a field is never an error; lookups encode it in `Option` or an
//! empty sequence.

use thiserror::Error;

/// Invalid namespace binding supplied at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A prefix was empty
    #[error("namespace prefix for the {role} namespace is empty")]
    EmptyPrefix { role: &'static str },

    /// A namespace URI was empty
    #[error("namespace URI for the {role} namespace is empty")]
    EmptyUri { role: &'static str },

    /// Both roles were bound to the same prefix
    #[error("protocol and signature namespaces share the prefix '{0}'")]
    DuplicatePrefix(String),

    /// The prefix is not usable as an XML namespace prefix
    #[error("invalid namespace prefix '{prefix}' for the {role} namespace")]
    InvalidPrefix { role: &'static str, prefix: String },
}

/// Failures raised while evaluating a lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The document has no root element to evaluate paths against
    #[error("malformed document: {0}")]
    MalformedDocument(&'static str),
}

/// Failures raised while building an [`XmlDocument`](crate::XmlDocument).
#[derive(Error, Debug)]
pub enum ParseError {
    /// Markup rejected by the underlying reader
    #[error("XML syntax error at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Malformed attribute list
    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Attribute value with an undecodable escape sequence
    #[error("invalid attribute value: {0}")]
    AttributeValue(#[source] quick_xml::Error),

    /// Entity reference other than the predefined five or a character reference
    #[error("unknown entity reference '&{0};'")]
    UnknownEntity(String),

    /// Element or attribute prefix without an in-scope declaration
    #[error("namespace prefix '{0}' is not bound")]
    UnboundPrefix(String),

    /// A second top-level element
    #[error("document has multiple root elements")]
    MultipleRoots,

    /// Non-whitespace character data outside the root element
    #[error("text content not allowed at document level")]
    TextOutsideRoot,

    /// End of input inside an open element
    #[error("unclosed tag: <{0}>")]
    UnclosedElement(String),

    /// Character data that cannot be decoded
    #[error("invalid character data: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Names or text that are not valid UTF-8
    #[error("invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
