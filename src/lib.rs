//! ebicsxml - Semantic field access for EBICS messages
//!
//! Layers:
//! - `dom`: arena document built from quick-xml events, namespaces resolved
//! - `binding` / `config`: prefixes and URIs of the protocol and signature
//!   namespaces
//! - `path` / `fields`: static location paths for every known field
//! - `locator`: field lookups over a document under a binding
//!
//! ```
//! use ebicsxml::{FieldLocator, NamespaceConfig, XmlDocument};
//!
//! let xml = r#"<ebicsResponse xmlns="urn:org:ebics:H004">
//!   <header><mutable><ReturnCode>000000</ReturnCode></mutable></header>
//! </ebicsResponse>"#;
//! let doc = XmlDocument::parse(xml)?;
//! let binding = NamespaceConfig::h004().binding()?;
//! let locator = FieldLocator::new(&doc, &binding);
//!
//! let code = locator.tech_return_code()?.map(|e| e.text());
//! assert_eq!(code.as_deref(), Some("000000"));
//! # Ok::<(), ebicsxml::Error>(())
//! ```

pub mod binding;
pub mod config;
pub mod dom;
pub mod error;
pub mod fields;
pub mod locator;
pub mod path;

pub use binding::{NamespaceBinding, NamespaceRole, QualifiedName};
pub use config::NamespaceConfig;
pub use dom::{DocumentAccess, XmlDocument};
pub use error::{ConfigurationError, Error, LocatorError, ParseError, Result};
pub use fields::Field;
pub use locator::{AttributeRef, ElementRef, Elements, FieldLocator, Match, Matches};
pub use path::LocationPath;
