//! Namespace configuration.
//!
//! Plain serde value object, meant to be embedded in whatever settings file
//! the host application loads. Validation happens on conversion into a
//! [`NamespaceBinding`].

use serde::{Deserialize, Serialize};

use crate::binding::NamespaceBinding;
use crate::error::ConfigurationError;

pub const EBICS_H004: &str = "urn:org:ebics:H004";
pub const EBICS_H005: &str = "urn:org:ebics:H005";
pub const XML_DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Prefixes and URIs of the protocol and signature namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Prefix used for the EBICS namespace in rendered paths
    #[serde(default = "default_ebics_prefix")]
    pub ebics_prefix: String,
    /// EBICS namespace URI
    #[serde(default = "default_ebics")]
    pub ebics: String,
    /// Prefix used for the XML-DSig namespace in rendered paths
    #[serde(default = "default_xml_dsig_prefix")]
    pub xml_dsig_prefix: String,
    /// XML-DSig namespace URI
    #[serde(default = "default_xml_dsig")]
    pub xml_dsig: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self::h004()
    }
}

impl NamespaceConfig {
    /// EBICS 2.5 (H004)
    pub fn h004() -> Self {
        Self {
            ebics_prefix: default_ebics_prefix(),
            ebics: EBICS_H004.into(),
            xml_dsig_prefix: default_xml_dsig_prefix(),
            xml_dsig: default_xml_dsig(),
        }
    }

    /// EBICS 3.0 (H005)
    pub fn h005() -> Self {
        Self {
            ebics: EBICS_H005.into(),
            ..Self::h004()
        }
    }

    /// Validate and convert into a binding
    pub fn binding(&self) -> Result<NamespaceBinding, ConfigurationError> {
        NamespaceBinding::try_from(self)
    }
}

impl TryFrom<&NamespaceConfig> for NamespaceBinding {
    type Error = ConfigurationError;

    fn try_from(config: &NamespaceConfig) -> Result<Self, Self::Error> {
        NamespaceBinding::new(
            config.ebics_prefix.as_str(),
            config.ebics.as_str(),
            config.xml_dsig_prefix.as_str(),
            config.xml_dsig.as_str(),
        )
    }
}

impl TryFrom<NamespaceConfig> for NamespaceBinding {
    type Error = ConfigurationError;

    fn try_from(config: NamespaceConfig) -> Result<Self, Self::Error> {
        NamespaceBinding::new(
            config.ebics_prefix,
            config.ebics,
            config.xml_dsig_prefix,
            config.xml_dsig,
        )
    }
}

fn default_ebics_prefix() -> String {
    "urn".into()
}

fn default_ebics() -> String {
    EBICS_H004.into()
}

fn default_xml_dsig_prefix() -> String {
    "ds".into()
}

fn default_xml_dsig() -> String {
    XML_DSIG.into()
}
