//! Field locator
//!
//! Resolves EBICS fields against a parsed document under a namespace
//! binding. Every lookup is a pure function of (document, binding, field):
//! paths are static, nothing is cached and the document is only read.

mod batch;
mod result;

pub use result::{AttributeRef, ElementRef, Elements, ElementsIter, Match, Matches};

use tracing::{debug, trace};

use crate::binding::NamespaceBinding;
use crate::dom::{DocumentAccess, NodeId, XmlDocument};
use crate::error::LocatorError;
use crate::fields::Field;
use crate::path::Selection;
use result::project;

/// Read-only view of one document under one namespace binding.
pub struct FieldLocator<'a, D: ?Sized = XmlDocument> {
    doc: &'a D,
    binding: &'a NamespaceBinding,
}

impl<D: ?Sized> Clone for FieldLocator<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for FieldLocator<'_, D> {}

impl<D: ?Sized> std::fmt::Debug for FieldLocator<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldLocator")
            .field("binding", self.binding)
            .finish_non_exhaustive()
    }
}

macro_rules! element_fields {
    ($($(#[$meta:meta])* $method:ident => $field:ident,)*) => {
        $(
            $(#[$meta])*
            pub fn $method(&self) -> Result<Option<ElementRef<'a, D>>, LocatorError> {
                self.element(Field::$field)
            }
        )*
    };
}

impl<'a, D: DocumentAccess + ?Sized> FieldLocator<'a, D> {
    pub fn new(doc: &'a D, binding: &'a NamespaceBinding) -> Self {
        FieldLocator { doc, binding }
    }

    pub fn document(&self) -> &'a D {
        self.doc
    }

    pub fn binding(&self) -> &'a NamespaceBinding {
        self.binding
    }

    /// Full text of the underlying document
    pub fn xml(&self) -> &'a str {
        self.doc.source()
    }

    fn root(&self) -> Result<NodeId, LocatorError> {
        self.doc.root_element_id().ok_or_else(|| {
            debug!("lookup against document without root element");
            LocatorError::MalformedDocument("document has no root element")
        })
    }

    fn select(&self, field: Field) -> Result<Selection<'a, D>, LocatorError> {
        let root = self.root()?;
        Ok(Selection::new(self.doc, root, &field.path(), self.binding))
    }

    /// First match of `field` in document order.
    ///
    /// For attribute fields the attribute is read from the first element the
    /// path reaches; a missing attribute there is a miss.
    pub fn locate(&self, field: Field) -> Result<Option<Match<'a, D>>, LocatorError> {
        let path = field.path();
        let found = self
            .select(field)?
            .first()
            .and_then(|id| project(ElementRef::new(self.doc, id), path.target));
        trace!(field = %field, found = found.is_some(), "field lookup");
        Ok(found)
    }

    /// Every match of `field` in document order
    pub fn locate_all(&self, field: Field) -> Result<Matches<'a, D>, LocatorError> {
        let selection = self.select(field)?;
        trace!(field = %field, "field selection");
        Ok(Matches::new(Elements::new(selection), field.path().target))
    }

    fn element(&self, field: Field) -> Result<Option<ElementRef<'a, D>>, LocatorError> {
        let found = self
            .select(field)?
            .first()
            .map(|id| ElementRef::new(self.doc, id));
        trace!(field = %field, found = found.is_some(), "field lookup");
        Ok(found)
    }

    fn elements(&self, field: Field) -> Result<Elements<'a, D>, LocatorError> {
        let selection = self.select(field)?;
        trace!(field = %field, "field selection");
        Ok(Elements::new(selection))
    }

    element_fields! {
        /// Technical return code of the transaction step (`header/mutable`)
        tech_return_code => TechReturnCode,
        /// Business return code of the order (`body`)
        bus_return_code => BusReturnCode,
        order_id => OrderId,
        transaction_id => TransactionId,
        transaction_phase => TransactionPhase,
        segment_number => SegmentNumber,
        num_segments => NumSegments,
        /// Encrypted, compressed order data segment
        order_data => OrderData,
        report_text => ReportText,
        timestamp_bank_parameter => TimestampBankParameter,
        /// Digest of the public key the order data was encrypted for
        encryption_pub_key_digest => EncryptionPubKeyDigest,
        transaction_key => TransactionKey,
        authentication_pub_key_info_x509_data => AuthenticationPubKeyInfoX509Data,
        encryption_pub_key_info_x509_data => EncryptionPubKeyInfoX509Data,
        authentication_pub_key_info_pub_key_value => AuthenticationPubKeyInfoPubKeyValue,
        encryption_pub_key_info_pub_key_value => EncryptionPubKeyInfoPubKeyValue,
        authentication_pub_key_info_modulus => AuthenticationPubKeyInfoModulus,
        authentication_pub_key_info_exponent => AuthenticationPubKeyInfoExponent,
        encryption_pub_key_info_modulus => EncryptionPubKeyInfoModulus,
        encryption_pub_key_info_exponent => EncryptionPubKeyInfoExponent,
        authentication_version => AuthenticationVersion,
        encryption_version => EncryptionVersion,
        auth_signature_digest_value => AuthSignatureDigestValue,
        auth_signature_value => AuthSignatureValue,
        access_params_institute => AccessParamsInstitute,
        access_params_host_id => AccessParamsHostId,
        protocol_params_protocol => ProtocolParamsProtocol,
        protocol_params_authentication => ProtocolParamsAuthentication,
        protocol_params_encryption => ProtocolParamsEncryption,
        protocol_params_signature => ProtocolParamsSignature,
        protocol_params_recovery => ProtocolParamsRecovery,
        protocol_params_pre_validation => ProtocolParamsPreValidation,
        protocol_params_x509_data => ProtocolParamsX509Data,
        protocol_params_client_data_download => ProtocolParamsClientDataDownload,
        protocol_params_downloadable_order_data => ProtocolParamsDownloadableOrderData,
    }

    /// `Version` attribute of the encryption public key digest
    pub fn encryption_pub_key_digest_version(
        &self,
    ) -> Result<Option<AttributeRef<'a>>, LocatorError> {
        let field = Field::EncryptionPubKeyDigestVersion;
        let found = self
            .locate(field)?
            .and_then(|found| found.as_attribute());
        Ok(found)
    }

    /// `ds:Reference` entries of the authentication signature
    pub fn auth_signature_references(&self) -> Result<Elements<'a, D>, LocatorError> {
        self.elements(Field::AuthSignatureReferences)
    }

    /// Bank access URLs announced in an HPD response
    pub fn access_params_urls(&self) -> Result<Elements<'a, D>, LocatorError> {
        self.elements(Field::AccessParamsUrls)
    }
}
