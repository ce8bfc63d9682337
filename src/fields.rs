//! Field catalogue
//!
//! Every locatable EBICS field and its static location path. Containers:
//! `header/static` and `header/mutable` carry transaction state, `body`
//! carries payload and business return code, the key-management responses
//! carry `*PubKeyInfo`, and HEV/HPD responses carry `AccessParams` and
//! `ProtocolParams`.

use std::fmt;

use crate::path::{LocationPath, Step};

const fn p(local: &'static str) -> Step {
    Step::protocol(local)
}

const fn s(local: &'static str) -> Step {
    Step::signature(local)
}

static TECH_RETURN_CODE: &[Step] = &[p("header"), p("mutable"), p("ReturnCode")];
static REPORT_TEXT: &[Step] = &[p("header"), p("mutable"), p("ReportText")];
static TRANSACTION_PHASE: &[Step] = &[p("header"), p("mutable"), p("TransactionPhase")];
static SEGMENT_NUMBER: &[Step] = &[p("header"), p("mutable"), p("SegmentNumber")];

static ORDER_ID: &[Step] = &[p("header"), p("static"), p("OrderID")];
static TRANSACTION_ID: &[Step] = &[p("header"), p("static"), p("TransactionID")];
static NUM_SEGMENTS: &[Step] = &[p("header"), p("static"), p("NumSegments")];

static BUS_RETURN_CODE: &[Step] = &[p("body"), p("ReturnCode")];
static TIMESTAMP_BANK_PARAMETER: &[Step] = &[p("body"), p("TimestampBankParameter")];
static ORDER_DATA: &[Step] = &[p("body"), p("DataTransfer"), p("OrderData")];
static ENCRYPTION_PUB_KEY_DIGEST: &[Step] = &[
    p("body"),
    p("DataTransfer"),
    p("DataEncryptionInfo"),
    p("EncryptionPubKeyDigest"),
];
static TRANSACTION_KEY: &[Step] = &[
    p("body"),
    p("DataTransfer"),
    p("DataEncryptionInfo"),
    p("TransactionKey"),
];

static AUTH_X509_DATA: &[Step] = &[p("AuthenticationPubKeyInfo"), p("X509Data")];
static AUTH_PUB_KEY_VALUE: &[Step] = &[p("AuthenticationPubKeyInfo"), p("PubKeyValue")];
static AUTH_VERSION: &[Step] = &[p("AuthenticationPubKeyInfo"), p("AuthenticationVersion")];
static AUTH_MODULUS: &[Step] = &[
    p("AuthenticationPubKeyInfo"),
    p("PubKeyValue"),
    s("RSAKeyValue"),
    s("Modulus"),
];
static AUTH_EXPONENT: &[Step] = &[
    p("AuthenticationPubKeyInfo"),
    p("PubKeyValue"),
    s("RSAKeyValue"),
    s("Exponent"),
];

static ENC_X509_DATA: &[Step] = &[p("EncryptionPubKeyInfo"), p("X509Data")];
static ENC_PUB_KEY_VALUE: &[Step] = &[p("EncryptionPubKeyInfo"), p("PubKeyValue")];
static ENC_VERSION: &[Step] = &[p("EncryptionPubKeyInfo"), p("EncryptionVersion")];
static ENC_MODULUS: &[Step] = &[
    p("EncryptionPubKeyInfo"),
    p("PubKeyValue"),
    s("RSAKeyValue"),
    s("Modulus"),
];
static ENC_EXPONENT: &[Step] = &[
    p("EncryptionPubKeyInfo"),
    p("PubKeyValue"),
    s("RSAKeyValue"),
    s("Exponent"),
];

static AUTH_SIGNATURE_REFERENCES: &[Step] =
    &[p("AuthSignature"), s("SignedInfo"), s("Reference")];
static AUTH_SIGNATURE_DIGEST_VALUE: &[Step] = &[
    p("AuthSignature"),
    s("SignedInfo"),
    s("Reference"),
    s("DigestValue"),
];
static AUTH_SIGNATURE_VALUE: &[Step] = &[p("AuthSignature"), s("SignatureValue")];

static ACCESS_PARAMS_URLS: &[Step] = &[p("AccessParams"), p("URL")];
static ACCESS_PARAMS_INSTITUTE: &[Step] = &[p("AccessParams"), p("Institute")];
static ACCESS_PARAMS_HOST_ID: &[Step] = &[p("AccessParams"), p("HostID")];

static PROTOCOL_PARAMS_PROTOCOL: &[Step] = &[p("ProtocolParams"), p("Version"), p("Protocol")];
static PROTOCOL_PARAMS_AUTHENTICATION: &[Step] =
    &[p("ProtocolParams"), p("Version"), p("Authentication")];
static PROTOCOL_PARAMS_ENCRYPTION: &[Step] =
    &[p("ProtocolParams"), p("Version"), p("Encryption")];
static PROTOCOL_PARAMS_SIGNATURE: &[Step] = &[p("ProtocolParams"), p("Version"), p("Signature")];
static PROTOCOL_PARAMS_RECOVERY: &[Step] = &[p("ProtocolParams"), p("Recovery")];
static PROTOCOL_PARAMS_PRE_VALIDATION: &[Step] = &[p("ProtocolParams"), p("PreValidation")];
static PROTOCOL_PARAMS_X509_DATA: &[Step] = &[p("ProtocolParams"), p("X509Data")];
static PROTOCOL_PARAMS_CLIENT_DATA_DOWNLOAD: &[Step] =
    &[p("ProtocolParams"), p("ClientDataDownload")];
static PROTOCOL_PARAMS_DOWNLOADABLE_ORDER_DATA: &[Step] =
    &[p("ProtocolParams"), p("DownloadableOrderData")];

macro_rules! fields {
    ($($variant:ident => $name:literal,)*) => {
        /// A protocol-defined field locatable in an EBICS message.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            /// Every field, in catalogue order
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            /// Stable snake_case name, matching the locator operation
            pub fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)*
                }
            }
        }
    };
}

fields! {
    TechReturnCode => "tech_return_code",
    BusReturnCode => "bus_return_code",
    OrderId => "order_id",
    TransactionId => "transaction_id",
    TransactionPhase => "transaction_phase",
    SegmentNumber => "segment_number",
    NumSegments => "num_segments",
    OrderData => "order_data",
    ReportText => "report_text",
    TimestampBankParameter => "timestamp_bank_parameter",
    EncryptionPubKeyDigest => "encryption_pub_key_digest",
    EncryptionPubKeyDigestVersion => "encryption_pub_key_digest_version",
    TransactionKey => "transaction_key",
    AuthenticationPubKeyInfoX509Data => "authentication_pub_key_info_x509_data",
    EncryptionPubKeyInfoX509Data => "encryption_pub_key_info_x509_data",
    AuthenticationPubKeyInfoPubKeyValue => "authentication_pub_key_info_pub_key_value",
    EncryptionPubKeyInfoPubKeyValue => "encryption_pub_key_info_pub_key_value",
    AuthenticationPubKeyInfoModulus => "authentication_pub_key_info_modulus",
    AuthenticationPubKeyInfoExponent => "authentication_pub_key_info_exponent",
    EncryptionPubKeyInfoModulus => "encryption_pub_key_info_modulus",
    EncryptionPubKeyInfoExponent => "encryption_pub_key_info_exponent",
    AuthenticationVersion => "authentication_version",
    EncryptionVersion => "encryption_version",
    AuthSignatureDigestValue => "auth_signature_digest_value",
    AuthSignatureValue => "auth_signature_value",
    AuthSignatureReferences => "auth_signature_references",
    AccessParamsUrls => "access_params_urls",
    AccessParamsInstitute => "access_params_institute",
    AccessParamsHostId => "access_params_host_id",
    ProtocolParamsProtocol => "protocol_params_protocol",
    ProtocolParamsAuthentication => "protocol_params_authentication",
    ProtocolParamsEncryption => "protocol_params_encryption",
    ProtocolParamsSignature => "protocol_params_signature",
    ProtocolParamsRecovery => "protocol_params_recovery",
    ProtocolParamsPreValidation => "protocol_params_pre_validation",
    ProtocolParamsX509Data => "protocol_params_x509_data",
    ProtocolParamsClientDataDownload => "protocol_params_client_data_download",
    ProtocolParamsDownloadableOrderData => "protocol_params_downloadable_order_data",
}

impl Field {
    /// Location of this field below the root element
    pub fn path(self) -> LocationPath {
        use Field::*;
        let steps = match self {
            TechReturnCode => TECH_RETURN_CODE,
            BusReturnCode => BUS_RETURN_CODE,
            OrderId => ORDER_ID,
            TransactionId => TRANSACTION_ID,
            TransactionPhase => TRANSACTION_PHASE,
            SegmentNumber => SEGMENT_NUMBER,
            NumSegments => NUM_SEGMENTS,
            OrderData => ORDER_DATA,
            ReportText => REPORT_TEXT,
            TimestampBankParameter => TIMESTAMP_BANK_PARAMETER,
            EncryptionPubKeyDigest => ENCRYPTION_PUB_KEY_DIGEST,
            EncryptionPubKeyDigestVersion => {
                return LocationPath::attribute(ENCRYPTION_PUB_KEY_DIGEST, "Version")
            }
            TransactionKey => TRANSACTION_KEY,
            AuthenticationPubKeyInfoX509Data => AUTH_X509_DATA,
            EncryptionPubKeyInfoX509Data => ENC_X509_DATA,
            AuthenticationPubKeyInfoPubKeyValue => AUTH_PUB_KEY_VALUE,
            EncryptionPubKeyInfoPubKeyValue => ENC_PUB_KEY_VALUE,
            AuthenticationPubKeyInfoModulus => AUTH_MODULUS,
            AuthenticationPubKeyInfoExponent => AUTH_EXPONENT,
            EncryptionPubKeyInfoModulus => ENC_MODULUS,
            EncryptionPubKeyInfoExponent => ENC_EXPONENT,
            AuthenticationVersion => AUTH_VERSION,
            EncryptionVersion => ENC_VERSION,
            AuthSignatureDigestValue => AUTH_SIGNATURE_DIGEST_VALUE,
            AuthSignatureValue => AUTH_SIGNATURE_VALUE,
            AuthSignatureReferences => AUTH_SIGNATURE_REFERENCES,
            AccessParamsUrls => ACCESS_PARAMS_URLS,
            AccessParamsInstitute => ACCESS_PARAMS_INSTITUTE,
            AccessParamsHostId => ACCESS_PARAMS_HOST_ID,
            ProtocolParamsProtocol => PROTOCOL_PARAMS_PROTOCOL,
            ProtocolParamsAuthentication => PROTOCOL_PARAMS_AUTHENTICATION,
            ProtocolParamsEncryption => PROTOCOL_PARAMS_ENCRYPTION,
            ProtocolParamsSignature => PROTOCOL_PARAMS_SIGNATURE,
            ProtocolParamsRecovery => PROTOCOL_PARAMS_RECOVERY,
            ProtocolParamsPreValidation => PROTOCOL_PARAMS_PRE_VALIDATION,
            ProtocolParamsX509Data => PROTOCOL_PARAMS_X509_DATA,
            ProtocolParamsClientDataDownload => PROTOCOL_PARAMS_CLIENT_DATA_DOWNLOAD,
            ProtocolParamsDownloadableOrderData => PROTOCOL_PARAMS_DOWNLOADABLE_ORDER_DATA,
        };
        LocationPath::element(steps)
    }

    /// Whether the field may legitimately occur more than once
    pub fn is_repeatable(self) -> bool {
        matches!(self, Field::AuthSignatureReferences | Field::AccessParamsUrls)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::NamespaceBinding;
    use crate::path::Target;
    use rstest::rstest;
    use std::collections::HashSet;

    fn binding() -> NamespaceBinding {
        NamespaceBinding::new(
            "ebics",
            "urn:org:ebics:H004",
            "ds",
            "http://www.w3.org/2000/09/xmldsig#",
        )
        .unwrap()
    }

    #[test]
    fn test_catalogue_is_complete_and_unique() {
        assert_eq!(Field::ALL.len(), 38);
        let names: HashSet<_> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), Field::ALL.len());
    }

    #[test]
    fn test_only_references_and_urls_repeat() {
        let repeatable: Vec<_> = Field::ALL
            .iter()
            .copied()
            .filter(|f| f.is_repeatable())
            .collect();
        assert_eq!(
            repeatable,
            [Field::AuthSignatureReferences, Field::AccessParamsUrls]
        );
    }

    #[test]
    fn test_every_path_is_non_empty() {
        for field in Field::ALL {
            assert!(field.path().depth() >= 2, "{field} is too shallow");
        }
    }

    #[test]
    fn test_digest_version_is_attribute_of_digest() {
        let version = Field::EncryptionPubKeyDigestVersion.path();
        let digest = Field::EncryptionPubKeyDigest.path();
        assert_eq!(version.steps, digest.steps);
        assert_eq!(version.target, Target::Attribute("Version"));
        assert_eq!(digest.target, Target::Element);
    }

    #[rstest]
    #[case(Field::TechReturnCode, "/*/ebics:header/ebics:mutable/ebics:ReturnCode")]
    #[case(Field::BusReturnCode, "/*/ebics:body/ebics:ReturnCode")]
    #[case(Field::OrderId, "/*/ebics:header/ebics:static/ebics:OrderID")]
    #[case(Field::NumSegments, "/*/ebics:header/ebics:static/ebics:NumSegments")]
    #[case(Field::OrderData, "/*/ebics:body/ebics:DataTransfer/ebics:OrderData")]
    #[case(
        Field::EncryptionPubKeyDigestVersion,
        "/*/ebics:body/ebics:DataTransfer/ebics:DataEncryptionInfo/ebics:EncryptionPubKeyDigest/@Version"
    )]
    #[case(
        Field::AuthenticationPubKeyInfoModulus,
        "/*/ebics:AuthenticationPubKeyInfo/ebics:PubKeyValue/ds:RSAKeyValue/ds:Modulus"
    )]
    #[case(
        Field::EncryptionPubKeyInfoExponent,
        "/*/ebics:EncryptionPubKeyInfo/ebics:PubKeyValue/ds:RSAKeyValue/ds:Exponent"
    )]
    #[case(
        Field::AuthSignatureDigestValue,
        "/*/ebics:AuthSignature/ds:SignedInfo/ds:Reference/ds:DigestValue"
    )]
    #[case(Field::AuthSignatureValue, "/*/ebics:AuthSignature/ds:SignatureValue")]
    #[case(Field::AccessParamsUrls, "/*/ebics:AccessParams/ebics:URL")]
    #[case(
        Field::ProtocolParamsSignature,
        "/*/ebics:ProtocolParams/ebics:Version/ebics:Signature"
    )]
    #[case(
        Field::ProtocolParamsDownloadableOrderData,
        "/*/ebics:ProtocolParams/ebics:DownloadableOrderData"
    )]
    fn test_rendered_paths(#[case] field: Field, #[case] expected: &str) {
        let binding = binding();
        assert_eq!(field.path().display_with(&binding).to_string(), expected);
    }
}
