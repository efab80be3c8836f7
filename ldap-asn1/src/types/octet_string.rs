use crate::ber::{universal, Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{is_valid_utf8, LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// ASN.1 OCTET STRING
///
/// Holds raw bytes. LDAP carries its strings (DNs, attribute descriptions,
/// OIDs) in OCTET STRINGs, so [`string_value`](Self::string_value) offers a
/// checked UTF-8 view of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1OctetString {
    id: Asn1Identifier,
    content: Vec<u8>,
}

impl Asn1OctetString {
    /// UNIVERSAL 4
    pub const ID: Asn1Identifier = Asn1Identifier::universal(false, universal::OCTET_STRING);

    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Self::ID,
            content: content.into(),
        }
    }

    /// Re-tag this value (implicit tagging)
    pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
        self.id = id;
        self
    }

    /// Build an OCTET STRING from its content octets (copied verbatim)
    pub fn from_content(id: Asn1Identifier, content: &[u8]) -> Self {
        Self {
            id,
            content: content.to_vec(),
        }
    }

    /// Get the raw content
    pub fn byte_value(&self) -> &[u8] {
        &self.content
    }

    /// Take the raw content
    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }

    /// Get the content as a string
    ///
    /// # Error Handling
    /// Returns `InvalidData` if the content is not valid UTF-8.
    pub fn string_value(&self) -> LdapResult<String> {
        if !is_valid_utf8(&self.content, false) {
            return Err(LdapError::InvalidData(format!(
                "OCTET STRING {} is not valid UTF-8",
                self.id
            )));
        }
        String::from_utf8(self.content.clone())
            .map_err(|e| LdapError::InvalidData(format!("OCTET STRING {}: {}", self.id, e)))
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<&str> for Asn1OctetString {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Asn1OctetString {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for Asn1OctetString {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl Asn1Object for Asn1OctetString {
    fn identifier(&self) -> Asn1Identifier {
        self.id
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        self.id = id;
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_octet_string(&self.id, &self.content)
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} OCTET STRING: {}",
            self.id,
            String::from_utf8_lossy(&self.content)
        )
    }
}
