use crate::ber::{universal, Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// ASN.1 BOOLEAN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Boolean {
    id: Asn1Identifier,
    value: bool,
}

impl Asn1Boolean {
    /// UNIVERSAL 1
    pub const ID: Asn1Identifier = Asn1Identifier::universal(false, universal::BOOLEAN);

    pub fn new(value: bool) -> Self {
        Self { id: Self::ID, value }
    }

    /// Re-tag this value (implicit tagging)
    pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
        self.id = id;
        self
    }

    /// Build a BOOLEAN from its content octets
    ///
    /// Exactly one octet is expected; `0x00` is false, anything else is true.
    pub fn from_content(id: Asn1Identifier, content: &[u8]) -> LdapResult<Self> {
        match content {
            [byte] => Ok(Self { id, value: *byte != 0 }),
            _ => Err(LdapError::Asn1Decoding(format!(
                "BOOLEAN content must be 1 byte, got {}",
                content.len()
            ))),
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

impl Asn1Object for Asn1Boolean {
    fn identifier(&self) -> Asn1Identifier {
        self.id
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        self.id = id;
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_boolean(&self.id, self.value)
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BOOLEAN: {}", self.id, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_encoding() {
        assert_eq!(Asn1Boolean::new(true).to_ber().unwrap().as_ref(), &[0x01, 0x01, 0xFF]);
        assert_eq!(Asn1Boolean::new(false).to_ber().unwrap().as_ref(), &[0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_boolean_from_content() {
        assert!(Asn1Boolean::from_content(Asn1Boolean::ID, &[0x01]).unwrap().value());
        assert!(!Asn1Boolean::from_content(Asn1Boolean::ID, &[0x00]).unwrap().value());
        assert!(Asn1Boolean::from_content(Asn1Boolean::ID, &[]).is_err());
        assert!(Asn1Boolean::from_content(Asn1Boolean::ID, &[0x00, 0x00]).is_err());
    }
}
