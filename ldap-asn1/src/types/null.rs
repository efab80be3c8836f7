use crate::ber::{universal, Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// ASN.1 NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Null {
    id: Asn1Identifier,
}

impl Asn1Null {
    /// UNIVERSAL 5
    pub const ID: Asn1Identifier = Asn1Identifier::universal(false, universal::NULL);

    pub fn new() -> Self {
        Self { id: Self::ID }
    }

    /// Re-tag this value (implicit tagging)
    pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
        self.id = id;
        self
    }

    /// Build a NULL from its content octets, which must be empty
    pub fn from_content(id: Asn1Identifier, content: &[u8]) -> LdapResult<Self> {
        if !content.is_empty() {
            return Err(LdapError::Asn1Decoding(format!(
                "NULL must have no content, got {} bytes",
                content.len()
            )));
        }
        Ok(Self { id })
    }
}

impl Default for Asn1Null {
    fn default() -> Self {
        Self::new()
    }
}

impl Asn1Object for Asn1Null {
    fn identifier(&self) -> Asn1Identifier {
        self.id
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        self.id = id;
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_null(&self.id)
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1Null {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} NULL: \"\"", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_encoding() {
        assert_eq!(Asn1Null::new().to_ber().unwrap().as_ref(), &[0x05, 0x00]);
        // UnbindRequest ::= [APPLICATION 2] NULL
        let unbind = Asn1Null::new().with_identifier(Asn1Identifier::application(false, 2));
        assert_eq!(unbind.to_ber().unwrap().as_ref(), &[0x42, 0x00]);
    }

    #[test]
    fn test_null_rejects_content() {
        assert!(Asn1Null::from_content(Asn1Null::ID, &[0x00]).is_err());
    }
}
