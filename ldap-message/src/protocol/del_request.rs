use super::{op, RfcRequest};
use ldap_asn1::{Asn1Identifier, Asn1Object, Asn1OctetString, BerEncoder};
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// Delete Request
///
/// ```text
/// DelRequest ::= [APPLICATION 10] LDAPDN
/// ```
///
/// A primitive operation: the content octets are the DN itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfcDelRequest {
    entry: Asn1OctetString,
}

impl RfcDelRequest {
    /// APPLICATION 10, primitive (0x4A)
    pub const ID: Asn1Identifier = Asn1Identifier::application(false, op::DEL_REQUEST);

    pub fn new(entry: &str) -> Self {
        Self {
            entry: Asn1OctetString::from(entry),
        }
    }

    /// Read a delete request out of a decoded value
    pub fn decode(value: &dyn Asn1Object) -> LdapResult<Self> {
        if value.identifier() != Self::ID {
            return Err(LdapError::Asn1Decoding(format!(
                "Expected DelRequest {}, got {}",
                Self::ID,
                value.identifier()
            )));
        }
        let entry = value.downcast_ref::<Asn1OctetString>().ok_or_else(|| {
            LdapError::Asn1Decoding("DelRequest is not primitive".to_string())
        })?;
        Ok(Self {
            entry: Asn1OctetString::new(entry.byte_value()),
        })
    }
}

impl Asn1Object for RfcDelRequest {
    fn identifier(&self) -> Asn1Identifier {
        Self::ID
    }

    fn set_identifier(&mut self, _id: Asn1Identifier) {}

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_octet_string(&Self::ID, self.entry.byte_value())
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RfcRequest for RfcDelRequest {
    fn request_name(&self) -> LdapResult<String> {
        self.entry.string_value()
    }

    fn dup_request(
        &self,
        base_dn: Option<&str>,
        _filter: Option<&str>,
        _request: bool,
    ) -> LdapResult<Box<dyn RfcRequest>> {
        match base_dn {
            Some(dn) => {
                log::debug!("Rebasing DelRequest from {} to {}", self.entry, dn);
                Ok(Box::new(Self::new(dn)))
            }
            None => Ok(Box::new(self.clone())),
        }
    }
}

impl fmt::Display for RfcDelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} DelRequest: {}", Self::ID, self.entry)
    }
}
