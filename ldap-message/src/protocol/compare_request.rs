use super::{check_arity, octet_string_field, op, sequence_field, string_field, RfcRequest};
use ldap_asn1::{Asn1Identifier, Asn1Object, Asn1OctetString, Asn1Sequence, BerEncoder};
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// Compare Request
///
/// ```text
/// CompareRequest ::= [APPLICATION 14] SEQUENCE {
///      entry           LDAPDN,
///      ava             AttributeValueAssertion }
///
/// AttributeValueAssertion ::= SEQUENCE {
///      attributeDesc   AttributeDescription,
///      assertionValue  AssertionValue }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RfcCompareRequest {
    elements: Asn1Sequence,
}

impl RfcCompareRequest {
    /// APPLICATION 14, constructed (0x6E)
    pub const ID: Asn1Identifier = Asn1Identifier::application(true, op::COMPARE_REQUEST);

    pub const ARITY: usize = 2;

    pub fn new(entry: &str, attribute: &str, assertion: impl Into<Vec<u8>>) -> Self {
        let mut ava = Asn1Sequence::with_capacity(2);
        ava.add(Asn1OctetString::from(attribute));
        ava.add(Asn1OctetString::new(assertion));

        let mut elements = Asn1Sequence::with_capacity(Self::ARITY);
        elements.add(Asn1OctetString::from(entry));
        elements.add(ava);
        Self { elements }
    }

    /// Rebuild a compare request from its field array, optionally rebased
    /// onto `base_dn`
    pub fn from_elements(
        mut elements: Vec<Box<dyn Asn1Object>>,
        base_dn: Option<&str>,
    ) -> LdapResult<Self> {
        check_arity(&elements, Self::ARITY, "CompareRequest")?;
        if let Some(dn) = base_dn {
            log::debug!("Rebasing CompareRequest from {} to {}", elements[0], dn);
            elements[0] = Box::new(Asn1OctetString::from(dn));
        }
        Ok(Self {
            elements: Asn1Sequence::from_elements(elements),
        })
    }

    /// Read a compare request out of a decoded value
    pub fn decode(value: &dyn Asn1Object) -> LdapResult<Self> {
        if value.identifier() != Self::ID {
            return Err(LdapError::Asn1Decoding(format!(
                "Expected CompareRequest {}, got {}",
                Self::ID,
                value.identifier()
            )));
        }
        let sequence = sequence_field(Some(value), "CompareRequest")?;
        let request = Self::from_elements(sequence.to_vec(), None)
            .map_err(|e| LdapError::Asn1Decoding(e.to_string()))?;
        // Validate the assertion shape up front
        request.ava()?;
        Ok(request)
    }

    fn ava(&self) -> LdapResult<&Asn1Sequence> {
        let ava = sequence_field(self.elements.get(1), "CompareRequest ava")?;
        if ava.len() != 2 {
            return Err(LdapError::Asn1Decoding(format!(
                "AttributeValueAssertion has {} fields, expected 2",
                ava.len()
            )));
        }
        Ok(ava)
    }

    /// The attribute being compared
    pub fn attribute_description(&self) -> LdapResult<String> {
        string_field(self.ava()?.get(0), "attributeDesc")
    }

    /// The value asserted for the attribute
    pub fn assertion_value(&self) -> LdapResult<Vec<u8>> {
        Ok(octet_string_field(self.ava()?.get(1), "assertionValue")?
            .byte_value()
            .to_vec())
    }

    pub fn to_vec(&self) -> Vec<Box<dyn Asn1Object>> {
        self.elements.to_vec()
    }
}

impl Asn1Object for RfcCompareRequest {
    fn identifier(&self) -> Asn1Identifier {
        Self::ID
    }

    fn set_identifier(&mut self, _id: Asn1Identifier) {}

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_constructed(&Self::ID, self.elements.elements())
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RfcRequest for RfcCompareRequest {
    fn request_name(&self) -> LdapResult<String> {
        string_field(self.elements.get(0), "CompareRequest entry")
    }

    fn dup_request(
        &self,
        base_dn: Option<&str>,
        _filter: Option<&str>,
        _request: bool,
    ) -> LdapResult<Box<dyn RfcRequest>> {
        Ok(Box::new(Self::from_elements(self.to_vec(), base_dn)?))
    }
}

impl fmt::Display for RfcCompareRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} CompareRequest: {}", Self::ID, self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldap_asn1::{decode, Asn1Integer};

    #[test]
    fn test_encoding() {
        let request = RfcCompareRequest::new("cn=a", "sn", "b");
        assert_eq!(
            request.to_ber().unwrap().as_ref(),
            &[
                0x6E, 0x0F, 0x04, 0x04, b'c', b'n', b'=', b'a', 0x30, 0x07, 0x04, 0x02, b's',
                b'n', 0x04, 0x01, b'b'
            ]
        );
    }

    #[test]
    fn test_accessors_and_rebase() {
        let request = RfcCompareRequest::new("cn=a,dc=one", "mail", "a@example.com");
        assert_eq!(request.attribute_description().unwrap(), "mail");
        assert_eq!(request.assertion_value().unwrap(), b"a@example.com".to_vec());

        let rebased = request.dup_request(Some("cn=a,dc=two"), None, true).unwrap();
        assert_eq!(rebased.request_name().unwrap(), "cn=a,dc=two");
        let rebased = rebased.as_any().downcast_ref::<RfcCompareRequest>().unwrap();
        assert_eq!(rebased.attribute_description().unwrap(), "mail");
    }

    #[test]
    fn test_decode() {
        let encoded = RfcCompareRequest::new("cn=a", "sn", "b").to_ber().unwrap();
        let (value, _) = decode(&encoded).unwrap();
        let request = RfcCompareRequest::decode(value.as_ref()).unwrap();
        assert_eq!(request.to_ber().unwrap(), encoded);

        let bad = Asn1Sequence::from_elements(vec![
            Box::new(Asn1OctetString::from("cn=a")),
            Box::new(Asn1Integer::new(1)),
        ])
        .with_identifier(RfcCompareRequest::ID);
        assert!(matches!(
            RfcCompareRequest::decode(&bad),
            Err(LdapError::Asn1Decoding(_))
        ));
    }
}
