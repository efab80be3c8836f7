use super::{attribute_list, check_arity, op, parse_attribute_list, string_field};
use super::{LdapAttribute, RfcRequest};
use ldap_asn1::{Asn1Identifier, Asn1Object, Asn1OctetString, Asn1Sequence, BerEncoder};
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// Add Request
///
/// ```text
/// AddRequest ::= [APPLICATION 8] SEQUENCE {
///      entry           LDAPDN,
///      attributes      AttributeList }
/// ```
///
/// The fields are held as a generic sequence so that a request decoded from
/// the wire (or built by a referral rebase) re-encodes exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RfcAddRequest {
    elements: Asn1Sequence,
}

impl RfcAddRequest {
    /// APPLICATION 8, constructed (0x68)
    pub const ID: Asn1Identifier = Asn1Identifier::application(true, op::ADD_REQUEST);

    /// Number of fields in an add request
    pub const ARITY: usize = 2;

    /// Create an add request for `entry` with `attributes`
    pub fn new(entry: &str, attributes: &[LdapAttribute]) -> Self {
        let mut elements = Asn1Sequence::with_capacity(Self::ARITY);
        elements.add(Asn1OctetString::from(entry));
        elements.add(attribute_list(attributes));
        Self { elements }
    }

    /// Rebuild an add request from its field array
    ///
    /// # Arguments
    /// * `elements` - `[entry, attributes]`, as held by an existing request
    /// * `base_dn` - If set, replaces the entry name
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if `elements` does not hold exactly two fields.
    pub fn from_elements(
        mut elements: Vec<Box<dyn Asn1Object>>,
        base_dn: Option<&str>,
    ) -> LdapResult<Self> {
        check_arity(&elements, Self::ARITY, "AddRequest")?;

        if let Some(dn) = base_dn {
            log::debug!(
                "Rebasing AddRequest from {} to {}",
                elements[0],
                Asn1OctetString::from(dn)
            );
            elements[0] = Box::new(Asn1OctetString::from(dn));
        }

        Ok(Self {
            elements: Asn1Sequence::from_elements(elements),
        })
    }

    /// Read an add request out of a decoded value
    ///
    /// # Error Handling
    /// Returns `Asn1Decoding` if `value` is not an `[APPLICATION 8]` sequence
    /// holding two fields.
    pub fn decode(value: &dyn Asn1Object) -> LdapResult<Self> {
        if value.identifier() != Self::ID {
            return Err(LdapError::Asn1Decoding(format!(
                "Expected AddRequest {}, got {}",
                Self::ID,
                value.identifier()
            )));
        }
        let sequence = value.downcast_ref::<Asn1Sequence>().ok_or_else(|| {
            LdapError::Asn1Decoding("AddRequest is not a sequence".to_string())
        })?;
        if sequence.len() != Self::ARITY {
            return Err(LdapError::Asn1Decoding(format!(
                "AddRequest has {} fields, expected {}",
                sequence.len(),
                Self::ARITY
            )));
        }
        Ok(Self {
            elements: Asn1Sequence::from_elements(sequence.to_vec()),
        })
    }

    /// Get the attributes to add
    pub fn attributes(&self) -> LdapResult<Vec<LdapAttribute>> {
        let list = self.elements.get(1).ok_or_else(|| {
            LdapError::Asn1Decoding("AddRequest has no attribute list".to_string())
        })?;
        parse_attribute_list(list)
    }

    /// Clone the field array
    pub fn to_vec(&self) -> Vec<Box<dyn Asn1Object>> {
        self.elements.to_vec()
    }
}

impl Asn1Object for RfcAddRequest {
    fn identifier(&self) -> Asn1Identifier {
        Self::ID
    }

    // The operation tag is fixed
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

impl RfcRequest for RfcAddRequest {
    fn request_name(&self) -> LdapResult<String> {
        string_field(self.elements.get(0), "AddRequest entry")
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

impl fmt::Display for RfcAddRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AddRequest: {}", Self::ID, self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldap_asn1::{decode, Asn1Integer};

    fn sample() -> RfcAddRequest {
        RfcAddRequest::new(
            "ou=old",
            &[
                LdapAttribute::from_strings("objectClass", &["organizationalUnit"]),
                LdapAttribute::from_strings("ou", &["old"]),
            ],
        )
    }

    #[test]
    fn test_identifier() {
        let request = sample();
        assert_eq!(request.identifier(), RfcAddRequest::ID);
        assert_eq!(request.to_ber().unwrap()[0], 0x68);
    }

    #[test]
    fn test_rebase_replaces_entry_only() {
        let request = sample();
        let rebased = request.dup_request(Some("ou=new"), None, true).unwrap();

        assert_eq!(request.request_name().unwrap(), "ou=old");
        assert_eq!(rebased.request_name().unwrap(), "ou=new");
        assert_eq!(rebased.identifier(), RfcAddRequest::ID);

        let rebased = rebased.as_any().downcast_ref::<RfcAddRequest>().unwrap();
        assert_eq!(rebased.attributes().unwrap(), request.attributes().unwrap());
        assert_eq!(
            rebased.to_vec()[1].to_ber().unwrap(),
            request.to_vec()[1].to_ber().unwrap()
        );
    }

    #[test]
    fn test_rebase_without_dn_copies() {
        let request = sample();
        let copy = request.dup_request(None, Some("(objectClass=*)"), false).unwrap();
        assert_eq!(copy.to_ber().unwrap(), request.to_ber().unwrap());

        // The copy is independent of the original
        let copy = copy.as_any().downcast_ref::<RfcAddRequest>().unwrap();
        assert!(!std::ptr::eq(copy, &request));
    }

    #[test]
    fn test_from_elements_arity() {
        let one: Vec<Box<dyn Asn1Object>> = vec![Box::new(Asn1OctetString::from("ou=x"))];
        assert!(matches!(
            RfcAddRequest::from_elements(one, Some("ou=y")),
            Err(LdapError::InvalidArgument(_))
        ));

        let mut three = sample().to_vec();
        three.push(Box::new(Asn1Integer::new(0)));
        assert!(matches!(
            RfcAddRequest::from_elements(three, None),
            Err(LdapError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_wire_round_trip() {
        let request = sample();
        let encoded = request.to_ber().unwrap();
        let (value, _) = decode(&encoded).unwrap();
        let decoded = RfcAddRequest::decode(value.as_ref()).unwrap();
        assert_eq!(decoded.request_name().unwrap(), "ou=old");
        assert_eq!(decoded.to_ber().unwrap(), encoded);

        assert!(RfcAddRequest::decode(&Asn1Sequence::new()).is_err());
    }

    #[test]
    fn test_set_identifier_is_ignored() {
        let mut request = sample();
        request.set_identifier(Asn1Identifier::context_specific(true, 3));
        assert_eq!(request.identifier(), RfcAddRequest::ID);
    }
}
