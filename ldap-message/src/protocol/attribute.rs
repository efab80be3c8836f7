use super::{octet_string_field, sequence_field, string_field};
use ldap_asn1::{Asn1Object, Asn1OctetString, Asn1Sequence, Asn1Set};
use ldap_core::{LdapError, LdapResult};

/// An attribute with its values
///
/// ```text
/// Attribute ::= PartialAttribute(WITH COMPONENTS { ..., vals (SIZE(1..MAX)) })
/// PartialAttribute ::= SEQUENCE {
///      type       AttributeDescription,
///      vals       SET OF value AttributeValue }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapAttribute {
    name: String,
    values: Vec<Vec<u8>>,
}

impl LdapAttribute {
    pub fn new(name: impl Into<String>, values: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create an attribute with string values
    pub fn from_strings(name: impl Into<String>, values: &[impl AsRef<str>]) -> Self {
        Self::new(
            name,
            values
                .iter()
                .map(|value| value.as_ref().as_bytes().to_vec())
                .collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// Get the values as strings
    ///
    /// # Error Handling
    /// Returns `InvalidData` if a value is not valid UTF-8.
    pub fn string_values(&self) -> LdapResult<Vec<String>> {
        self.values
            .iter()
            .map(|value| {
                String::from_utf8(value.clone()).map_err(|_| {
                    LdapError::InvalidData(format!(
                        "Value of attribute {} is not valid UTF-8",
                        self.name
                    ))
                })
            })
            .collect()
    }

    /// Build the `PartialAttribute` SEQUENCE
    pub fn to_asn1(&self) -> Asn1Sequence {
        let mut values = Asn1Set::new();
        for value in &self.values {
            values.add(Asn1OctetString::new(value.clone()));
        }
        let mut sequence = Asn1Sequence::with_capacity(2);
        sequence.add(Asn1OctetString::from(self.name.as_str()));
        sequence.add(values);
        sequence
    }

    /// Read an attribute out of a decoded `PartialAttribute` SEQUENCE
    pub fn from_asn1(value: &dyn Asn1Object) -> LdapResult<Self> {
        let sequence = sequence_field(Some(value), "attribute")?;
        let name = string_field(sequence.get(0), "attribute type")?;
        let vals = sequence.get(1).ok_or_else(|| {
            LdapError::Asn1Decoding(format!("Attribute {} has no value set", name))
        })?;

        // The decoder yields an Asn1Set for a universal SET
        let vals = vals.downcast_ref::<Asn1Set>().ok_or_else(|| {
            LdapError::Asn1Decoding(format!(
                "Expected SET for values of {}, got {}",
                name,
                vals.identifier()
            ))
        })?;
        let values = vals
            .iter()
            .map(|v| octet_string_field(Some(v), "attribute value").map(|s| s.byte_value().to_vec()))
            .collect::<LdapResult<Vec<_>>>()?;

        Ok(Self { name, values })
    }
}

/// Build an `AttributeList` SEQUENCE OF attributes
pub fn attribute_list(attributes: &[LdapAttribute]) -> Asn1Sequence {
    let mut list = Asn1Sequence::with_capacity(attributes.len());
    for attribute in attributes {
        list.add(attribute.to_asn1());
    }
    list
}

/// Read a decoded `AttributeList`
pub fn parse_attribute_list(value: &dyn Asn1Object) -> LdapResult<Vec<LdapAttribute>> {
    sequence_field(Some(value), "attribute list")?
        .iter()
        .map(LdapAttribute::from_asn1)
        .collect()
}
