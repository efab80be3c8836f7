use crate::ber::{universal, Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

fn write_elements(
    f: &mut fmt::Formatter<'_>,
    id: &Asn1Identifier,
    name: &str,
    elements: &[Box<dyn Asn1Object>],
) -> fmt::Result {
    write!(f, "{} {}: {{ ", id, name)?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", element)?;
    }
    f.write_str(" }")
}

/// ASN.1 SEQUENCE / SEQUENCE OF
///
/// An ordered list of values of any type. Insertion order is wire order.
/// The sequence owns its elements exclusively.
///
/// A sequence is a plain mutable structure: share it between threads only
/// behind your own synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct Asn1Sequence {
    id: Asn1Identifier,
    elements: Vec<Box<dyn Asn1Object>>,
}

impl Asn1Sequence {
    /// UNIVERSAL 16, constructed
    pub const ID: Asn1Identifier = Asn1Identifier::universal(true, universal::SEQUENCE);

    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: Self::ID,
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Build a sequence holding `elements`, in order
    pub fn from_elements(elements: Vec<Box<dyn Asn1Object>>) -> Self {
        Self {
            id: Self::ID,
            elements,
        }
    }

    /// Re-tag this value (implicit tagging)
    pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
        self.id = id;
        self
    }

    /// Append a value
    pub fn add<T: Asn1Object + 'static>(&mut self, value: T) {
        self.elements.push(Box::new(value));
    }

    /// Append an already boxed value
    pub fn add_boxed(&mut self, value: Box<dyn Asn1Object>) {
        self.elements.push(value);
    }

    /// Get the element at `index`
    pub fn get(&self, index: usize) -> Option<&dyn Asn1Object> {
        self.elements.get(index).map(|e| e.as_ref())
    }

    /// Replace the element at `index`
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: Box<dyn Asn1Object>) -> LdapResult<()> {
        let len = self.elements.len();
        let slot = self.elements.get_mut(index).ok_or_else(|| {
            LdapError::InvalidArgument(format!(
                "Sequence index {} out of bounds (len {})",
                index, len
            ))
        })?;
        *slot = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Asn1Object> {
        self.elements.iter().map(|e| e.as_ref())
    }

    pub fn elements(&self) -> &[Box<dyn Asn1Object>] {
        &self.elements
    }

    /// Clone the elements into a new array
    pub fn to_vec(&self) -> Vec<Box<dyn Asn1Object>> {
        self.elements.clone()
    }

    pub fn into_elements(self) -> Vec<Box<dyn Asn1Object>> {
        self.elements
    }
}

impl Default for Asn1Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Asn1Object for Asn1Sequence {
    fn identifier(&self) -> Asn1Identifier {
        self.id
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        self.id = id;
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_constructed(&self.id, &self.elements)
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, &self.id, "SEQUENCE", &self.elements)
    }
}

/// ASN.1 SET / SET OF
///
/// Elements are encoded in insertion order; no DER sorting is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Asn1Set {
    id: Asn1Identifier,
    elements: Vec<Box<dyn Asn1Object>>,
}

impl Asn1Set {
    /// UNIVERSAL 17, constructed
    pub const ID: Asn1Identifier = Asn1Identifier::universal(true, universal::SET);

    pub fn new() -> Self {
        Self::from_elements(Vec::new())
    }

    pub fn from_elements(elements: Vec<Box<dyn Asn1Object>>) -> Self {
        Self {
            id: Self::ID,
            elements,
        }
    }

    /// Re-tag this value (implicit tagging)
    pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
        self.id = id;
        self
    }

    pub fn add<T: Asn1Object + 'static>(&mut self, value: T) {
        self.elements.push(Box::new(value));
    }

    pub fn get(&self, index: usize) -> Option<&dyn Asn1Object> {
        self.elements.get(index).map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Asn1Object> {
        self.elements.iter().map(|e| e.as_ref())
    }

    pub fn into_elements(self) -> Vec<Box<dyn Asn1Object>> {
        self.elements
    }
}

impl Default for Asn1Set {
    fn default() -> Self {
        Self::new()
    }
}

impl Asn1Object for Asn1Set {
    fn identifier(&self) -> Asn1Identifier {
        self.id
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        self.id = id;
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        encoder.encode_constructed(&self.id, &self.elements)
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, &self.id, "SET", &self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asn1Boolean, Asn1Integer, Asn1OctetString};

    #[test]
    fn test_sequence_heterogeneous_elements() {
        let mut sequence = Asn1Sequence::new();
        sequence.add(Asn1Integer::new(7));
        sequence.add(Asn1OctetString::from("x"));
        sequence.add(Asn1Boolean::new(true));

        assert_eq!(sequence.len(), 3);
        assert!(sequence.get(1).unwrap().is::<Asn1OctetString>());
        assert!(sequence.get(3).is_none());
        assert_eq!(
            sequence.to_ber().unwrap().as_ref(),
            &[0x30, 0x09, 0x02, 0x01, 0x07, 0x04, 0x01, b'x', 0x01, 0x01, 0xFF]
        );
    }

    #[test]
    fn test_sequence_set_index() {
        let mut sequence = Asn1Sequence::new();
        sequence.add(Asn1Integer::new(1));
        sequence.set(0, Box::new(Asn1Integer::new(2))).unwrap();
        assert_eq!(
            sequence.get(0).unwrap().downcast_ref::<Asn1Integer>().unwrap().long_value(),
            2
        );
        assert!(sequence.set(1, Box::new(Asn1Integer::new(3))).is_err());
    }

    #[test]
    fn test_empty_sequence_and_set() {
        assert_eq!(Asn1Sequence::new().to_ber().unwrap().as_ref(), &[0x30, 0x00]);
        assert_eq!(Asn1Set::new().to_ber().unwrap().as_ref(), &[0x31, 0x00]);
    }

    #[test]
    fn test_sequence_long_form_length() {
        let mut sequence = Asn1Sequence::new();
        sequence.add(Asn1OctetString::new(vec![0u8; 200]));
        let encoded = sequence.to_ber().unwrap();
        // 0x30, 0x81, 203, then the child (0x04 0x81 200 ...)
        assert_eq!(&encoded[..6], &[0x30, 0x81, 203, 0x04, 0x81, 200]);
        assert_eq!(encoded.len(), 3 + 203);
    }

    #[test]
    fn test_sequence_display() {
        let mut sequence = Asn1Sequence::new();
        sequence.add(Asn1Integer::new(1));
        sequence.add(Asn1Boolean::new(false));
        assert_eq!(
            sequence.to_string(),
            "[UNIVERSAL 16] SEQUENCE: { [UNIVERSAL 2] INTEGER: 1, [UNIVERSAL 1] BOOLEAN: false }"
        );
    }
}
