//! BER encoder for ASN.1 values
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ldap_asn1::ber::BerEncoder;
//! use ldap_asn1::types::{Asn1Integer, Asn1Object};
//!
//! let mut encoder = BerEncoder::new();
//! Asn1Integer::new(12345).encode(&mut encoder)?;
//! let bytes = encoder.into_bytes();
//! # Ok::<(), ldap_core::LdapError>(())
//! ```

use crate::ber::identifier::Asn1Identifier;
use crate::ber::length::BerLength;
use crate::types::Asn1Object;
use bytes::{BufMut, Bytes, BytesMut};
use ldap_core::LdapResult;

/// BER encoder for ASN.1 values
///
/// Accumulates TLV (Tag-Length-Value) triplets in a `BytesMut` buffer.
/// Constructed values are encoded into a nested encoder first, so the length
/// octets written for them always match the content that follows. Only the
/// definite length form is produced.
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: BytesMut,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Encoding Process
    /// 1. Encode identifier octets
    /// 2. Encode length octets for `content.len()`
    /// 3. Append content octets
    pub fn encode_tlv(&mut self, id: &Asn1Identifier, content: &[u8]) -> LdapResult<()> {
        let length = BerLength::new(content.len());
        self.buffer
            .reserve(id.encoded_len() + length.encoded_len() + content.len());
        id.encode_into(&mut self.buffer);
        length.encode_into(&mut self.buffer);
        self.buffer.put_slice(content);
        Ok(())
    }

    /// Encode a BOOLEAN: one content octet, `0xFF` for true
    pub fn encode_boolean(&mut self, id: &Asn1Identifier, value: bool) -> LdapResult<()> {
        self.encode_tlv(id, &[if value { 0xFF } else { 0x00 }])
    }

    /// Encode an INTEGER or ENUMERATED
    ///
    /// The content is the minimal big-endian two's complement representation
    /// of `value`: 127 is `0x7F`, 128 is `0x00 0x80`, -129 is `0xFF 0x7F`.
    pub fn encode_integer(&mut self, id: &Asn1Identifier, value: i64) -> LdapResult<()> {
        self.encode_tlv(id, &integer_content(value))
    }

    /// Encode a NULL (no content octets)
    pub fn encode_null(&mut self, id: &Asn1Identifier) -> LdapResult<()> {
        self.encode_tlv(id, &[])
    }

    /// Encode an OCTET STRING (content is copied verbatim)
    pub fn encode_octet_string(&mut self, id: &Asn1Identifier, value: &[u8]) -> LdapResult<()> {
        self.encode_tlv(id, value)
    }

    /// Encode a constructed value (SEQUENCE, SET, or an implicitly tagged one)
    ///
    /// # Encoding Format
    /// - Identifier: `id`
    /// - Length: Total length of all encoded elements
    /// - Value: Concatenated element TLVs, in order
    pub fn encode_constructed(
        &mut self,
        id: &Asn1Identifier,
        elements: &[Box<dyn Asn1Object>],
    ) -> LdapResult<()> {
        let mut content = BerEncoder::new();
        for element in elements {
            element.encode(&mut content)?;
        }
        self.encode_tlv(id, content.as_bytes())
    }

    /// Get the number of encoded bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether nothing has been encoded yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Copy the encoded bytes into an output sink
    pub fn write_to<B: BufMut>(&self, sink: &mut B) {
        sink.put_slice(&self.buffer);
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Minimal two's complement content octets of an integer
pub(crate) fn integer_content(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    // Drop leading octets that only repeat the sign of the next one
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Encode a value into a fresh buffer
pub fn encode(value: &dyn Asn1Object) -> LdapResult<Bytes> {
    let mut encoder = BerEncoder::new();
    value.encode(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Encode a value into a caller-supplied sink
///
/// Nothing is written to `sink` if encoding fails.
pub fn encode_into<B: BufMut>(value: &dyn Asn1Object, sink: &mut B) -> LdapResult<()> {
    let mut encoder = BerEncoder::new();
    value.encode(&mut encoder)?;
    encoder.write_to(sink);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::identifier::universal;
    use crate::types::{Asn1Integer, Asn1OctetString, Asn1Sequence};

    #[test]
    fn test_integer_content_minimal() {
        assert_eq!(integer_content(0), vec![0x00]);
        assert_eq!(integer_content(127), vec![0x7F]);
        assert_eq!(integer_content(128), vec![0x00, 0x80]);
        assert_eq!(integer_content(256), vec![0x01, 0x00]);
        assert_eq!(integer_content(-1), vec![0xFF]);
        assert_eq!(integer_content(-128), vec![0x80]);
        assert_eq!(integer_content(-129), vec![0xFF, 0x7F]);
        assert_eq!(integer_content(i64::MIN), i64::MIN.to_be_bytes().to_vec());
    }

    #[test]
    fn test_encode_integer() {
        let mut encoder = BerEncoder::new();
        encoder
            .encode_integer(&Asn1Identifier::universal(false, universal::INTEGER), 12345)
            .unwrap();
        assert_eq!(encoder.as_bytes(), &[0x02, 0x02, 0x30, 0x39]);
    }

    #[test]
    fn test_encode_octet_string() {
        let mut encoder = BerEncoder::new();
        encoder
            .encode_octet_string(&Asn1Identifier::universal(false, universal::OCTET_STRING), b"Hello")
            .unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(bytes[1], 5);
        assert_eq!(&bytes[2..], b"Hello");
    }

    #[test]
    fn test_encode_length_boundaries() {
        let id = Asn1Identifier::universal(false, universal::OCTET_STRING);

        let mut encoder = BerEncoder::new();
        encoder.encode_octet_string(&id, &[0xAB; 127]).unwrap();
        assert_eq!(&encoder.as_bytes()[..2], &[0x04, 0x7F]);
        assert_eq!(encoder.len(), 2 + 127);

        let mut encoder = BerEncoder::new();
        encoder.encode_octet_string(&id, &[0xAB; 128]).unwrap();
        assert_eq!(&encoder.as_bytes()[..3], &[0x04, 0x81, 0x80]);
        assert_eq!(encoder.len(), 3 + 128);
    }

    #[test]
    fn test_encode_sequence_concatenates_children() {
        let a = Asn1Integer::new(1);
        let b = Asn1OctetString::from("b");
        let c = Asn1Integer::new(300);

        let mut sequence = Asn1Sequence::new();
        sequence.add(a.clone());
        sequence.add(b.clone());
        sequence.add(c.clone());

        let mut children = Vec::new();
        children.extend_from_slice(&encode(&a).unwrap());
        children.extend_from_slice(&encode(&b).unwrap());
        children.extend_from_slice(&encode(&c).unwrap());

        let mut expected = vec![0x30, children.len() as u8];
        expected.extend_from_slice(&children);

        assert_eq!(encode(&sequence).unwrap().as_ref(), expected.as_slice());
    }

    #[test]
    fn test_encode_into_sink() {
        let mut sink = vec![0xEE];
        encode_into(&Asn1Integer::new(5), &mut sink).unwrap();
        assert_eq!(sink, vec![0xEE, 0x02, 0x01, 0x05]);
    }
}
