//! BER length octets

use bytes::BufMut;
use ldap_core::{LdapError, LdapResult};

/// BER Length encoding
///
/// BER length can be encoded in two forms:
/// - **Short form**: For lengths 0-127 (1 byte)
/// - **Long form**: For lengths > 127 (one byte announcing N, then N bytes)
///
/// # Encoding Format
///
/// Short form:
/// ```text
/// Byte: 0 L L L L L L L
/// ```
///
/// Long form:
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: L L L L L L L L  (big-endian length value)
/// ```
///
/// The indefinite form (`0x80`) is never produced and is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length > 127, encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Create a new BER length, choosing the short form whenever it fits
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Get the length value
    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Number of big-endian octets following the first byte in long form
    fn long_form_octets(length: usize) -> usize {
        let bits = usize::BITS - length.leading_zeros();
        (bits as usize).div_ceil(8).max(1)
    }

    /// Number of octets [`encode_into`](Self::encode_into) writes
    pub fn encoded_len(&self) -> usize {
        match self {
            BerLength::Short(_) => 1,
            BerLength::Long(length) => 1 + Self::long_form_octets(*length),
        }
    }

    /// Encode the length octets into `out`
    pub fn encode_into<B: BufMut>(&self, out: &mut B) {
        match self {
            BerLength::Short(length) => out.put_u8(*length),
            BerLength::Long(length) => {
                let num_bytes = Self::long_form_octets(*length);
                out.put_u8(0x80 | num_bytes as u8);
                for i in (0..num_bytes).rev() {
                    out.put_u8((*length >> (i * 8)) as u8);
                }
            }
        }
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut result);
        result
    }

    /// Decode length from the start of `data`
    ///
    /// # Arguments
    /// * `data` - Buffer positioned at the first length octet
    /// * `max_octets` - Largest accepted N in the long form
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns error if:
    /// - Buffer is too short
    /// - The length uses the indefinite form
    /// - The long form announces more than `max_octets` octets
    pub fn decode(data: &[u8], max_octets: usize) -> LdapResult<(Self, usize)> {
        let first_byte = *data.first().ok_or_else(|| {
            LdapError::Asn1Decoding("Empty buffer for length decoding".to_string())
        })?;

        if first_byte & 0x80 == 0 {
            return Ok((BerLength::Short(first_byte), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(LdapError::Asn1Decoding(
                "Indefinite length encoding not supported".to_string(),
            ));
        }

        let limit = max_octets.min(size_of::<usize>());
        if num_bytes > limit {
            return Err(LdapError::Asn1Decoding(format!(
                "Length encoding too large: {} bytes (max {})",
                num_bytes, limit
            )));
        }

        if data.len() < 1 + num_bytes {
            return Err(LdapError::Asn1Decoding(format!(
                "Buffer too short for long form length: need {} bytes, got {}",
                1 + num_bytes,
                data.len()
            )));
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok((BerLength::new(length), 1 + num_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_short_form_boundary() {
        assert_eq!(BerLength::new(0).encode(), vec![0x00]);
        assert_eq!(BerLength::new(127).encode(), vec![0x7F]);
    }

    #[test]
    fn test_length_long_form_boundary() {
        assert_eq!(BerLength::new(128).encode(), vec![0x81, 0x80]);
        assert_eq!(BerLength::new(255).encode(), vec![0x81, 0xFF]);
        assert_eq!(BerLength::new(256).encode(), vec![0x82, 0x01, 0x00]);
        assert_eq!(BerLength::new(0x010000).encode(), vec![0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_length_encoded_len() {
        assert_eq!(BerLength::new(127).encoded_len(), 1);
        assert_eq!(BerLength::new(128).encoded_len(), 2);
        assert_eq!(BerLength::new(1000).encoded_len(), 3);
    }

    #[test]
    fn test_length_decode() {
        assert_eq!(BerLength::decode(&[100], 4).unwrap(), (BerLength::Short(100), 1));
        let (length, consumed) = BerLength::decode(&[0x82, 0x03, 0xE8], 4).unwrap();
        assert_eq!(length.value(), 1000);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_length_decode_errors() {
        assert!(BerLength::decode(&[], 4).is_err());
        assert!(BerLength::decode(&[0x80], 4).is_err());
        assert!(BerLength::decode(&[0x82, 0x01], 4).is_err());
        assert!(BerLength::decode(&[0x85, 1, 2, 3, 4, 5], 4).is_err());
    }
}
