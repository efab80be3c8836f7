//! BER decoder for ASN.1 values
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ldap_asn1::ber::decode;
//! use ldap_asn1::types::Asn1Sequence;
//!
//! let data = [0x30, 0x03, 0x02, 0x01, 0x05];
//! let (value, consumed) = decode(&data)?;
//! assert_eq!(consumed, data.len());
//! assert!(value.is::<Asn1Sequence>());
//! # Ok::<(), ldap_core::LdapError>(())
//! ```

use crate::ber::config::DecoderConfig;
use crate::ber::identifier::{universal, Asn1Identifier, TagClass};
use crate::ber::length::BerLength;
use crate::types::{
    Asn1Boolean, Asn1Enumerated, Asn1Integer, Asn1Null, Asn1Object, Asn1OctetString, Asn1Sequence,
    Asn1Set,
};
use ldap_core::{LdapError, LdapResult};

/// BER decoder for ASN.1 values
///
/// Reads TLV (Tag-Length-Value) triplets from a byte buffer and builds the
/// matching value tree. The concrete type of each value is chosen from its
/// identifier:
///
/// | Identifier | Value |
/// |---|---|
/// | UNIVERSAL 1 | [`Asn1Boolean`] |
/// | UNIVERSAL 2 | [`Asn1Integer`] |
/// | UNIVERSAL 4 | [`Asn1OctetString`] |
/// | UNIVERSAL 5 | [`Asn1Null`] |
/// | UNIVERSAL 10 | [`Asn1Enumerated`] |
/// | UNIVERSAL 16 (constructed) | [`Asn1Sequence`] |
/// | UNIVERSAL 17 (constructed) | [`Asn1Set`] |
/// | other class, constructed | [`Asn1Sequence`] carrying that identifier |
/// | other class, primitive | [`Asn1OctetString`] carrying that identifier |
///
/// Any other universal tag fails the decode.
///
/// # Position Tracking
///
/// The decoder keeps a position that advances as values are decoded, so
/// several values can be read from the same buffer in turn.
#[derive(Debug)]
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
    config: DecoderConfig,
    depth: usize,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder with the default limits
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, DecoderConfig::default())
    }

    /// Create a new BER decoder with explicit limits
    pub fn with_config(buffer: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            buffer,
            position: 0,
            config,
            depth: 0,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Read `count` bytes, never past the end of the buffer
    fn read_bytes(&mut self, count: usize) -> LdapResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(LdapError::Asn1Decoding(format!(
                "Buffer exhausted: need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode one TLV (Tag-Length-Value) triplet
    ///
    /// # Returns
    /// Returns `Ok((identifier, content))` if successful. The position is
    /// left just past the content.
    ///
    /// # Error Handling
    /// Returns error if the identifier or length octets are malformed, the
    /// length exceeds the configured maximum, or the buffer holds fewer
    /// content octets than the length announces.
    pub fn decode_tlv(&mut self) -> LdapResult<(Asn1Identifier, &'a [u8])> {
        let (id, id_bytes) = Asn1Identifier::decode(&self.buffer[self.position..])?;
        self.position += id_bytes;

        let (length, length_bytes) =
            BerLength::decode(&self.buffer[self.position..], self.config.max_length_octets)
                .map_err(|e| in_context(e, &id, "length"))?;
        self.position += length_bytes;

        if length.value() > self.config.max_content_length {
            return Err(LdapError::Asn1Decoding(format!(
                "{} content length {} exceeds limit {}",
                id,
                length.value(),
                self.config.max_content_length
            )));
        }

        let content = self
            .read_bytes(length.value())
            .map_err(|e| in_context(e, &id, "content"))?;
        Ok((id, content))
    }

    /// Decode the next value
    pub fn decode_value(&mut self) -> LdapResult<Box<dyn Asn1Object>> {
        let (id, content) = self.decode_tlv()?;
        self.build(id, content)
    }

    /// Construct the concrete value for `id` from its content octets
    fn build(&self, id: Asn1Identifier, content: &[u8]) -> LdapResult<Box<dyn Asn1Object>> {
        if id.class() != TagClass::Universal {
            return if id.is_constructed() {
                Ok(Box::new(
                    Asn1Sequence::from_elements(self.decode_children(&id, content)?)
                        .with_identifier(id),
                ))
            } else {
                Ok(Box::new(Asn1OctetString::from_content(id, content)))
            };
        }

        let expects_constructed = matches!(id.number(), universal::SEQUENCE | universal::SET);
        if id.is_constructed() != expects_constructed {
            return Err(LdapError::Asn1Decoding(format!(
                "{} must be {}",
                id,
                if expects_constructed { "constructed" } else { "primitive" }
            )));
        }

        let value: Box<dyn Asn1Object> = match id.number() {
            universal::BOOLEAN => Box::new(Asn1Boolean::from_content(id, content)?),
            universal::INTEGER => Box::new(Asn1Integer::from_content(id, content)?),
            universal::OCTET_STRING => Box::new(Asn1OctetString::from_content(id, content)),
            universal::NULL => Box::new(Asn1Null::from_content(id, content)?),
            universal::ENUMERATED => Box::new(Asn1Enumerated::from_content(id, content)?),
            universal::SEQUENCE => Box::new(Asn1Sequence::from_elements(
                self.decode_children(&id, content)?,
            )),
            universal::SET => Box::new(Asn1Set::from_elements(self.decode_children(&id, content)?)),
            number => {
                return Err(LdapError::Asn1Decoding(format!(
                    "Unrecognized universal tag {}",
                    number
                )));
            }
        };
        Ok(value)
    }

    /// Decode the content of a constructed value until it is exhausted
    fn decode_children(
        &self,
        id: &Asn1Identifier,
        content: &[u8],
    ) -> LdapResult<Vec<Box<dyn Asn1Object>>> {
        if self.depth >= self.config.max_depth {
            return Err(LdapError::Asn1Decoding(format!(
                "{} nested deeper than {} levels",
                id, self.config.max_depth
            )));
        }

        let mut child = BerDecoder {
            buffer: content,
            position: 0,
            config: self.config,
            depth: self.depth + 1,
        };

        let mut elements = Vec::new();
        while child.has_remaining() {
            let offset = child.position();
            let element = child
                .decode_value()
                .map_err(|e| in_context(e, id, &format!("element {} at offset {}", elements.len(), offset)))?;
            elements.push(element);
        }
        Ok(elements)
    }
}

/// Prefix a decoding error with the structural step that failed
fn in_context(error: LdapError, id: &Asn1Identifier, step: &str) -> LdapError {
    match error {
        LdapError::Asn1Decoding(message) => {
            LdapError::Asn1Decoding(format!("{} {}: {}", id, step, message))
        }
        other => other,
    }
}

/// Decode one value from the start of `data`
///
/// # Returns
/// Returns `Ok((value, bytes_consumed))`. Bytes after the first value are
/// left untouched, so a transport can feed a buffer holding more than one
/// message.
///
/// # Error Handling
/// Returns `Asn1Decoding` if `data` is empty or malformed.
pub fn decode(data: &[u8]) -> LdapResult<(Box<dyn Asn1Object>, usize)> {
    decode_with_config(data, DecoderConfig::default())
}

/// Decode one value from the start of `data` with explicit limits
pub fn decode_with_config(
    data: &[u8],
    config: DecoderConfig,
) -> LdapResult<(Box<dyn Asn1Object>, usize)> {
    if data.is_empty() {
        return Err(LdapError::Asn1Decoding("Empty input buffer".to_string()));
    }

    let mut decoder = BerDecoder::with_config(data, config);
    match decoder.decode_value() {
        Ok(value) => Ok((value, decoder.position())),
        Err(e) => {
            log::debug!("BER decode of {} bytes failed: {}", data.len(), e);
            Err(e)
        }
    }
}

/// Decode every value in `data`, back to back
pub fn decode_all(data: &[u8]) -> LdapResult<Vec<Box<dyn Asn1Object>>> {
    if data.is_empty() {
        return Err(LdapError::Asn1Decoding("Empty input buffer".to_string()));
    }

    let mut decoder = BerDecoder::new(data);
    let mut values = Vec::new();
    while decoder.has_remaining() {
        let offset = decoder.position();
        let value = decoder.decode_value().map_err(|e| {
            log::debug!("BER decode failed at offset {}: {}", offset, e);
            e
        })?;
        values.push(value);
    }
    Ok(values)
}
