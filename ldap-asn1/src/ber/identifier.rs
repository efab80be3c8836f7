//! BER identifier octets (tag class, constructed flag, tag number)

use bytes::BufMut;
use ldap_core::{LdapError, LdapResult};
use std::fmt;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-wide types, e.g. the LDAP protocol operations
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from the first identifier octet (bits 8-7)
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT",
            TagClass::Private => "PRIVATE",
        };
        f.write_str(name)
    }
}

/// Universal tag numbers used by LDAP
pub mod universal {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const ENUMERATED: u32 = 10;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
}

/// BER identifier
///
/// Names the type of a value on the wire. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the content is a series of nested values
/// - **Tag Number**: 0-30 in the single octet form, larger numbers use the
///   high-tag-number form
///
/// # Encoding Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// High-tag-number form (tag number > 30):
/// ```text
/// First byte:  C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T ... 0 T T T T T T T
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asn1Identifier {
    class: TagClass,
    constructed: bool,
    number: u32,
}

impl Asn1Identifier {
    /// Create a new identifier
    pub const fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class identifier
    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    /// Create an Application class identifier
    pub const fn application(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Application, constructed, number)
    }

    /// Create a Context-specific class identifier
    pub const fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, number)
    }

    /// Create a Private class identifier
    pub const fn private(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Private, constructed, number)
    }

    /// Get tag class
    pub fn class(&self) -> TagClass {
        self.class
    }

    /// Check if the identifier marks a constructed value
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Check class and tag number, ignoring the constructed flag
    pub fn is(&self, class: TagClass, number: u32) -> bool {
        self.class == class && self.number == number
    }

    /// Check for a given universal tag number
    pub fn is_universal(&self, number: u32) -> bool {
        self.is(TagClass::Universal, number)
    }

    /// Number of octets [`encode_into`](Self::encode_into) writes
    pub fn encoded_len(&self) -> usize {
        if self.number <= 30 {
            1
        } else {
            1 + (32 - self.number.leading_zeros() as usize).div_ceil(7)
        }
    }

    /// Encode the identifier octets into `out`
    pub fn encode_into<B: BufMut>(&self, out: &mut B) {
        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            out.put_u8(class_bits | constructed_bit | self.number as u8);
            return;
        }

        out.put_u8(class_bits | constructed_bit | 0x1F);
        let groups = self.encoded_len() - 1;
        for i in (0..groups).rev() {
            let byte = ((self.number >> (i * 7)) & 0x7F) as u8;
            if i > 0 {
                out.put_u8(byte | 0x80);
            } else {
                out.put_u8(byte);
            }
        }
    }

    /// Encode the identifier to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut result);
        result
    }

    /// Decode an identifier from the start of `data`
    ///
    /// # Returns
    /// Returns `Ok((Asn1Identifier, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns error if:
    /// - Buffer is empty or ends inside a high-tag-number form
    /// - The tag number does not fit in 32 bits
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        let first_byte = *data.first().ok_or_else(|| {
            LdapError::Asn1Decoding("Empty buffer for identifier decoding".to_string())
        })?;

        let class = TagClass::from_bits(first_byte);
        let constructed = (first_byte & 0x20) != 0;
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut number = 0u32;
        for (pos, &byte) in data.iter().enumerate().skip(1) {
            if number > (u32::MAX >> 7) {
                return Err(LdapError::Asn1Decoding(
                    "Tag number too large in identifier".to_string(),
                ));
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok((Self::new(class, constructed, number), pos + 1));
            }
        }

        Err(LdapError::Asn1Decoding(
            "Incomplete high-tag-number identifier".to_string(),
        ))
    }
}

impl fmt::Display for Asn1Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.class, self.number)
    }
}
