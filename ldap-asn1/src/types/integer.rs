use crate::ber::{universal, Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// Convert big-endian two's complement content octets to `i64`
fn integer_value(content: &[u8]) -> LdapResult<i64> {
    if content.is_empty() {
        return Err(LdapError::Asn1Decoding("Empty integer encoding".to_string()));
    }

    if content.len() > 8 {
        return Err(LdapError::Asn1Decoding(format!(
            "Integer too large: {} bytes (max 8)",
            content.len()
        )));
    }

    // Seed with the sign so the shifts below sign-extend
    let seed = if content[0] & 0x80 != 0 { -1i64 } else { 0 };
    Ok(content
        .iter()
        .fold(seed, |acc, &byte| (acc << 8) | byte as i64))
}

fn narrow(value: i64) -> LdapResult<i32> {
    i32::try_from(value)
        .map_err(|_| LdapError::InvalidData(format!("Integer {} does not fit in 32 bits", value)))
}

/// Define an integer-valued type: the value is held as `i64` and encoded as
/// minimal two's complement under the type's own universal tag.
macro_rules! integer_type {
    ($(#[$meta:meta])* $name:ident, $tag:expr, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            id: Asn1Identifier,
            value: i64,
        }

        impl $name {
            pub const ID: Asn1Identifier = Asn1Identifier::universal(false, $tag);

            pub fn new(value: i64) -> Self {
                Self { id: Self::ID, value }
            }

            /// Re-tag this value (implicit tagging)
            pub fn with_identifier(mut self, id: Asn1Identifier) -> Self {
                self.id = id;
                self
            }

            /// Build a value from its content octets
            pub fn from_content(id: Asn1Identifier, content: &[u8]) -> LdapResult<Self> {
                Ok(Self {
                    id,
                    value: integer_value(content)?,
                })
            }

            pub fn long_value(&self) -> i64 {
                self.value
            }

            /// Get the value as `i32`, failing if it does not fit
            pub fn int_value(&self) -> LdapResult<i32> {
                narrow(self.value)
            }
        }

        impl Asn1Object for $name {
            fn identifier(&self) -> Asn1Identifier {
                self.id
            }

            fn set_identifier(&mut self, id: Asn1Identifier) {
                self.id = id;
            }

            fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
                encoder.encode_integer(&self.id, self.value)
            }

            fn clone_box(&self) -> Box<dyn Asn1Object> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}: {}", self.id, $label, self.value)
            }
        }
    };
}

integer_type!(
    /// ASN.1 INTEGER (UNIVERSAL 2)
    Asn1Integer,
    universal::INTEGER,
    "INTEGER"
);

integer_type!(
    /// ASN.1 ENUMERATED (UNIVERSAL 10)
    ///
    /// Encoded exactly like an INTEGER under its own universal tag. The set of
    /// named values is the caller's business; the codec accepts any integer.
    Asn1Enumerated,
    universal::ENUMERATED,
    "ENUMERATED"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_value_sign_extension() {
        assert_eq!(integer_value(&[0x00]).unwrap(), 0);
        assert_eq!(integer_value(&[0x7F]).unwrap(), 127);
        assert_eq!(integer_value(&[0x00, 0x80]).unwrap(), 128);
        assert_eq!(integer_value(&[0xFF]).unwrap(), -1);
        assert_eq!(integer_value(&[0xFF, 0x7F]).unwrap(), -129);
        assert_eq!(integer_value(&[0x80, 0, 0, 0, 0, 0, 0, 0]).unwrap(), i64::MIN);
    }

    #[test]
    fn test_integer_value_errors() {
        assert!(integer_value(&[]).is_err());
        assert!(integer_value(&[1; 9]).is_err());
    }

    #[test]
    fn test_enumerated_encoding() {
        assert_eq!(Asn1Enumerated::new(0).to_ber().unwrap().as_ref(), &[0x0A, 0x01, 0x00]);
        assert_eq!(Asn1Enumerated::new(16).to_ber().unwrap().as_ref(), &[0x0A, 0x01, 0x10]);
    }

    #[test]
    fn test_integer_and_enumerated_share_content_rules() {
        let integer = Asn1Integer::from_content(Asn1Integer::ID, &[0xFF, 0x7F]).unwrap();
        let enumerated = Asn1Enumerated::from_content(Asn1Enumerated::ID, &[0xFF, 0x7F]).unwrap();
        assert_eq!(integer.long_value(), enumerated.long_value());
        assert_eq!(integer.to_ber().unwrap()[1..], enumerated.to_ber().unwrap()[1..]);
        assert_eq!(integer.to_string(), "[UNIVERSAL 2] INTEGER: -129");
        assert_eq!(enumerated.to_string(), "[UNIVERSAL 10] ENUMERATED: -129");
        assert!(Asn1Enumerated::from_content(Asn1Enumerated::ID, &[]).is_err());
    }

    #[test]
    fn test_int_value_narrowing() {
        assert_eq!(Asn1Integer::new(-5).int_value().unwrap(), -5);
        assert!(Asn1Integer::new(i64::from(i32::MAX) + 1).int_value().is_err());
        assert_eq!(Asn1Enumerated::new(53).int_value().unwrap(), 53);
        assert!(Asn1Enumerated::new(i64::from(i32::MIN) - 1).int_value().is_err());
    }
}
