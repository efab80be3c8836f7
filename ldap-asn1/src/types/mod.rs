//! ASN.1 value types
//!
//! Every value implements [`Asn1Object`]: it has an identifier and can encode
//! itself through a [`BerEncoder`]. Containers ([`Asn1Sequence`],
//! [`Asn1Set`]) hold their elements as `Box<dyn Asn1Object>`, so a single
//! container can mix any concrete types, including protocol messages defined
//! in other crates.
//!
//! # Implicit Tagging
//!
//! LDAP's ASN.1 module uses IMPLICIT TAGS: a context or application tag
//! replaces the universal tag of the underlying type. Any value can be
//! re-tagged with `with_identifier` (builder style) or
//! [`Asn1Object::set_identifier`]; the content encoding is unchanged.

mod boolean;
mod choice;
mod integer;
mod null;
mod octet_string;
mod sequence;

pub use boolean::Asn1Boolean;
pub use choice::Asn1Choice;
pub use integer::{Asn1Enumerated, Asn1Integer};
pub use null::Asn1Null;
pub use octet_string::Asn1OctetString;
pub use sequence::{Asn1Sequence, Asn1Set};

use crate::ber::{Asn1Identifier, BerEncoder};
use bytes::Bytes;
use ldap_core::LdapResult;
use std::any::Any;
use std::fmt;

/// An encodable, identifiable ASN.1 value
pub trait Asn1Object: fmt::Debug + fmt::Display + Send + Sync {
    /// The identifier this value is encoded with
    fn identifier(&self) -> Asn1Identifier;

    /// Replace the identifier (implicit tagging)
    fn set_identifier(&mut self, id: Asn1Identifier);

    /// Append the TLV encoding of this value to `encoder`
    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()>;

    /// Clone this value into a new box
    fn clone_box(&self) -> Box<dyn Asn1Object>;

    /// Access the concrete type, see [`downcast_ref`](trait.Asn1Object.html#method.downcast_ref)
    fn as_any(&self) -> &dyn Any;

    /// Encode this value into a fresh buffer
    fn to_ber(&self) -> LdapResult<Bytes> {
        let mut encoder = BerEncoder::new();
        self.encode(&mut encoder)?;
        Ok(encoder.into_bytes())
    }
}

impl<'a> dyn Asn1Object + 'a {
    /// Get the concrete value if it is a `T`
    pub fn downcast_ref<T: Asn1Object + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check whether the concrete value is a `T`
    pub fn is<T: Asn1Object + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn Asn1Object> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Two values are equal when they encode to the same octets. A value that
/// fails to encode (an empty choice) equals nothing.
impl<'a> PartialEq for dyn Asn1Object + 'a {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.to_ber(), other.to_ber()), (Ok(a), Ok(b)) if a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let value: Box<dyn Asn1Object> = Box::new(Asn1Enumerated::new(3));
        assert!(value.is::<Asn1Enumerated>());
        assert!(!value.is::<Asn1Integer>());
        assert_eq!(value.downcast_ref::<Asn1Enumerated>().unwrap().long_value(), 3);
    }

    #[test]
    fn test_boxed_equality_by_encoding() {
        let a: Box<dyn Asn1Object> = Box::new(Asn1OctetString::from("x"));
        let b: Box<dyn Asn1Object> = Box::new(Asn1OctetString::from("x"));
        let c: Box<dyn Asn1Object> = Box::new(Asn1OctetString::from("y"));
        assert!(a == b);
        assert!(a != c);
        assert!(a == a.clone());
    }
}
