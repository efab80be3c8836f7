//! LDAP controls (RFC 4511, section 4.1.11)
//!
//! ```text
//! Control ::= SEQUENCE {
//!      controlType             LDAPOID,
//!      criticality             BOOLEAN DEFAULT FALSE,
//!      controlValue            OCTET STRING OPTIONAL }
//! ```
//!
//! [`LdapControl`] is the raw triple carried in a message. Specific controls
//! (such as the server-side sort controls in [`sort`]) encode their payload
//! into, or decode it from, the control value.

pub mod sort;

pub use sort::{LdapSortControl, LdapSortKey, LdapSortResponse, SortResult, TrailingFieldPolicy};

use crate::protocol::{octet_string_field, string_field};
use ldap_asn1::{Asn1Boolean, Asn1Object, Asn1OctetString, Asn1Sequence};
use ldap_core::{LdapError, LdapResult};
use std::fmt;

/// A control attached to a request or response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapControl {
    oid: String,
    critical: bool,
    value: Option<Vec<u8>>,
}

impl LdapControl {
    /// Create a control
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if `oid` is empty.
    pub fn new(oid: impl Into<String>, critical: bool, value: Option<Vec<u8>>) -> LdapResult<Self> {
        let oid = oid.into();
        if oid.is_empty() {
            return Err(LdapError::InvalidArgument(
                "Control OID must not be empty".to_string(),
            ));
        }
        Ok(Self {
            oid,
            critical,
            value,
        })
    }

    pub fn oid(&self) -> &str {
        &self.oid
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// The raw control value, if present
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Build the `Control` SEQUENCE
    ///
    /// Criticality is omitted when false (DEFAULT FALSE).
    pub fn to_asn1(&self) -> Asn1Sequence {
        let mut sequence = Asn1Sequence::with_capacity(3);
        sequence.add(Asn1OctetString::from(self.oid.as_str()));
        if self.critical {
            sequence.add(Asn1Boolean::new(true));
        }
        if let Some(value) = &self.value {
            sequence.add(Asn1OctetString::new(value.clone()));
        }
        sequence
    }

    /// Read a control out of a decoded `Control` SEQUENCE
    pub fn from_asn1(value: &dyn Asn1Object) -> LdapResult<Self> {
        let sequence = value.downcast_ref::<Asn1Sequence>().ok_or_else(|| {
            LdapError::Asn1Decoding(format!("Control must be a SEQUENCE, got {}", value.identifier()))
        })?;
        let oid = string_field(sequence.get(0), "controlType")?;

        let mut critical = false;
        let mut control_value = None;
        for field in sequence.iter().skip(1) {
            if let Some(flag) = field.downcast_ref::<Asn1Boolean>() {
                if control_value.is_some() {
                    return Err(LdapError::Asn1Decoding(
                        "Control criticality after controlValue".to_string(),
                    ));
                }
                critical = flag.value();
            } else if control_value.is_none() {
                control_value = Some(octet_string_field(Some(field), "controlValue")?.byte_value().to_vec());
            } else {
                return Err(LdapError::Asn1Decoding(format!(
                    "Unexpected control field {}",
                    field.identifier()
                )));
            }
        }

        Self::new(oid, critical, control_value)
            .map_err(|e| LdapError::Asn1Decoding(e.to_string()))
    }
}

impl fmt::Display for LdapControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Control {{ oid: {}, critical: {}, value: {} bytes }}",
            self.oid,
            self.critical,
            self.value.as_ref().map_or(0, Vec::len)
        )
    }
}
