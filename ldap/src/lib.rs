//! ldap - Rust implementation of the LDAP protocol codec
//!
//! This library provides the encoding layer of an LDAP client: BER values,
//! protocol messages and controls.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ldap-core`: Error handling, UTF-8 validation and schema qualifiers
//! - `ldap-asn1`: ASN.1 BER encoding/decoding
//! - `ldap-message`: Protocol messages, referral rebase and controls
//!
//! # Usage
//!
//! ```no_run
//! use ldap::asn1::{decode, Asn1Object, Asn1OctetString};
//!
//! let encoded = Asn1OctetString::from("cn").to_ber()?;
//! let (value, consumed) = decode(&encoded)?;
//! assert_eq!(consumed, encoded.len());
//! assert_eq!(value.to_string(), "[UNIVERSAL 4] OCTET STRING: cn");
//! # Ok::<(), ldap::LdapError>(())
//! ```

// Re-export core types
pub use ldap_core::{is_valid_utf8, AttributeQualifier, LdapError, LdapResult};

// Re-export the BER codec
pub mod asn1 {
    pub use ldap_asn1::*;
}

// Re-export protocol messages
pub mod protocol {
    pub use ldap_message::protocol::*;
}

// Re-export controls
pub mod controls {
    pub use ldap_message::controls::*;
}
