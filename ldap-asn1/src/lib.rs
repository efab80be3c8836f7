//! ASN.1 processing for the LDAP protocol
//!
//! This crate provides the BER codec that every LDAP protocol element is
//! built on: the identifier and length octets, the value types (BOOLEAN,
//! INTEGER, ENUMERATED, NULL, OCTET STRING, SEQUENCE, SET and CHOICE), the
//! encoder and the decoder.
//!
//! The codec is synchronous and keeps no state between calls. Decoding reads
//! an immutable buffer, so any number of threads may decode at once.

pub mod ber;
pub mod types;

pub use ber::{
    decode, decode_all, encode, encode_into, Asn1Identifier, BerDecoder, BerEncoder, BerLength,
    DecoderConfig, TagClass,
};
pub use types::{
    Asn1Boolean, Asn1Choice, Asn1Enumerated, Asn1Integer, Asn1Null, Asn1Object, Asn1OctetString,
    Asn1Sequence, Asn1Set,
};
