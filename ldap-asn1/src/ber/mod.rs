//! BER (Basic Encoding Rules) encoder and decoder
//!
//! LDAP messages are encoded with a restricted form of BER (RFC 4511,
//! section 5.1). Each value is a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Identifier] [Length] [Content]
//! ```
//!
//! ## Identifier Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! Where:
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 for the high-tag-number form
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): For lengths 0-127
//! - **Long form**: `0x80 | N` followed by N big-endian length bytes
//!
//! Only definite lengths are produced or accepted.
//!
//! ## Content Encoding
//!
//! - **Primitive types**: BOOLEAN, INTEGER, ENUMERATED, OCTET STRING, NULL
//! - **Constructed types**: SEQUENCE and SET, whose content is the
//!   concatenation of their elements' TLVs

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod identifier;
pub mod length;

pub use config::DecoderConfig;
pub use decoder::{decode, decode_all, decode_with_config, BerDecoder};
pub use encoder::{encode, encode_into, BerEncoder};
pub use identifier::{universal, Asn1Identifier, TagClass};
pub use length::BerLength;
