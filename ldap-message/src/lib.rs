//! LDAP protocol messages and controls
//!
//! This crate assembles LDAP protocol elements (RFC 4511) out of the BER
//! values provided by `ldap-asn1`:
//!
//! - `protocol`: request messages with their fixed application tags, the
//!   referral rebase contract ([`RfcRequest`]) and the message envelope
//! - `controls`: the generic control triple and the server-side sort
//!   controls (RFC 2891)

pub mod controls;
pub mod protocol;

pub use controls::{
    LdapControl, LdapSortControl, LdapSortKey, LdapSortResponse, SortResult, TrailingFieldPolicy,
};
pub use protocol::{
    LdapAttribute, RfcAddRequest, RfcCompareRequest, RfcDelRequest, RfcLdapMessage, RfcRequest,
};
