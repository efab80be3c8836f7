//! LDAP protocol messages
//!
//! Every protocol operation is a BER value with a fixed APPLICATION tag
//! (RFC 4511, section 4.2 onwards). Request types here hold their fields as
//! a generic [`Asn1Sequence`] (or, for primitive operations, a single value)
//! and override the identifier with their operation tag.
//!
//! # Request Contract
//!
//! All requests implement [`RfcRequest`], which the operation layer uses to
//! follow referrals: it reads the target name, and builds an independent
//! copy of the request aimed at a new base object.
//!
//! # Example
//!
//! ```rust,no_run
//! use ldap_message::protocol::{LdapAttribute, RfcAddRequest, RfcRequest};
//!
//! let request = RfcAddRequest::new(
//!     "cn=jdoe,ou=people,dc=example,dc=com",
//!     &[LdapAttribute::from_strings("objectClass", &["top", "person"])],
//! );
//! let rebased = request.dup_request(Some("cn=jdoe,ou=people,dc=example,dc=org"), None, true)?;
//! assert_eq!(rebased.request_name()?, "cn=jdoe,ou=people,dc=example,dc=org");
//! # Ok::<(), ldap_core::LdapError>(())
//! ```

mod add_request;
mod attribute;
mod compare_request;
mod del_request;
mod message;

pub use add_request::RfcAddRequest;
pub use attribute::{attribute_list, parse_attribute_list, LdapAttribute};
pub use compare_request::RfcCompareRequest;
pub use del_request::RfcDelRequest;
pub use message::RfcLdapMessage;

use ldap_asn1::{Asn1Object, Asn1OctetString, Asn1Sequence};
use ldap_core::{LdapError, LdapResult};

/// Protocol operation tag numbers (APPLICATION class)
pub mod op {
    pub const BIND_REQUEST: u32 = 0;
    pub const BIND_RESPONSE: u32 = 1;
    pub const UNBIND_REQUEST: u32 = 2;
    pub const SEARCH_REQUEST: u32 = 3;
    pub const SEARCH_RESULT_ENTRY: u32 = 4;
    pub const SEARCH_RESULT_DONE: u32 = 5;
    pub const MODIFY_REQUEST: u32 = 6;
    pub const MODIFY_RESPONSE: u32 = 7;
    pub const ADD_REQUEST: u32 = 8;
    pub const ADD_RESPONSE: u32 = 9;
    pub const DEL_REQUEST: u32 = 10;
    pub const DEL_RESPONSE: u32 = 11;
    pub const MODIFY_DN_REQUEST: u32 = 12;
    pub const MODIFY_DN_RESPONSE: u32 = 13;
    pub const COMPARE_REQUEST: u32 = 14;
    pub const COMPARE_RESPONSE: u32 = 15;
    pub const ABANDON_REQUEST: u32 = 16;
    pub const SEARCH_RESULT_REFERENCE: u32 = 19;
    pub const EXTENDED_REQUEST: u32 = 23;
    pub const EXTENDED_RESPONSE: u32 = 24;
    pub const INTERMEDIATE_RESPONSE: u32 = 25;
}

/// The contract shared by every LDAP request message
///
/// The identifier returned by [`Asn1Object::identifier`] is the request's
/// fixed operation tag, whatever the underlying container reports.
pub trait RfcRequest: Asn1Object {
    /// The target distinguished name of the request
    fn request_name(&self) -> LdapResult<String>;

    /// Build an independent copy of this request
    ///
    /// # Arguments
    /// * `base_dn` - If set, replaces the target name (referral rebase)
    /// * `filter` - Replacement search filter; ignored by requests that
    ///   carry no filter
    /// * `request` - Whether the copy is a request or a search continuation;
    ///   ignored by requests that carry no filter
    fn dup_request(
        &self,
        base_dn: Option<&str>,
        filter: Option<&str>,
        request: bool,
    ) -> LdapResult<Box<dyn RfcRequest>>;
}

/// Read a string field out of a decoded element
pub(crate) fn string_field(element: Option<&dyn Asn1Object>, field: &str) -> LdapResult<String> {
    octet_string_field(element, field)?.string_value()
}

/// Read an OCTET STRING field out of a decoded element
pub(crate) fn octet_string_field<'a>(
    element: Option<&'a dyn Asn1Object>,
    field: &str,
) -> LdapResult<&'a Asn1OctetString> {
    let element = element
        .ok_or_else(|| LdapError::Asn1Decoding(format!("Missing {} field", field)))?;
    element.downcast_ref::<Asn1OctetString>().ok_or_else(|| {
        LdapError::Asn1Decoding(format!(
            "Expected OCTET STRING for {}, got {}",
            field,
            element.identifier()
        ))
    })
}

/// Read a SEQUENCE field out of a decoded element
pub(crate) fn sequence_field<'a>(
    element: Option<&'a dyn Asn1Object>,
    field: &str,
) -> LdapResult<&'a Asn1Sequence> {
    let element = element
        .ok_or_else(|| LdapError::Asn1Decoding(format!("Missing {} field", field)))?;
    element.downcast_ref::<Asn1Sequence>().ok_or_else(|| {
        LdapError::Asn1Decoding(format!(
            "Expected SEQUENCE for {}, got {}",
            field,
            element.identifier()
        ))
    })
}

/// Check the element count of a rebase array
pub(crate) fn check_arity(
    elements: &[Box<dyn Asn1Object>],
    expected: usize,
    request: &str,
) -> LdapResult<()> {
    if elements.len() != expected {
        return Err(LdapError::InvalidArgument(format!(
            "{} expects {} elements, got {}",
            request,
            expected,
            elements.len()
        )));
    }
    Ok(())
}
