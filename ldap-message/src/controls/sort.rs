//! Server-side sorting controls (RFC 2891)
//!
//! ```text
//! SortKeyList ::= SEQUENCE OF SEQUENCE {
//!      attributeType   AttributeDescription,
//!      orderingRule    [0] MatchingRuleId OPTIONAL,
//!      reverseOrder    [1] BOOLEAN DEFAULT FALSE }
//!
//! SortResult ::= SEQUENCE {
//!      sortResult  ENUMERATED { ... },
//!      attributeType [0] AttributeDescription OPTIONAL }
//! ```

use super::LdapControl;
use ldap_asn1::{
    decode, Asn1Boolean, Asn1Enumerated, Asn1Identifier, Asn1Object, Asn1OctetString,
    Asn1Sequence,
};
use ldap_core::{LdapError, LdapResult};
use std::fmt;

/// Sort request control OID
pub const SORT_REQUEST_OID: &str = "1.2.840.113556.1.4.473";

/// Sort response control OID
pub const SORT_RESPONSE_OID: &str = "1.2.840.113556.1.4.474";

const ORDERING_RULE_ID: Asn1Identifier = Asn1Identifier::context_specific(false, 0);
const REVERSE_ORDER_ID: Asn1Identifier = Asn1Identifier::context_specific(false, 1);

/// One key of a sort request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSortKey {
    key: String,
    reverse: bool,
    matching_rule: Option<String>,
}

impl LdapSortKey {
    pub fn new(key: impl Into<String>, reverse: bool, matching_rule: Option<String>) -> Self {
        Self {
            key: key.into(),
            reverse,
            matching_rule,
        }
    }

    /// Parse the `[-]attribute[:matchingRule]` shorthand
    ///
    /// A leading `-` requests reverse order.
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if the attribute or the matching rule is
    /// empty.
    pub fn parse(shorthand: &str) -> LdapResult<Self> {
        let shorthand = shorthand.trim();
        let (reverse, rest) = match shorthand.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, shorthand),
        };
        let (key, matching_rule) = match rest.split_once(':') {
            Some((_, "")) => {
                return Err(LdapError::InvalidArgument(format!(
                    "Empty matching rule in sort key {:?}",
                    shorthand
                )));
            }
            Some((key, rule)) => (key, Some(rule.to_string())),
            None => (rest, None),
        };
        if key.is_empty() {
            return Err(LdapError::InvalidArgument(format!(
                "Empty attribute in sort key {:?}",
                shorthand
            )));
        }
        Ok(Self::new(key, reverse, matching_rule))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn matching_rule(&self) -> Option<&str> {
        self.matching_rule.as_deref()
    }

    fn to_asn1(&self) -> Asn1Sequence {
        let mut sequence = Asn1Sequence::with_capacity(3);
        sequence.add(Asn1OctetString::from(self.key.as_str()));
        if let Some(rule) = &self.matching_rule {
            sequence.add(Asn1OctetString::from(rule.as_str()).with_identifier(ORDERING_RULE_ID));
        }
        if self.reverse {
            sequence.add(Asn1Boolean::new(true).with_identifier(REVERSE_ORDER_ID));
        }
        sequence
    }
}

impl fmt::Display for LdapSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            f.write_str("-")?;
        }
        f.write_str(&self.key)?;
        if let Some(rule) = &self.matching_rule {
            write!(f, ":{}", rule)?;
        }
        Ok(())
    }
}

/// Server-side sort request control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSortControl {
    keys: Vec<LdapSortKey>,
    critical: bool,
}

impl LdapSortControl {
    /// Create a sort request
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if `keys` is empty.
    pub fn new(keys: Vec<LdapSortKey>, critical: bool) -> LdapResult<Self> {
        if keys.is_empty() {
            return Err(LdapError::InvalidArgument(
                "Sort control needs at least one key".to_string(),
            ));
        }
        Ok(Self { keys, critical })
    }

    pub fn keys(&self) -> &[LdapSortKey] {
        &self.keys
    }

    /// Encode the `SortKeyList` payload
    pub fn encode_value(&self) -> LdapResult<Vec<u8>> {
        let mut list = Asn1Sequence::with_capacity(self.keys.len());
        for key in &self.keys {
            list.add(key.to_asn1());
        }
        Ok(list.to_ber()?.to_vec())
    }

    /// Build the control to attach to a search request
    pub fn to_control(&self) -> LdapResult<LdapControl> {
        LdapControl::new(SORT_REQUEST_OID, self.critical, Some(self.encode_value()?))
    }
}

/// Result codes of a sort response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortResult {
    Success,
    OperationsError,
    TimeLimitExceeded,
    StrongAuthRequired,
    AdminLimitExceeded,
    NoSuchAttribute,
    InappropriateMatching,
    InsufficientAccessRights,
    Busy,
    UnwillingToPerform,
    Other,
}

impl SortResult {
    /// Get the protocol value
    pub fn value(self) -> i32 {
        match self {
            SortResult::Success => 0,
            SortResult::OperationsError => 1,
            SortResult::TimeLimitExceeded => 3,
            SortResult::StrongAuthRequired => 8,
            SortResult::AdminLimitExceeded => 11,
            SortResult::NoSuchAttribute => 16,
            SortResult::InappropriateMatching => 18,
            SortResult::InsufficientAccessRights => 50,
            SortResult::Busy => 51,
            SortResult::UnwillingToPerform => 53,
            SortResult::Other => 80,
        }
    }
}

impl TryFrom<i32> for SortResult {
    type Error = LdapError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SortResult::Success),
            1 => Ok(SortResult::OperationsError),
            3 => Ok(SortResult::TimeLimitExceeded),
            8 => Ok(SortResult::StrongAuthRequired),
            11 => Ok(SortResult::AdminLimitExceeded),
            16 => Ok(SortResult::NoSuchAttribute),
            18 => Ok(SortResult::InappropriateMatching),
            50 => Ok(SortResult::InsufficientAccessRights),
            51 => Ok(SortResult::Busy),
            53 => Ok(SortResult::UnwillingToPerform),
            80 => Ok(SortResult::Other),
            _ => Err(LdapError::InvalidData(format!(
                "Unknown sort result code: {}",
                value
            ))),
        }
    }
}

/// What to do with a trailing sort response field of the wrong type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingFieldPolicy {
    /// Treat it as absent and log a warning
    #[default]
    Permissive,
    /// Fail the decode
    Strict,
}

/// Server-side sort response control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapSortResponse {
    oid: String,
    critical: bool,
    result_code: i32,
    failed_attribute: Option<String>,
}

impl LdapSortResponse {
    /// Decode a sort response from its control payload, with the
    /// permissive trailing field policy
    pub fn new(oid: &str, critical: bool, value: &[u8]) -> LdapResult<Self> {
        Self::with_policy(oid, critical, value, TrailingFieldPolicy::Permissive)
    }

    /// Decode a sort response from its control payload
    ///
    /// # Error Handling
    /// Returns `Asn1Decoding` if the payload is not a SEQUENCE whose first
    /// element is an ENUMERATED, or (with [`TrailingFieldPolicy::Strict`])
    /// if a second element is present but not an OCTET STRING.
    pub fn with_policy(
        oid: &str,
        critical: bool,
        value: &[u8],
        policy: TrailingFieldPolicy,
    ) -> LdapResult<Self> {
        let (decoded, _) = decode(value)?;
        let sequence = decoded
            .downcast_ref::<Asn1Sequence>()
            .filter(|s| s.identifier() == Asn1Sequence::ID)
            .ok_or_else(|| {
                LdapError::Asn1Decoding(format!(
                    "Sort response must be a SEQUENCE, got {}",
                    decoded.identifier()
                ))
            })?;

        let result_code = sequence
            .get(0)
            .and_then(|v| v.downcast_ref::<Asn1Enumerated>())
            .ok_or_else(|| {
                LdapError::Asn1Decoding("Sort response has no ENUMERATED result".to_string())
            })?
            .int_value()
            .map_err(|e| LdapError::Asn1Decoding(format!("Sort response result: {}", e)))?;

        let failed_attribute = match sequence.get(1) {
            None => None,
            Some(field) => match field.downcast_ref::<Asn1OctetString>() {
                Some(attribute) => Some(attribute.string_value()?),
                None if policy == TrailingFieldPolicy::Strict => {
                    return Err(LdapError::Asn1Decoding(format!(
                        "Sort response attributeType has wrong type {}",
                        field.identifier()
                    )));
                }
                None => {
                    log::warn!(
                        "Ignoring sort response attributeType of type {}",
                        field.identifier()
                    );
                    None
                }
            },
        };

        Ok(Self {
            oid: oid.to_string(),
            critical,
            result_code,
            failed_attribute,
        })
    }

    /// Decode a sort response out of a received control
    pub fn from_control(control: &LdapControl) -> LdapResult<Self> {
        let value = control.value().ok_or_else(|| {
            LdapError::Asn1Decoding("Sort response control has no value".to_string())
        })?;
        Self::new(control.oid(), control.is_critical(), value)
    }

    pub fn oid(&self) -> &str {
        &self.oid
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// The raw result code
    pub fn result_code(&self) -> i32 {
        self.result_code
    }

    /// The result code, if it is one RFC 2891 names
    pub fn sort_result(&self) -> Option<SortResult> {
        SortResult::try_from(self.result_code).ok()
    }

    /// The attribute that caused the failure, if the server named one
    pub fn failed_attribute(&self) -> Option<&str> {
        self.failed_attribute.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldap_asn1::Asn1Integer;

    fn payload(elements: Vec<Box<dyn Asn1Object>>) -> Vec<u8> {
        Asn1Sequence::from_elements(elements).to_ber().unwrap().to_vec()
    }

    #[test]
    fn test_success_without_attribute() {
        let value = payload(vec![Box::new(Asn1Enumerated::new(0))]);
        assert_eq!(value, vec![0x30, 0x03, 0x0A, 0x01, 0x00]);

        let response = LdapSortResponse::new(SORT_RESPONSE_OID, false, &value).unwrap();
        assert_eq!(response.result_code(), 0);
        assert_eq!(response.sort_result(), Some(SortResult::Success));
        assert_eq!(response.failed_attribute(), None);
    }

    #[test]
    fn test_failure_with_attribute() {
        let value = payload(vec![
            Box::new(Asn1Enumerated::new(16)),
            Box::new(Asn1OctetString::from("cn")),
        ]);
        let response = LdapSortResponse::new(SORT_RESPONSE_OID, false, &value).unwrap();
        assert_eq!(response.result_code(), 16);
        assert_eq!(response.sort_result(), Some(SortResult::NoSuchAttribute));
        assert_eq!(response.failed_attribute(), Some("cn"));
    }

    #[test]
    fn test_context_tagged_attribute() {
        // attributeType [0] as servers send it
        let value = [0x30, 0x07, 0x0A, 0x01, 0x12, 0x80, 0x02, b's', b'n'];
        let response = LdapSortResponse::new(SORT_RESPONSE_OID, true, &value).unwrap();
        assert_eq!(response.sort_result(), Some(SortResult::InappropriateMatching));
        assert_eq!(response.failed_attribute(), Some("sn"));
        assert!(response.is_critical());
    }

    #[test]
    fn test_first_element_must_be_enumerated() {
        let value = payload(vec![Box::new(Asn1OctetString::from("cn"))]);
        assert!(matches!(
            LdapSortResponse::new(SORT_RESPONSE_OID, false, &value),
            Err(LdapError::Asn1Decoding(_))
        ));

        let value = payload(vec![Box::new(Asn1Integer::new(0))]);
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &value).is_err());

        let empty = payload(Vec::new());
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &empty).is_err());
    }

    #[test]
    fn test_payload_must_be_sequence() {
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &[]).is_err());
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &[0x0A, 0x01, 0x00]).is_err());
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &[0x31, 0x03, 0x0A, 0x01, 0x00]).is_err());
        assert!(LdapSortResponse::new(SORT_RESPONSE_OID, false, &[0x30, 0x05, 0x0A]).is_err());
    }

    #[test]
    fn test_trailing_field_policy() {
        let value = payload(vec![
            Box::new(Asn1Enumerated::new(53)),
            Box::new(Asn1Integer::new(7)),
        ]);

        let permissive = LdapSortResponse::new(SORT_RESPONSE_OID, false, &value).unwrap();
        assert_eq!(permissive.result_code(), 53);
        assert_eq!(permissive.failed_attribute(), None);

        assert!(matches!(
            LdapSortResponse::with_policy(
                SORT_RESPONSE_OID,
                false,
                &value,
                TrailingFieldPolicy::Strict
            ),
            Err(LdapError::Asn1Decoding(_))
        ));
        assert_eq!(TrailingFieldPolicy::default(), TrailingFieldPolicy::Permissive);
    }

    #[test]
    fn test_oversized_result_code_is_decoding_error() {
        let value = payload(vec![Box::new(Asn1Enumerated::new(i64::from(i32::MAX) + 1))]);
        assert!(matches!(
            LdapSortResponse::new(SORT_RESPONSE_OID, false, &value),
            Err(LdapError::Asn1Decoding(_))
        ));
    }

    #[test]
    fn test_unknown_result_code_kept() {
        let value = payload(vec![Box::new(Asn1Enumerated::new(2))]);
        let response = LdapSortResponse::new(SORT_RESPONSE_OID, false, &value).unwrap();
        assert_eq!(response.result_code(), 2);
        assert_eq!(response.sort_result(), None);
    }

    #[test]
    fn test_from_control() {
        let value = payload(vec![Box::new(Asn1Enumerated::new(51))]);
        let control = LdapControl::new(SORT_RESPONSE_OID, false, Some(value)).unwrap();
        let response = LdapSortResponse::from_control(&control).unwrap();
        assert_eq!(response.oid(), SORT_RESPONSE_OID);
        assert_eq!(response.sort_result(), Some(SortResult::Busy));

        let bare = LdapControl::new(SORT_RESPONSE_OID, false, None).unwrap();
        assert!(LdapSortResponse::from_control(&bare).is_err());
    }

    #[test]
    fn test_sort_key_parse() {
        let key = LdapSortKey::parse("-cn:caseExactOrderingMatch").unwrap();
        assert_eq!(key.key(), "cn");
        assert!(key.is_reverse());
        assert_eq!(key.matching_rule(), Some("caseExactOrderingMatch"));
        assert_eq!(key.to_string(), "-cn:caseExactOrderingMatch");

        let key = LdapSortKey::parse("sn").unwrap();
        assert!(!key.is_reverse());
        assert_eq!(key.matching_rule(), None);

        assert!(LdapSortKey::parse("-").is_err());
        assert!(LdapSortKey::parse("cn:").is_err());
    }

    #[test]
    fn test_sort_control_encoding() {
        let control = LdapSortControl::new(
            vec![
                LdapSortKey::parse("sn").unwrap(),
                LdapSortKey::parse("-cn:r").unwrap(),
            ],
            true,
        )
        .unwrap();
        assert_eq!(
            control.encode_value().unwrap(),
            vec![
                0x30, 0x12, // SortKeyList
                0x30, 0x04, 0x04, 0x02, b's', b'n', // sn
                0x30, 0x0A, 0x04, 0x02, b'c', b'n', 0x80, 0x01, b'r', 0x81, 0x01, 0xFF,
            ]
        );

        let control = control.to_control().unwrap();
        assert_eq!(control.oid(), SORT_REQUEST_OID);
        assert!(control.is_critical());

        assert!(LdapSortControl::new(Vec::new(), false).is_err());
    }

    #[test]
    fn test_sort_result_values() {
        for code in [0, 1, 3, 8, 11, 16, 18, 50, 51, 53, 80] {
            assert_eq!(SortResult::try_from(code).unwrap().value(), code);
        }
        assert!(SortResult::try_from(4).is_err());
    }
}
