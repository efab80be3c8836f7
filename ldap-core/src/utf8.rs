//! UTF-8 validity checking for LDAP string values
//!
//! LDAP strings travel as OCTET STRINGs whose content is supposed to be
//! UTF-8. The BER layer hands those bytes over verbatim; any code that wants a
//! string view checks them here first.
//!
//! # Accepted Forms
//!
//! The checker follows the original (RFC 2279) definition of UTF-8, which
//! allows sequences of one to six octets:
//!
//! ```text
//! Char. number range  |        UTF-8 octet sequence
//! --------------------+---------------------------------------------
//! 0000 0000-0000 007F | 0xxxxxxx
//! 0000 0080-0000 07FF | 110xxxxx 10xxxxxx
//! 0000 0800-0000 FFFF | 1110xxxx 10xxxxxx 10xxxxxx
//! 0001 0000-001F FFFF | 11110xxx 10xxxxxx 10xxxxxx 10xxxxxx
//! 0020 0000-03FF FFFF | 111110xx 10xxxxxx 10xxxxxx 10xxxxxx 10xxxxxx
//! 0400 0000-3FFF FFFF | 11111100 10xxxxxx ... 10xxxxxx
//! ```
//!
//! A six-octet sequence is only recognized with the lead byte 0xFC; 0xFD,
//! 0xFE and 0xFF never start a sequence.
//!
//! Overlong sequences (a value encoded with more octets than it needs) are
//! rejected. Surrogate code points and values above U+10FFFF are not.

/// Masks applied to the lead byte and the first continuation byte of a
/// sequence with `k` continuation bytes (indexed by `k`). If both masked
/// values are zero, the encoded value fits in fewer octets and the sequence
/// is overlong.
const LOWER_BOUND_MASK: [[u8; 2]; 6] = [
    [0x00, 0x00],
    [0x1E, 0x00],
    [0x0F, 0x20],
    [0x07, 0x30],
    [0x02, 0x38],
    [0x01, 0x3C],
];

const CONTINUATION_MASK: u8 = 0xC0;
const CONTINUATION_RESULT: u8 = 0x80;

/// Number of continuation bytes announced by a lead byte, or `None` if the
/// byte cannot start a sequence.
fn continuation_count(lead: u8) -> Option<usize> {
    if lead < 0x80 {
        Some(0)
    } else if lead & 0xE0 == 0xC0 {
        Some(1)
    } else if lead & 0xF0 == 0xE0 {
        Some(2)
    } else if lead & 0xF8 == 0xF0 {
        Some(3)
    } else if lead & 0xFC == 0xF8 {
        Some(4)
    } else if lead == 0xFC {
        Some(5)
    } else {
        None
    }
}

/// Check whether `bytes` is a valid UTF-8 sequence
///
/// # Arguments
/// * `bytes` - The octets to check
/// * `ucs2_only` - If `true`, reject any character that needs three or more
///   continuation bytes, i.e. anything outside the 16-bit UCS-2 range
///
/// # Returns
/// `true` if every character in the buffer is well formed. A `false` result
/// is a normal outcome, not an error: the caller decides what an invalid
/// string means in its context.
pub fn is_valid_utf8(bytes: &[u8], ucs2_only: bool) -> bool {
    let mut index = 0;

    while index < bytes.len() {
        let count = match continuation_count(bytes[index]) {
            Some(0) => {
                index += 1;
                continue;
            }
            Some(count) => count,
            None => return false,
        };

        if index + count >= bytes.len() || (ucs2_only && count >= 3) {
            return false;
        }

        let [lead_mask, next_mask] = LOWER_BOUND_MASK[count];
        if bytes[index] & lead_mask == 0 && bytes[index + 1] & next_mask == 0 {
            return false;
        }

        if bytes[index + 1..=index + count]
            .iter()
            .any(|b| b & CONTINUATION_MASK != CONTINUATION_RESULT)
        {
            return false;
        }

        index += count + 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ascii_and_empty() {
        assert!(is_valid_utf8(b"", false));
        assert!(is_valid_utf8(b"cn=admin,o=example", false));
    }

    #[test]
    fn test_two_byte_sequence() {
        // U+00A9 COPYRIGHT SIGN
        assert!(is_valid_utf8(&[0xC2, 0xA9], false));
        assert!(is_valid_utf8(&[0xC2, 0xA9], true));
    }

    #[test]
    fn test_overlong_nul_rejected() {
        assert!(!is_valid_utf8(&[0xC0, 0x80], false));
    }

    #[test]
    fn test_overlong_three_byte_rejected() {
        // U+007F spelled with three octets
        assert!(!is_valid_utf8(&[0xE0, 0x81, 0xBF], false));
    }

    #[test]
    fn test_truncated_sequence_rejected() {
        // Three-byte lead with only one trailing byte
        assert!(!is_valid_utf8(&[0xE2, 0x82], false));
        assert!(!is_valid_utf8(&[b'a', 0xC2], false));
    }

    #[test]
    fn test_bad_continuation_rejected() {
        assert!(!is_valid_utf8(&[0xC2, 0x41], false));
        assert!(!is_valid_utf8(&[0xE2, 0x82, 0xC0], false));
    }

    #[test]
    fn test_stray_continuation_rejected() {
        assert!(!is_valid_utf8(&[0x80], false));
        assert!(!is_valid_utf8(&[0xFE], false));
        assert!(!is_valid_utf8(&[0xFF], false));
    }

    #[test]
    fn test_six_byte_lead_is_fc_only() {
        assert_eq!(continuation_count(0xFC), Some(5));
        assert_eq!(continuation_count(0xFD), None);
        assert!(!is_valid_utf8(&[0xFD, 0x80, 0x80, 0x80, 0x80, 0x80], false));
        assert!(!is_valid_utf8(&[0xFD, 0xBF, 0xBF, 0xBF, 0xBF, 0xBF], false));
    }

    #[test]
    fn test_ucs2_restriction() {
        // U+20AC EURO SIGN, three octets, still UCS-2
        let euro = [0xE2, 0x82, 0xAC];
        assert!(is_valid_utf8(&euro, true));

        // U+1F600, four octets
        let emoji = [0xF0, 0x9F, 0x98, 0x80];
        assert!(is_valid_utf8(&emoji, false));
        assert!(!is_valid_utf8(&emoji, true));
    }

    #[test]
    fn test_legacy_five_and_six_byte_sequences() {
        // U+200000 as five octets, U+4000000 as six octets
        assert!(is_valid_utf8(&[0xF8, 0x88, 0x80, 0x80, 0x80], false));
        assert!(is_valid_utf8(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80], false));
        assert!(!is_valid_utf8(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80], true));
        // Overlong six-octet form
        assert!(!is_valid_utf8(&[0xFC, 0x80, 0x80, 0x80, 0x80, 0x80], false));
    }

    proptest! {
        #[test]
        fn prop_accepts_every_rust_string(s in any::<String>()) {
            prop_assert!(is_valid_utf8(s.as_bytes(), false));
        }

        #[test]
        fn prop_accepts_bmp_strings_as_ucs2(s in "[\\u{0}-\\u{D7FF}\\u{E000}-\\u{FFFF}]*") {
            prop_assert!(is_valid_utf8(s.as_bytes(), true));
        }
    }
}
