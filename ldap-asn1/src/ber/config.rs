//! Decoder limits

use serde::{Deserialize, Serialize};

/// Default maximum content length: 16 MiB
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Default maximum number of long form length octets (32-bit lengths)
pub const DEFAULT_MAX_LENGTH_OCTETS: usize = 4;

/// Default maximum nesting depth of constructed values
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied by [`BerDecoder`](super::BerDecoder)
///
/// Every value read from the wire is checked against these limits before any
/// content is consumed. A value beyond a limit fails the decode.
///
/// The struct deserializes with defaults for missing fields, so a host
/// application can embed it in its own configuration file:
///
/// ```text
/// [ber]
/// max_content_length = 1048576
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Largest content length accepted from a length field
    pub max_content_length: usize,
    /// Largest number of octets accepted in a long form length
    pub max_length_octets: usize,
    /// Deepest accepted nesting of constructed values
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_length_octets: DEFAULT_MAX_LENGTH_OCTETS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_content_length, DEFAULT_MAX_CONTENT_LENGTH);
        assert_eq!(config.max_length_octets, DEFAULT_MAX_LENGTH_OCTETS);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
    }

    #[test]
    fn test_config_serialize_round_trip() {
        let config = DecoderConfig {
            max_content_length: 1024,
            max_length_octets: 2,
            max_depth: 4,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<DecoderConfig>(&json).unwrap(), config);
    }
}
