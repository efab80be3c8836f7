use thiserror::Error;

/// Main error type for LDAP codec and message operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdapError {
    #[error("ASN.1 decoding error: {0}")]
    Asn1Decoding(String),

    #[error("ASN.1 encoding error: {0}")]
    Asn1Encoding(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for LDAP operations
pub type LdapResult<T> = Result<T, LdapError>;
