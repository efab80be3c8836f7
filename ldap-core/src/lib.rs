//! Core types and utilities for the LDAP protocol client
//!
//! This crate provides the error type shared by every layer of the stack,
//! the UTF-8 validity checker that guards string extraction from decoded
//! octet strings, and the schema qualifier data model.

pub mod error;
pub mod qualifier;
pub mod utf8;

pub use error::{LdapError, LdapResult};
pub use qualifier::AttributeQualifier;
pub use utf8::is_valid_utf8;
