//! Schema definition qualifiers
//!
//! Schema definitions (attribute types, object classes, ...) may carry
//! extensions that are not defined by RFC 2252. Those extensions start with
//! `X-`, e.g. `X-ORIGIN 'RFC 4519'`.

use crate::error::{LdapError, LdapResult};
use serde::{Deserialize, Serialize};

/// A qualifier attached to a schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeQualifier {
    name: String,
    values: Vec<String>,
}

impl AttributeQualifier {
    /// Create a new qualifier
    ///
    /// # Arguments
    /// * `name` - Qualifier name, e.g. `X-ORIGIN`
    /// * `values` - Qualifier values (copied)
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if the name is empty.
    pub fn new(name: impl Into<String>, values: &[impl AsRef<str>]) -> LdapResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LdapError::InvalidArgument(
                "An empty name was passed in for a schema definition qualifier".to_string(),
            ));
        }

        Ok(Self {
            name,
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        })
    }

    /// Get the qualifier name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the qualifier values, or `None` if there are none
    pub fn values(&self) -> Option<&[String]> {
        if self.values.is_empty() {
            None
        } else {
            Some(&self.values)
        }
    }
}
