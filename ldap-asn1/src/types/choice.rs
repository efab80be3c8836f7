use crate::ber::{Asn1Identifier, BerEncoder};
use crate::types::Asn1Object;
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// ASN.1 CHOICE
///
/// A CHOICE has no identity of its own: on the wire it is whichever
/// alternative was selected. Every operation (identifier, encode, display)
/// is forwarded to the held value.
///
/// # Lifecycle
///
/// A choice is either created with its alternative ([`new`](Self::new)), or
/// created empty ([`empty`](Self::empty)) by a parser that only learns the
/// alternative later and fills it with [`set_choice_value`](Self::set_choice_value).
/// Encoding an empty choice fails; its identifier is the end-of-contents tag
/// (UNIVERSAL 0), which no real value uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asn1Choice {
    value: Option<Box<dyn Asn1Object>>,
}

impl Asn1Choice {
    /// Reported by an empty choice
    pub const EMPTY_ID: Asn1Identifier = Asn1Identifier::universal(false, 0);

    /// Create a choice holding `value`
    pub fn new<T: Asn1Object + 'static>(value: T) -> Self {
        Self::from_boxed(Box::new(value))
    }

    /// Create a choice holding an already boxed value
    pub fn from_boxed(value: Box<dyn Asn1Object>) -> Self {
        Self { value: Some(value) }
    }

    /// Create a choice whose alternative is assigned later
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Select the alternative
    pub fn set_choice_value(&mut self, value: Box<dyn Asn1Object>) {
        self.value = Some(value);
    }

    /// Get the selected alternative
    pub fn choice_value(&self) -> Option<&dyn Asn1Object> {
        self.value.as_deref()
    }

    /// Take the selected alternative
    pub fn into_choice_value(self) -> Option<Box<dyn Asn1Object>> {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl Asn1Object for Asn1Choice {
    fn identifier(&self) -> Asn1Identifier {
        self.value
            .as_ref()
            .map_or(Self::EMPTY_ID, |value| value.identifier())
    }

    fn set_identifier(&mut self, id: Asn1Identifier) {
        if let Some(value) = self.value.as_mut() {
            value.set_identifier(id);
        }
    }

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        match &self.value {
            Some(value) => value.encode(encoder),
            None => Err(LdapError::Asn1Encoding(
                "CHOICE has no alternative selected".to_string(),
            )),
        }
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Asn1Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => Ok(()),
        }
    }
}
