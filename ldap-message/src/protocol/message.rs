use crate::controls::LdapControl;
use ldap_asn1::{
    decode, Asn1Choice, Asn1Identifier, Asn1Integer, Asn1Object, Asn1Sequence, BerEncoder,
};
use ldap_core::{LdapError, LdapResult};
use std::any::Any;
use std::fmt;

/// LDAP message envelope
///
/// ```text
/// LDAPMessage ::= SEQUENCE {
///      messageID       MessageID,
///      protocolOp      CHOICE { ... },
///      controls       [0] Controls OPTIONAL }
///
/// MessageID ::= INTEGER (0 ..  maxInt)
/// ```
///
/// The operation is held as a [`Asn1Choice`]: a decoded message carries
/// whatever generic value the decoder produced for it, which callers turn
/// into a concrete request with that request's `decode`.
#[derive(Debug, Clone, PartialEq)]
pub struct RfcLdapMessage {
    message_id: i32,
    operation: Asn1Choice,
    controls: Vec<LdapControl>,
}

impl RfcLdapMessage {
    /// `[0]` tag of the controls field
    pub const CONTROLS_ID: Asn1Identifier = Asn1Identifier::context_specific(true, 0);

    pub fn new<T: Asn1Object + 'static>(message_id: i32, operation: T) -> LdapResult<Self> {
        Self::from_boxed(message_id, Box::new(operation))
    }

    /// Create a message around an already boxed operation
    ///
    /// # Error Handling
    /// Returns `InvalidArgument` if `message_id` is negative.
    pub fn from_boxed(message_id: i32, operation: Box<dyn Asn1Object>) -> LdapResult<Self> {
        if message_id < 0 {
            return Err(LdapError::InvalidArgument(format!(
                "Message ID must not be negative, got {}",
                message_id
            )));
        }
        Ok(Self {
            message_id,
            operation: Asn1Choice::from_boxed(operation),
            controls: Vec::new(),
        })
    }

    /// Attach request or response controls
    pub fn with_controls(mut self, controls: Vec<LdapControl>) -> Self {
        self.controls = controls;
        self
    }

    pub fn message_id(&self) -> i32 {
        self.message_id
    }

    pub fn operation(&self) -> &Asn1Choice {
        &self.operation
    }

    pub fn controls(&self) -> &[LdapControl] {
        &self.controls
    }

    /// Decode a message from the start of `data`
    ///
    /// # Returns
    /// Returns the message and the number of bytes it occupied.
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        let (value, consumed) = decode(data)?;
        let message = Self::from_asn1(value.as_ref())?;
        log::trace!(
            "Decoded LDAP message {} ({} bytes, op {})",
            message.message_id,
            consumed,
            message.operation.identifier()
        );
        Ok((message, consumed))
    }

    /// Read a message out of a decoded SEQUENCE
    pub fn from_asn1(value: &dyn Asn1Object) -> LdapResult<Self> {
        let sequence = value.downcast_ref::<Asn1Sequence>().ok_or_else(|| {
            LdapError::Asn1Decoding(format!(
                "LDAPMessage must be a SEQUENCE, got {}",
                value.identifier()
            ))
        })?;
        if sequence.identifier() != Asn1Sequence::ID || !(2..=3).contains(&sequence.len()) {
            return Err(LdapError::Asn1Decoding(format!(
                "Malformed LDAPMessage: {} with {} fields",
                sequence.identifier(),
                sequence.len()
            )));
        }

        let message_id = sequence
            .get(0)
            .and_then(|v| v.downcast_ref::<Asn1Integer>())
            .ok_or_else(|| LdapError::Asn1Decoding("Missing messageID".to_string()))?
            .int_value()
            .map_err(|e| LdapError::Asn1Decoding(format!("messageID: {}", e)))?;
        if message_id < 0 {
            return Err(LdapError::Asn1Decoding(format!(
                "Negative messageID {}",
                message_id
            )));
        }

        let mut operation = Asn1Choice::empty();
        if let Some(op) = sequence.get(1) {
            operation.set_choice_value(op.clone_box());
        }

        let controls = match sequence.get(2) {
            Some(field) if field.identifier() == Self::CONTROLS_ID => field
                .downcast_ref::<Asn1Sequence>()
                .ok_or_else(|| LdapError::Asn1Decoding("Malformed controls".to_string()))?
                .iter()
                .map(LdapControl::from_asn1)
                .collect::<LdapResult<Vec<_>>>()?,
            Some(field) => {
                return Err(LdapError::Asn1Decoding(format!(
                    "Unexpected LDAPMessage field {}",
                    field.identifier()
                )));
            }
            None => Vec::new(),
        };

        Ok(Self {
            message_id,
            operation,
            controls,
        })
    }
}

impl Asn1Object for RfcLdapMessage {
    fn identifier(&self) -> Asn1Identifier {
        Asn1Sequence::ID
    }

    fn set_identifier(&mut self, _id: Asn1Identifier) {}

    fn encode(&self, encoder: &mut BerEncoder) -> LdapResult<()> {
        let mut content = BerEncoder::new();
        content.encode_integer(&Asn1Integer::ID, i64::from(self.message_id))?;
        self.operation.encode(&mut content)?;
        if !self.controls.is_empty() {
            let mut controls = BerEncoder::new();
            for control in &self.controls {
                control.to_asn1().encode(&mut controls)?;
            }
            content.encode_tlv(&Self::CONTROLS_ID, controls.as_bytes())?;
        }
        encoder.encode_tlv(&Asn1Sequence::ID, content.as_bytes())
    }

    fn clone_box(&self) -> Box<dyn Asn1Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for RfcLdapMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LDAPMessage {}: {}", self.message_id, self.operation)?;
        for control in &self.controls {
            write!(f, " {}", control)?;
        }
        Ok(())
    }
}
