//! Messages whose discriminator is only known at runtime

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::message::TypedMessage;

/// An untyped message: a discriminator plus its raw payload
///
/// Lets tooling carry message kinds it has no Rust type for, e.g. types
/// listed in configuration. Serializes as the bare payload so that an
/// envelope built from it is `{"type": message_type, "data": data}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    pub message_type: String,
    pub data: Value,
}

impl DynamicMessage {
    pub fn new(message_type: impl Into<String>, data: Value) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }
}

impl Serialize for DynamicMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl TypedMessage for DynamicMessage {
    fn message_type(&self) -> &str {
        &self.message_type
    }
}
