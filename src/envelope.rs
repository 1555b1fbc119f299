//! Wire-level envelope

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{EnvelopeError, Result};

/// Output format for serialized envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty,
}

/// The `{type, data}` record carried on the wire
///
/// Only the object form is accepted; `data` is `None` when the field was
/// absent and `Some(Value::Null)` when it was an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Discriminator of the payload
    #[serde(rename = "type")]
    pub message_type: String,
    /// Payload, shape determined by `message_type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Going through a map rejects the positional `[type, data]` form.
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let message_type = match fields.remove("type") {
            Some(Value::String(message_type)) => message_type,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "field `type` must be a string, found {}",
                    other
                )))
            }
            None => return Err(D::Error::missing_field("type")),
        };

        Ok(Self {
            message_type,
            data: fields.remove("data"),
        })
    }
}

impl Envelope {
    /// Create an envelope from a discriminator and payload
    pub fn new(message_type: impl Into<String>, data: Value) -> Self {
        Self {
            message_type: message_type.into(),
            data: Some(data),
        }
    }

    /// Parse an envelope without dispatching on its type
    ///
    /// Useful for routing or logging before a decode.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(EnvelopeError::MalformedEnvelope)
    }

    /// Serialize this envelope
    pub fn to_vec(&self, format: OutputFormat) -> Result<Vec<u8>> {
        let bytes = match format {
            OutputFormat::Compact => serde_json::to_vec(self),
            OutputFormat::Pretty => serde_json::to_vec_pretty(self),
        };
        bytes.map_err(EnvelopeError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let env = Envelope::from_slice(br#"{"type":"ping","data":{"Seq":7}}"#).unwrap();
        assert_eq!(env.message_type, "ping");
        assert_eq!(env.data, Some(json!({ "Seq": 7 })));
    }

    #[test]
    fn test_missing_data_is_tolerated() {
        let env = Envelope::from_slice(br#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(env.message_type, "heartbeat");
        assert_eq!(env.data, None);
    }

    #[test]
    fn test_null_data_is_kept() {
        let env = Envelope::from_slice(br#"{"type":"heartbeat","data":null}"#).unwrap();
        assert_eq!(env.data, Some(Value::Null));
    }

    #[test]
    fn test_absent_data_is_not_written() {
        let env = Envelope {
            message_type: "heartbeat".into(),
            data: None,
        };
        let bytes = env.to_vec(OutputFormat::Compact).unwrap();
        assert_eq!(bytes, br#"{"type":"heartbeat"}"#.to_vec());
    }

    #[test]
    fn test_positional_form_is_malformed() {
        for raw in [r#"["ping",{"Seq":7}]"#, r#"["ping"]"#, "null", "\"ping\""] {
            let result = Envelope::from_slice(raw.as_bytes());
            assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope(_))), "{}", raw);
        }
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let result = Envelope::from_slice(br#"{"data":{}}"#);
        assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_non_string_type_is_malformed() {
        let result = Envelope::from_slice(br#"{"type":42,"data":{}}"#);
        assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = Envelope::from_slice(b"not json");
        assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let env = Envelope::from_slice(br#"{"type":"ping","data":1,"extra":true}"#).unwrap();
        assert_eq!(env, Envelope::new("ping", json!(1)));
    }

    #[test]
    fn test_output_formats() {
        let env = Envelope::new("ping", json!({ "Seq": 7 }));

        let compact = env.to_vec(OutputFormat::Compact).unwrap();
        assert_eq!(compact, br#"{"type":"ping","data":{"Seq":7}}"#.to_vec());

        let pretty = String::from_utf8(env.to_vec(OutputFormat::Pretty).unwrap()).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(Envelope::from_slice(pretty.as_bytes()).unwrap(), env);
    }
}
