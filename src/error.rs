//! Error types for the envelope codec

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// Envelope codec errors
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("Unregistered message type: {message_type:?}")]
    UnregisteredType { message_type: String },

    #[error("Payload does not match registered shape for {message_type:?}: {source}")]
    DataShapeMismatch {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl EnvelopeError {
    pub(crate) fn unregistered(message_type: impl Into<String>) -> Self {
        Self::UnregisteredType {
            message_type: message_type.into(),
        }
    }

    /// The discriminator involved in the failure, when there is one
    pub fn message_type(&self) -> Option<&str> {
        match self {
            Self::UnregisteredType { message_type } | Self::DataShapeMismatch { message_type, .. } => {
                Some(message_type)
            }
            Self::MalformedEnvelope(_) | Self::Serialization(_) => None,
        }
    }
}
