//! Typed registry codec
//!
//! Holds one factory per registered discriminator and dispatches on the
//! envelope's `type` field to rebuild the concrete message.

use std::collections::HashMap;
use std::fmt;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::dynamic::DynamicMessage;
use crate::envelope::{Envelope, OutputFormat};
use crate::error::{EnvelopeError, Result};
use crate::message::{AnyMessage, TypedMessage};

/// Builds a fresh message from an envelope payload
type Factory = Box<dyn Fn(Value) -> serde_json::Result<Box<dyn AnyMessage>> + Send + Sync>;

/// Registry of message variants keyed by discriminator
///
/// Register every variant up front, then share the codec by reference:
/// `register*` needs `&mut self`, the encode/decode operations only `&self`.
pub struct Codec {
    /// Factory per discriminator
    registered: HashMap<String, Factory>,
    /// Format used when writing envelopes
    format: OutputFormat,
}

impl Codec {
    /// Create an empty codec writing compact JSON
    pub fn new() -> Self {
        Self::with_format(OutputFormat::Compact)
    }

    /// Create an empty codec writing envelopes in `format`
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            registered: HashMap::new(),
            format,
        }
    }

    /// Create an empty codec from configuration
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_format(config.output_format)
    }

    /// Output format used by `decode` and `force_decode`
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Register the concrete type of `prototype` under its discriminator
    ///
    /// The prototype is only inspected for its discriminator; every
    /// `encode` builds a new `M` from the payload. Registering a
    /// discriminator again replaces the earlier variant.
    pub fn register<M>(&mut self, prototype: &M)
    where
        M: TypedMessage + DeserializeOwned,
    {
        let factory: Factory = Box::new(|data: Value| -> serde_json::Result<Box<dyn AnyMessage>> {
            let message: M = serde_json::from_value(data)?;
            Ok(Box::new(message))
        });
        self.insert(prototype.message_type().to_string(), factory);
    }

    /// Register `M` using its default value as the prototype
    pub fn register_type<M>(&mut self)
    where
        M: TypedMessage + DeserializeOwned + Default,
    {
        self.register(&M::default());
    }

    /// Register a discriminator whose payloads are kept as raw JSON
    ///
    /// `encode` yields a [`DynamicMessage`] for envelopes of this type.
    pub fn register_dynamic(&mut self, message_type: impl Into<String>) {
        let message_type = message_type.into();
        let tag = message_type.clone();
        let factory: Factory = Box::new(move |data: Value| -> serde_json::Result<Box<dyn AnyMessage>> {
            Ok(Box::new(DynamicMessage::new(tag.clone(), data)))
        });
        self.insert(message_type, factory);
    }

    fn insert(&mut self, message_type: String, factory: Factory) {
        if self.registered.contains_key(&message_type) {
            debug!(message_type = %message_type, "replacing registered message type");
        } else {
            debug!(message_type = %message_type, "registering message type");
        }
        self.registered.insert(message_type, factory);
    }

    /// Rebuild a typed message from raw envelope bytes
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MalformedEnvelope`] if the bytes are not an envelope
    /// - [`EnvelopeError::UnregisteredType`] if `type` was never registered
    /// - [`EnvelopeError::DataShapeMismatch`] if `data` does not fit the
    ///   registered variant
    pub fn encode(&self, bytes: &[u8]) -> Result<Box<dyn AnyMessage>> {
        let Envelope { message_type, data } = Envelope::from_slice(bytes)?;

        let factory = self
            .registered
            .get(&message_type)
            .ok_or_else(|| EnvelopeError::unregistered(message_type.as_str()))?;

        // An absent payload reads as `{}` and an explicit `null` as itself;
        // each falls back to the other so unit and all-default variants
        // decode either way. The first attempt's error is the one reported.
        let empty = || Value::Object(Map::new());
        let built = match data {
            None => factory(empty()).or_else(|err| factory(Value::Null).map_err(|_| err)),
            Some(Value::Null) => {
                factory(Value::Null).or_else(|err| factory(empty()).map_err(|_| err))
            }
            Some(data) => factory(data),
        };

        let message = match built {
            Ok(message) => message,
            Err(source) => {
                return Err(EnvelopeError::DataShapeMismatch {
                    message_type,
                    source,
                })
            }
        };

        // A variant may compute its discriminator from its fields.
        if message.discriminator() != message_type {
            let source = serde_json::Error::custom(format!(
                "decoded message reports type {:?}",
                message.discriminator()
            ));
            return Err(EnvelopeError::DataShapeMismatch {
                message_type,
                source,
            });
        }

        trace!(message_type = %message_type, "decoded envelope");
        Ok(message)
    }

    /// Wrap a registered message in an envelope and serialize it
    ///
    /// Only the discriminator is checked against the registry; the payload
    /// is taken from `message` as is.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnregisteredType`] if the discriminator is unknown
    /// - [`EnvelopeError::Serialization`] if the message cannot be serialized
    pub fn decode(&self, message: &dyn AnyMessage) -> Result<Vec<u8>> {
        if !self.is_registered(message.discriminator()) {
            return Err(EnvelopeError::unregistered(message.discriminator()));
        }
        self.force_decode(message)
    }

    /// Wrap any message in an envelope, registered or not
    ///
    /// For send-only message kinds this codec never has to read back.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Serialization`] if the message cannot be serialized.
    pub fn force_decode(&self, message: &dyn AnyMessage) -> Result<Vec<u8>> {
        let data = message.to_data().map_err(EnvelopeError::Serialization)?;
        Envelope::new(message.discriminator(), data).to_vec(self.format)
    }

    /// Check if a discriminator is registered
    pub fn is_registered(&self, message_type: &str) -> bool {
        self.registered.contains_key(message_type)
    }

    /// All registered discriminators, sorted
    pub fn registered_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.registered.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of registered discriminators
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Registered discriminators that fuzzy-match `query`, best first
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &str)> = self
            .registered
            .keys()
            .filter_map(|name| {
                matcher
                    .fuzzy_match(name, query)
                    .map(|score| (score, name.as_str()))
            })
            .collect();

        // Sort by score descending, then name for stable output
        results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        results.into_iter().take(limit).map(|(_, name)| name).collect()
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("registered", &self.registered_types())
            .field("format", &self.format)
            .finish()
    }
}
