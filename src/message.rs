//! Message traits
//!
//! [`TypedMessage`] is what callers implement on their own message structs.
//! [`AnyMessage`] is the object-safe view the codec hands back from
//! [`Codec::encode`](crate::Codec::encode); it is implemented automatically
//! for every `TypedMessage`.

use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A message that can travel inside an envelope
///
/// `message_type` must return the same discriminator for every value of the
/// implementing type, and that discriminator must be unique among the
/// variants registered on one codec.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use typed_envelope::TypedMessage;
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Ping {
///     #[serde(rename = "Seq")]
///     seq: i64,
/// }
///
/// impl TypedMessage for Ping {
///     fn message_type(&self) -> &str {
///         "ping"
///     }
/// }
/// ```
pub trait TypedMessage: Serialize + fmt::Debug + Send + Sync + 'static {
    /// Discriminator written to the envelope's `type` field
    fn message_type(&self) -> &str;
}

/// Type-erased message, as returned by the codec
pub trait AnyMessage: Any + fmt::Debug + Send + Sync {
    /// Discriminator of the underlying message
    fn discriminator(&self) -> &str;

    /// Serialize the message body into the envelope's `data` value
    fn to_data(&self) -> serde_json::Result<Value>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: TypedMessage> AnyMessage for T {
    fn discriminator(&self) -> &str {
        self.message_type()
    }

    fn to_data(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn AnyMessage {
    /// Check whether the underlying message is a `T`
    pub fn is<T: AnyMessage>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the underlying message as a `T`
    pub fn downcast_ref<T: AnyMessage>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the underlying message as a `T`
    pub fn downcast_mut<T: AnyMessage>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Take ownership of the underlying message as a `T`
    ///
    /// Behaves like `Box<dyn Any>::downcast`: on a type mismatch the value
    /// comes back as `Box<dyn Any>`. Check with [`is`](Self::is) first to
    /// keep the message view.
    pub fn downcast<T: AnyMessage>(self: Box<Self>) -> Result<Box<T>, Box<dyn Any>> {
        self.into_any().downcast::<T>()
    }
}
