//! Typed Envelopes
//!
//! Wraps structured messages in a `{"type": ..., "data": ...}` envelope so
//! that many message kinds can share one channel, and rebuilds the concrete
//! message on the receiving side from the `type` discriminator.
//!
//! ## Features
//!
//! - **Registry Dispatch**: Variants are registered by discriminator; each
//!   decode builds a fresh instance of the registered type
//! - **Open Variant Set**: Any `Serialize + Deserialize` struct implementing
//!   [`TypedMessage`] can be registered, no central enum required
//! - **Send-only Kinds**: [`Codec::force_decode`] wraps messages the local
//!   registry never reads back
//! - **Dynamic Messages**: Discriminators known only at runtime decode to
//!   [`DynamicMessage`]
//!
//! ## Wire Format
//!
//! ```text
//! {"type":"ping","data":{"Seq":7}}
//! ```
//!
//! ## Naming
//!
//! `encode` turns envelope bytes into a message; `decode` and
//! `force_decode` turn a message into envelope bytes.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use typed_envelope::{Codec, TypedMessage};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Ping {
//!     #[serde(rename = "Seq")]
//!     seq: i64,
//! }
//!
//! impl TypedMessage for Ping {
//!     fn message_type(&self) -> &str {
//!         "ping"
//!     }
//! }
//!
//! let mut codec = Codec::new();
//! codec.register_type::<Ping>();
//!
//! let msg = codec.encode(br#"{"type":"ping","data":{"Seq":7}}"#).unwrap();
//! assert_eq!(msg.downcast_ref::<Ping>(), Some(&Ping { seq: 7 }));
//!
//! let bytes = codec.decode(&Ping { seq: 7 }).unwrap();
//! assert_eq!(bytes, br#"{"type":"ping","data":{"Seq":7}}"#);
//! ```

pub mod codec;
pub mod config;
pub mod dynamic;
pub mod envelope;
pub mod error;
pub mod global;
pub mod message;

pub use codec::Codec;
pub use config::{CodecConfig, EnvelopeConfig, RegistryConfig};
pub use dynamic::DynamicMessage;
pub use envelope::{Envelope, OutputFormat};
pub use error::{EnvelopeError, Result};
pub use global::{decode, encode, force_decode, register};
pub use message::{AnyMessage, TypedMessage};
