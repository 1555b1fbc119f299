//! Process-wide default codec
//!
//! Free functions for callers that only ever need one registry. They
//! delegate to a [`Codec`] guarded by a read-write lock.
//!
//! Every registration here is visible to the whole process. Libraries and
//! tests should build their own registry with [`Codec::new()`] and pass it
//! where it is needed; reach for this module only from an application's
//! top level.

use std::sync::{OnceLock, PoisonError, RwLock};

use serde::de::DeserializeOwned;

use crate::codec::Codec;
use crate::error::Result;
use crate::message::{AnyMessage, TypedMessage};

static DEFAULT_CODEC: OnceLock<RwLock<Codec>> = OnceLock::new();

fn default_codec() -> &'static RwLock<Codec> {
    DEFAULT_CODEC.get_or_init(|| RwLock::new(Codec::new()))
}

/// Register a variant on the default codec
pub fn register<M>(prototype: &M)
where
    M: TypedMessage + DeserializeOwned,
{
    default_codec()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(prototype);
}

/// [`Codec::encode`] on the default codec
pub fn encode(bytes: &[u8]) -> Result<Box<dyn AnyMessage>> {
    with_default(|codec| codec.encode(bytes))
}

/// [`Codec::decode`] on the default codec
pub fn decode(message: &dyn AnyMessage) -> Result<Vec<u8>> {
    with_default(|codec| codec.decode(message))
}

/// [`Codec::force_decode`] on the default codec
pub fn force_decode(message: &dyn AnyMessage) -> Result<Vec<u8>> {
    with_default(|codec| codec.force_decode(message))
}

/// Run `f` with shared access to the default codec
pub fn with_default<R>(f: impl FnOnce(&Codec) -> R) -> R {
    let codec = default_codec()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&*codec)
}
