//! Response body decoding

use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Turns a response body into a typed value
pub trait Decoder<T>: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<T>;
}

/// Decodes JSON bodies with `serde_json`
pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonDecoder")
    }
}

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder<T> {
    fn decode(&self, body: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(body)?)
    }
}
