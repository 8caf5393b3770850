//! Binary marshaling of [`Value`](crate::value::Value) graphs.
//!
//! The wire format is a fixed 20-byte big-endian header (magic, body
//! length, object count, two size hints) followed by a tag-dispatched
//! body. Sharing between fields of the input graph is preserved through
//! a table of back-references.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{data_size, MarshalDecoder};
pub use encoder::MarshalEncoder;
pub use error::{DecodeError, EncodeError};

use crate::value::Value;

/// Serializes a value graph with a fresh default encoder.
pub fn encode(v: &Value) -> Result<Vec<u8>, EncodeError> {
    MarshalEncoder::new().encode(v)
}

/// Decodes the message starting at `offset` with a default decoder.
pub fn decode(data: &[u8], offset: usize) -> Result<Value, DecodeError> {
    MarshalDecoder::new().decode(data, offset)
}
