//! The tagged heap value model shared by the codec, comparator and hasher.
//!
//! A [`Value`] graph is immutable once built. Compound values (`Block`,
//! `Bytes`) are reference-counted so that distinct fields can alias the
//! same allocation; the codec preserves that aliasing on the wire through
//! its shared-object table, keyed by the `Rc` allocation address.

use std::rc::Rc;

use base64::Engine;

use crate::int64::Int64;

/// Runtime tag reported for byte strings by [`Value::effective_tag`].
pub const TAG_BYTES: u16 = 252;
/// Runtime tag reported for doubles by [`Value::effective_tag`].
pub const TAG_DOUBLE: u16 = 253;
/// Block tag marking an all-double field array.
pub const TAG_DOUBLE_ARRAY: u8 = 254;
/// Runtime tag reported for wide integers by [`Value::effective_tag`].
pub const TAG_INT64: u16 = 255;
/// Runtime tag reported for plain integers by [`Value::effective_tag`].
/// Deliberately outside the 0–255 block tag space.
pub const TAG_INT: u16 = 1000;

/// An N-ary tagged record. Field order is significant and part of the
/// record's identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Constructor/shape tag, 0–255.
    pub tag: u8,
    /// Ordered fields.
    pub fields: Vec<Value>,
}

/// A dynamically tagged heap value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Native-width signed integer.
    Int(i32),
    /// Exact 64-bit integer (three-limb representation).
    Int64(Int64),
    /// IEEE-754 double.
    Double(f64),
    /// Immutable byte string; length is explicit, bytes are arbitrary.
    Bytes(Rc<Vec<u8>>),
    /// Tagged record.
    Block(Rc<Block>),
    /// Transparent indirection; the codec and comparator unwrap it
    /// before acting.
    Forward(Rc<Value>),
}

impl Value {
    /// Builds a block value.
    pub fn block(tag: u8, fields: Vec<Value>) -> Value {
        Value::Block(Rc::new(Block { tag, fields }))
    }

    /// Builds a byte-string value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Value {
        Value::Bytes(Rc::new(data.into()))
    }

    /// Wraps a value in a transparent indirection.
    pub fn forward(inner: Value) -> Value {
        Value::Forward(Rc::new(inner))
    }

    /// Follows `Forward` links to the underlying value.
    pub fn unwrap_forward(&self) -> &Value {
        let mut v = self;
        while let Value::Forward(inner) = v {
            v = inner;
        }
        v
    }

    /// True when the value (after unwrapping indirections) is a block.
    pub fn is_block(&self) -> bool {
        matches!(self.unwrap_forward(), Value::Block(_))
    }

    /// The runtime tag of the value after unwrapping indirections: blocks
    /// report their own tag, other shapes report a fixed per-kind tag
    /// (byte strings 252, doubles 253, wide integers 255, plain integers
    /// the out-of-band 1000).
    pub fn effective_tag(&self) -> u16 {
        match self.unwrap_forward() {
            Value::Block(b) => b.tag as u16,
            Value::Bytes(_) => TAG_BYTES,
            Value::Double(_) => TAG_DOUBLE,
            Value::Int64(_) => TAG_INT64,
            Value::Int(_) => TAG_INT,
            Value::Forward(_) => unreachable!("unwrap_forward returned a forward"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v)
    }
}

impl From<Int64> for Value {
    fn from(v: Int64) -> Value {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Double(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Value {
        Value::bytes(v)
    }
}

/// Debug/interop view: byte strings render as base64 data URIs, wide
/// integers as decimal strings, blocks as `{"tag": .., "fields": [..]}`.
impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> serde_json::Value {
        match v {
            Value::Int(i) => serde_json::json!(i),
            Value::Int64(x) => serde_json::Value::String(x.to_string()),
            Value::Double(d) => serde_json::json!(d),
            Value::Bytes(b) => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(b.as_slice());
                serde_json::Value::String(format!("data:application/octet-stream;base64,{}", b64))
            }
            Value::Block(b) => serde_json::json!({
                "tag": b.tag,
                "fields": b.fields.iter().map(serde_json::Value::from).collect::<Vec<_>>(),
            }),
            Value::Forward(inner) => serde_json::Value::from(inner.as_ref()),
        }
    }
}
