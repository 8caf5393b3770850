//! Marshal decoder: peek-then-branch recursion over the message body.
//!
//! The intern table is rebuilt in the same first-visit order the encoder
//! used, so `CODE_SHARED*` back-offsets resolve by simple subtraction
//! from the current object count. Compound blocks hold their table slot
//! as a placeholder while their fields decode; a back-reference into an
//! unfinished block is rejected (the wire can only reference completed
//! objects, since the sharing model is back-reference-only).

use valuepack_buffers::Reader;

use super::constants::*;
use super::error::DecodeError;
use crate::int64::Int64;
use crate::value::{Value, TAG_DOUBLE_ARRAY};

/// Default bound on input nesting depth.
pub const DEFAULT_MAX_DEPTH: u32 = 10_000;

/// Reads the total byte length of the message starting at `offset` —
/// header included — without decoding the body. This is the number of
/// bytes a caller must have buffered before [`MarshalDecoder::decode`]
/// can succeed.
pub fn data_size(data: &[u8], offset: usize) -> Result<u32, DecodeError> {
    let mut reader = Reader::at(data, offset);
    if reader.try_u32()? != MAGIC {
        return Err(DecodeError::BadMagic);
    }
    let block_len = reader.try_u32()?;
    block_len
        .checked_add(HEADER_SIZE as u32)
        .ok_or(DecodeError::IllFormedMessage)
}

pub struct MarshalDecoder {
    max_depth: u32,
}

impl Default for MarshalDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarshalDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Decodes the message starting at `offset`, returning a freshly
    /// allocated value graph owned by the caller.
    pub fn decode(&self, data: &[u8], offset: usize) -> Result<Value, DecodeError> {
        let mut reader = Reader::at(data, offset);
        if reader.try_u32()? != MAGIC {
            return Err(DecodeError::BadMagic);
        }
        let _block_len = reader.try_u32()?;
        let num_objects = reader.try_u32()?;
        let _size_32 = reader.try_u32()?;
        let _size_64 = reader.try_u32()?;
        let mut intern = Intern {
            reader,
            // Capacity is a hint from untrusted input; cap it.
            table: Vec::with_capacity((num_objects as usize).min(4096)),
            max_depth: self.max_depth,
        };
        intern.read_value(0)
    }
}

struct Intern<'a> {
    reader: Reader<'a>,
    table: Vec<Option<Value>>,
    max_depth: u32,
}

impl Intern<'_> {
    /// Allocates the next object slot, initially unfilled.
    fn alloc_slot(&mut self) -> usize {
        self.table.push(None);
        self.table.len() - 1
    }

    fn register(&mut self, v: Value) -> Value {
        self.table.push(Some(v.clone()));
        v
    }

    fn lookup_shared(&self, offset: u32) -> Result<Value, DecodeError> {
        let offset = offset as usize;
        if offset == 0 || offset > self.table.len() {
            return Err(DecodeError::IllFormedMessage);
        }
        match &self.table[self.table.len() - offset] {
            Some(v) => Ok(v.clone()),
            // Unfinished block: only a cycle could reference it.
            None => Err(DecodeError::IllFormedMessage),
        }
    }

    fn read_value(&mut self, depth: u32) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep);
        }
        let code = self.reader.try_u8()?;
        if code >= PREFIX_SMALL_INT {
            if code >= PREFIX_SMALL_BLOCK {
                let tag = code & 0xf;
                let size = ((code >> 4) & 0x7) as usize;
                return self.read_block(tag, size, size > 0, depth);
            }
            return Ok(Value::Int((code & 0x3f) as i32));
        }
        if code >= PREFIX_SMALL_STRING {
            let len = (code & 0x1f) as usize;
            return self.read_bytes(len);
        }
        match code {
            CODE_INT8 => Ok(Value::Int(self.reader.try_i8()? as i32)),
            CODE_INT16 => Ok(Value::Int(self.reader.try_i16()? as i32)),
            CODE_INT32 => Ok(Value::Int(self.reader.try_i32()?)),
            CODE_SHARED8 => {
                let offset = self.reader.try_u8()? as u32;
                self.lookup_shared(offset)
            }
            CODE_SHARED16 => {
                let offset = self.reader.try_u16()? as u32;
                self.lookup_shared(offset)
            }
            CODE_SHARED32 => {
                let offset = self.reader.try_u32()?;
                self.lookup_shared(offset)
            }
            CODE_BLOCK32 => {
                let header = self.reader.try_u32()?;
                let tag = (header & 0xff) as u8;
                let size = (header >> 10) as usize;
                self.read_block(tag, size, true, depth)
            }
            CODE_STRING8 => {
                let len = self.reader.try_u8()? as usize;
                self.read_bytes(len)
            }
            CODE_STRING32 => {
                let len = self.reader.try_u32()? as usize;
                self.read_bytes(len)
            }
            CODE_DOUBLE_LITTLE => {
                let d = f64::from_le_bytes(self.reader.try_bytes8()?);
                Ok(self.register(Value::Double(d)))
            }
            CODE_DOUBLE_BIG => {
                let d = f64::from_be_bytes(self.reader.try_bytes8()?);
                Ok(self.register(Value::Double(d)))
            }
            CODE_DOUBLE_ARRAY8_LITTLE => {
                let len = self.reader.try_u8()? as usize;
                self.read_double_array(len, false)
            }
            CODE_DOUBLE_ARRAY8_BIG => {
                let len = self.reader.try_u8()? as usize;
                self.read_double_array(len, true)
            }
            CODE_DOUBLE_ARRAY32_LITTLE => {
                let len = self.reader.try_u32()? as usize;
                self.read_double_array(len, false)
            }
            CODE_DOUBLE_ARRAY32_BIG => {
                let len = self.reader.try_u32()? as usize;
                self.read_double_array(len, true)
            }
            CODE_CODEPOINTER | CODE_INFIXPOINTER => Err(DecodeError::UnsupportedCodePointer),
            CODE_CUSTOM => {
                let ident = self.reader.try_cstr()?;
                if ident != INT64_IDENT {
                    return Err(DecodeError::UnknownCustomBlock);
                }
                let x = Int64::from_be_bytes(self.reader.try_bytes8()?);
                Ok(self.register(Value::Int64(x)))
            }
            // 64-bit-platform forms; never produced for this model.
            CODE_INT64 | CODE_BLOCK64 => Err(DecodeError::IllFormedMessage),
            _ => Err(DecodeError::IllFormedMessage),
        }
    }

    fn read_block(
        &mut self,
        tag: u8,
        size: usize,
        sharable: bool,
        depth: u32,
    ) -> Result<Value, DecodeError> {
        if !sharable {
            return Ok(Value::block(tag, vec![]));
        }
        let slot = self.alloc_slot();
        let mut fields = Vec::with_capacity(size.min(4096));
        for _ in 0..size {
            fields.push(self.read_value(depth + 1)?);
        }
        let v = Value::block(tag, fields);
        self.table[slot] = Some(v.clone());
        Ok(v)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Value, DecodeError> {
        let data = self.reader.try_buf(len)?.to_vec();
        Ok(self.register(Value::bytes(data)))
    }

    fn read_double_array(&mut self, len: usize, big_endian: bool) -> Result<Value, DecodeError> {
        let slot = self.alloc_slot();
        let mut fields = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            let bytes = self.reader.try_bytes8()?;
            let d = if big_endian {
                f64::from_be_bytes(bytes)
            } else {
                f64::from_le_bytes(bytes)
            };
            fields.push(Value::Double(d));
        }
        let v = Value::block(TAG_DOUBLE_ARRAY, fields);
        self.table[slot] = Some(v.clone());
        Ok(v)
    }
}
