//! Wire-format constants for the marshal codec.

/// Magic constant opening every marshaled message.
pub const MAGIC: u32 = 0x8495_a6be;

/// Fixed header size: magic, block length, object count and the two
/// size hints, each a big-endian u32.
pub const HEADER_SIZE: usize = 20;

// ── Packed one-byte prefixes ───────────────────────────────────────────────

/// `0x80–0xFF`: block with `tag = code & 0xF`, `arity = (code >> 4) & 0x7`.
pub const PREFIX_SMALL_BLOCK: u8 = 0x80;
/// `0x40–0x7F`: non-negative integer `code & 0x3F`.
pub const PREFIX_SMALL_INT: u8 = 0x40;
/// `0x20–0x3F`: byte string of length `code & 0x1F`.
pub const PREFIX_SMALL_STRING: u8 = 0x20;

// ── Explicit codes ─────────────────────────────────────────────────────────

pub const CODE_INT8: u8 = 0x00;
pub const CODE_INT16: u8 = 0x01;
pub const CODE_INT32: u8 = 0x02;
pub const CODE_INT64: u8 = 0x03;
pub const CODE_SHARED8: u8 = 0x04;
pub const CODE_SHARED16: u8 = 0x05;
pub const CODE_SHARED32: u8 = 0x06;
pub const CODE_DOUBLE_ARRAY32_LITTLE: u8 = 0x07;
pub const CODE_BLOCK32: u8 = 0x08;
pub const CODE_STRING8: u8 = 0x09;
pub const CODE_STRING32: u8 = 0x0a;
pub const CODE_DOUBLE_BIG: u8 = 0x0b;
pub const CODE_DOUBLE_LITTLE: u8 = 0x0c;
pub const CODE_DOUBLE_ARRAY8_BIG: u8 = 0x0d;
pub const CODE_DOUBLE_ARRAY8_LITTLE: u8 = 0x0e;
pub const CODE_DOUBLE_ARRAY32_BIG: u8 = 0x0f;
pub const CODE_CODEPOINTER: u8 = 0x10;
pub const CODE_INFIXPOINTER: u8 = 0x11;
pub const CODE_CUSTOM: u8 = 0x12;
pub const CODE_BLOCK64: u8 = 0x13;

/// Custom-block identifier marking a boxed 64-bit integer, written
/// NUL-terminated on the wire.
pub const INT64_IDENT: &[u8] = b"_j";
