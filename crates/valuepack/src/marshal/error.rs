use thiserror::Error;
use valuepack_buffers::BufferError;

/// Encode-time failure. Nothing is emitted when encoding fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The value cannot be expressed on the wire; carries the offending
    /// block tag. Tags 247, 249, 250, 251 and 255 denote foreign object
    /// kinds (closures, infix and abstract pointers, raw forwards,
    /// customs) that this model represents through dedicated variants or
    /// not at all; a tag-254 block qualifies only when every field is a
    /// double.
    #[error("non-serializable value (reserved block tag {0})")]
    NonSerializable(u8),
    /// The value graph exceeds the configured recursion bound.
    #[error("value graph exceeds depth limit")]
    TooDeep,
}

/// Decode-time failure. Each condition is a pure function of the input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The header's magic constant does not match.
    #[error("bad object: magic number mismatch")]
    BadMagic,
    /// A read ran past the end of the input buffer.
    #[error("truncated input")]
    TruncatedInput,
    /// A code or infix pointer, meaningless outside the foreign runtime's
    /// address space.
    #[error("unsupported code pointer")]
    UnsupportedCodePointer,
    /// A custom block whose identifier is not the 64-bit integer marker.
    #[error("unknown custom block identifier")]
    UnknownCustomBlock,
    /// An unrecognized leading tag byte or an unresolvable back-reference.
    #[error("ill-formed message")]
    IllFormedMessage,
    /// The input nests deeper than the configured recursion bound.
    #[error("input exceeds depth limit")]
    TooDeep,
}

impl From<BufferError> for DecodeError {
    fn from(_: BufferError) -> Self {
        DecodeError::TruncatedInput
    }
}
