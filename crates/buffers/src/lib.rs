//! Binary buffer primitives shared by the valuepack codec.
//!
//! Provides:
//! - [`Reader`] — cursor-tracking reads over a borrowed byte slice, with
//!   bounds-checked accessors that fail instead of panicking
//! - [`Writer`] — auto-growing output buffer with big-endian writes

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Failure of a bounds-checked buffer operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A read would advance past the end of the buffer.
    #[error("unexpected end of buffer")]
    EndOfBuffer,
}
