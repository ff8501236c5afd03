//! Binary cursor utilities for wirepack.
//!
//! # Overview
//!
//! - [`Reader`] - reads big-endian binary data from a byte slice with
//!   bounds-checked cursor tracking
//! - [`FixedWriter`] - writes big-endian binary data into a buffer that is
//!   allocated once at an exact capacity and never grows
//!
//! # Example
//!
//! ```
//! use wirepack_buffers::{FixedWriter, Reader};
//!
//! let mut writer = FixedWriter::with_capacity(3);
//! writer.u8(0x01).unwrap();
//! writer.u16(0x0203).unwrap();
//! let data = writer.into_vec();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.u16().unwrap(), 0x0203);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::FixedWriter;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer,
    /// Invalid UTF-8 sequence.
    InvalidUtf8,
    /// Attempted to write past the fixed capacity.
    Overflow,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            BufferError::Overflow => write!(f, "write past fixed capacity"),
        }
    }
}

impl std::error::Error for BufferError {}
