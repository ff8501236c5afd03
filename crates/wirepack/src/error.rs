//! Codec error type.

use thiserror::Error;
use wirepack_buffers::BufferError;

/// Error type for encode/decode operations.
///
/// Errors are values returned to the immediate caller; the codec never logs,
/// retries, or partially commits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The value or destination kind has no wire representation. Has no
    /// producer inside this crate (unsupported kinds simply do not implement
    /// the codec traits); retained for embedders writing their own
    /// [`Encode`](crate::Encode) implementations over foreign kinds.
    #[error("value kind has no wire representation")]
    UnsupportedType,
    #[error("invalid code 0x{code:02x} decoding {expected}")]
    InvalidCode { code: u8, expected: &'static str },
    #[error("empty input, nothing to decode")]
    EmptyInput,
    #[error("input truncated before the value was complete")]
    TruncatedInput,
    #[error("destination holds {capacity} elements, input carries {count}")]
    LengthMismatch { capacity: usize, count: usize },
    #[error("decode consumed {consumed} of {len} bytes")]
    TrailingBytes { consumed: usize, len: usize },
    #[error("decoded value does not fit destination {dest}")]
    NotRepresentable { dest: &'static str },
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,
    #[error("length {len} exceeds the 32-bit wire ladder")]
    CountOverflow { len: usize },
    /// The encoder's size pass and write pass disagreed. Unreachable for
    /// valid inputs; surfaced instead of silently corrupting output.
    #[error("encoder passes disagreed: computed {computed} bytes, wrote {written}")]
    SizeMismatch { computed: usize, written: usize },
}

impl From<BufferError> for PackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => PackError::TruncatedInput,
            BufferError::InvalidUtf8 => PackError::InvalidUtf8,
            // A write past the fixed capacity means the size pass
            // under-counted, observed mid-write.
            BufferError::Overflow => PackError::SizeMismatch {
                computed: 0,
                written: 0,
            },
        }
    }
}
