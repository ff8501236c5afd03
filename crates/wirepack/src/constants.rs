//! Wire format definitions.
//!
//! The fixed table of format tag bytes (a MessagePack subset: no extension
//! types, no bin family, no timestamps) plus the pure size-ladder helpers
//! shared by the encoder's size pass and write pass. Stateless; used by both
//! the encoder and the decoder.

use crate::error::PackError;

pub const NIL: u8 = 0xc0;

pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

/// Positive fixint band: the tag byte is the value, `0..=127`.
pub const FIXINT_MAX: u8 = 0x7f;
/// Negative fixint band: the tag byte is the value, `-32..=-1`.
pub const NEG_FIXINT_MIN: u8 = 0xe0;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;

pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const FIXSTR: u8 = 0xa0;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;

pub const FIXARRAY: u8 = 0x90;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;

pub const FIXMAP: u8 = 0x80;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Maximum count/length embedded in a fixarray/fixmap tag.
pub const FIX_SEQ_MAX: usize = 0x0f;
/// Maximum byte length embedded in a fixstr tag.
pub const FIX_STR_MAX: usize = 0x1f;

#[inline]
pub fn is_positive_fixint(code: u8) -> bool {
    code <= FIXINT_MAX
}

#[inline]
pub fn is_negative_fixint(code: u8) -> bool {
    code >= NEG_FIXINT_MIN
}

#[inline]
pub fn is_fixstr(code: u8) -> bool {
    (FIXSTR..FIXSTR + 0x20).contains(&code)
}

#[inline]
pub fn is_fixarray(code: u8) -> bool {
    (FIXARRAY..=FIXARRAY + 0x0f).contains(&code)
}

#[inline]
pub fn is_fixmap(code: u8) -> bool {
    (FIXMAP..=FIXMAP + 0x0f).contains(&code)
}

/// Encoded length (tag plus payload) of an unsigned integer, choosing the
/// narrowest representation that covers the runtime magnitude.
#[inline]
pub fn uint_tagged_len(val: u64) -> usize {
    if val <= FIXINT_MAX as u64 {
        1
    } else if val <= u8::MAX as u64 {
        2
    } else if val <= u16::MAX as u64 {
        3
    } else if val <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Encoded length of a signed integer. Non-negative values ride the
/// unsigned ladder; negative values pick the narrowest signed form.
#[inline]
pub fn int_tagged_len(val: i64) -> usize {
    if val >= 0 {
        uint_tagged_len(val as u64)
    } else if val >= -32 {
        1
    } else if val >= i8::MIN as i64 {
        2
    } else if val >= i16::MIN as i64 {
        3
    } else if val >= i32::MIN as i64 {
        5
    } else {
        9
    }
}

/// Encoded length of a string-family byte run of `len` bytes, including the
/// tag and any length prefix.
pub fn str_tagged_len(len: usize) -> Result<usize, PackError> {
    if len <= FIX_STR_MAX {
        Ok(1 + len)
    } else if len <= u8::MAX as usize {
        Ok(2 + len)
    } else if len <= u16::MAX as usize {
        Ok(3 + len)
    } else if len as u64 <= u32::MAX as u64 {
        Ok(5 + len)
    } else {
        Err(PackError::CountOverflow { len })
    }
}

/// Encoded length of an array/map count header (the payload is sized by the
/// caller). Arrays and maps share one three-tier ladder.
pub fn seq_header_len(count: usize) -> Result<usize, PackError> {
    if count <= FIX_SEQ_MAX {
        Ok(1)
    } else if count <= u16::MAX as usize {
        Ok(3)
    } else if count as u64 <= u32::MAX as u64 {
        Ok(5)
    } else {
        Err(PackError::CountOverflow { len: count })
    }
}
