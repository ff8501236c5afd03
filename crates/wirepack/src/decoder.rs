//! Bytes to value tree.
//!
//! A single recursive, type-directed walk keyed jointly on the current tag
//! byte and the destination kind. The destination is a caller-supplied,
//! pre-allocated location; the decoder never infers a shape from the bytes
//! alone except for the dynamic [`Value`] destination. Once a tag is
//! consumed it is never re-read, and on success the cursor must land exactly
//! on the end of the input.

use std::collections::{BTreeMap, HashMap};

use wirepack_buffers::Reader;

use crate::constants::*;
use crate::error::PackError;
use crate::value::{Bytes, Value};

/// A destination that can be populated from the wire.
pub trait Decode {
    /// Decodes one value at the cursor into `self`.
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError>;
}

/// Read cursor over one encoded value.
pub struct Decoder<'a> {
    r: Reader<'a>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            r: Reader::new(data),
        }
    }

    /// Bytes consumed so far.
    pub fn pos(&self) -> usize {
        self.r.pos()
    }

    fn peek(&self) -> Result<u8, PackError> {
        Ok(self.r.peek()?)
    }

    /// Consumes a Nil tag if one is next. The absent-value short circuit for
    /// optional and composite destinations.
    fn take_nil(&mut self) -> Result<bool, PackError> {
        if self.peek()? == NIL {
            self.r.skip(1)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Cheap lower bound before allocating for a composite: every element
    /// needs at least one byte, so a count larger than the remaining input
    /// is truncated without walking it.
    fn check_min_remaining(&self, items: usize) -> Result<(), PackError> {
        if self.r.remaining() < items {
            return Err(PackError::TruncatedInput);
        }
        Ok(())
    }

    /// Reads any integer-family value as `i64`.
    pub fn read_i64(&mut self, dest: &'static str) -> Result<i64, PackError> {
        let code = self.r.u8()?;
        match code {
            c if is_positive_fixint(c) => Ok(c as i64),
            c if is_negative_fixint(c) => Ok(c as i8 as i64),
            UINT8 => Ok(self.r.u8()? as i64),
            UINT16 => Ok(self.r.u16()? as i64),
            UINT32 => Ok(self.r.u32()? as i64),
            UINT64 => {
                let val = self.r.u64()?;
                i64::try_from(val).map_err(|_| PackError::NotRepresentable { dest })
            }
            INT8 => Ok(self.r.i8()? as i64),
            INT16 => Ok(self.r.i16()? as i64),
            INT32 => Ok(self.r.i32()? as i64),
            INT64 => Ok(self.r.i64()?),
            _ => Err(PackError::InvalidCode {
                code,
                expected: dest,
            }),
        }
    }

    /// Reads any integer-family value as `u64`; negative values are a sign
    /// loss, not a truncation.
    pub fn read_u64(&mut self, dest: &'static str) -> Result<u64, PackError> {
        let code = self.r.u8()?;
        match code {
            c if is_positive_fixint(c) => Ok(c as u64),
            c if is_negative_fixint(c) => Err(PackError::NotRepresentable { dest }),
            UINT8 => Ok(self.r.u8()? as u64),
            UINT16 => Ok(self.r.u16()? as u64),
            UINT32 => Ok(self.r.u32()? as u64),
            UINT64 => Ok(self.r.u64()?),
            INT8 | INT16 | INT32 | INT64 => {
                let val = match code {
                    INT8 => self.r.i8()? as i64,
                    INT16 => self.r.i16()? as i64,
                    INT32 => self.r.i32()? as i64,
                    _ => self.r.i64()?,
                };
                u64::try_from(val).map_err(|_| PackError::NotRepresentable { dest })
            }
            _ => Err(PackError::InvalidCode {
                code,
                expected: dest,
            }),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, PackError> {
        let code = self.r.u8()?;
        match code {
            TRUE => Ok(true),
            FALSE => Ok(false),
            _ => Err(PackError::InvalidCode {
                code,
                expected: "bool",
            }),
        }
    }

    /// `f32` accepts only the 32-bit float tag; widening from the wire would
    /// be exact, but nothing on this wire is narrower than `f32`.
    pub fn read_f32(&mut self) -> Result<f32, PackError> {
        let code = self.r.u8()?;
        match code {
            FLOAT32 => Ok(self.r.f32()?),
            _ => Err(PackError::InvalidCode {
                code,
                expected: "f32",
            }),
        }
    }

    /// `f64` also accepts a 32-bit float: the widening is exact.
    pub fn read_f64(&mut self) -> Result<f64, PackError> {
        let code = self.r.u8()?;
        match code {
            FLOAT64 => Ok(self.r.f64()?),
            FLOAT32 => Ok(self.r.f32()? as f64),
            _ => Err(PackError::InvalidCode {
                code,
                expected: "f64",
            }),
        }
    }

    /// Reads a string-family byte run (tag, length prefix, raw bytes).
    pub fn read_str_bytes(&mut self, expected: &'static str) -> Result<&'a [u8], PackError> {
        let code = self.r.u8()?;
        let len = match code {
            c if is_fixstr(c) => (c - FIXSTR) as usize,
            STR8 => self.r.u8()? as usize,
            STR16 => self.r.u16()? as usize,
            STR32 => self.r.u32()? as usize,
            _ => return Err(PackError::InvalidCode { code, expected }),
        };
        Ok(self.r.buf(len)?)
    }

    pub fn read_array_header(&mut self, expected: &'static str) -> Result<usize, PackError> {
        let code = self.r.u8()?;
        match code {
            c if is_fixarray(c) => Ok((c - FIXARRAY) as usize),
            ARRAY16 => Ok(self.r.u16()? as usize),
            ARRAY32 => Ok(self.r.u32()? as usize),
            _ => Err(PackError::InvalidCode { code, expected }),
        }
    }

    pub fn read_map_header(&mut self, expected: &'static str) -> Result<usize, PackError> {
        let code = self.r.u8()?;
        match code {
            c if is_fixmap(c) => Ok((c - FIXMAP) as usize),
            MAP16 => Ok(self.r.u16()? as usize),
            MAP32 => Ok(self.r.u32()? as usize),
            _ => Err(PackError::InvalidCode { code, expected }),
        }
    }

    /// Structurally skips one value: advances the cursor over exactly the
    /// bytes the value occupies, using only the tag and any length/count
    /// prefix, recursing into nested composites. Used to discard record
    /// fields with no matching destination.
    pub fn skip_value(&mut self) -> Result<(), PackError> {
        let code = self.r.u8()?;
        match code {
            NIL | TRUE | FALSE => Ok(()),
            c if is_positive_fixint(c) || is_negative_fixint(c) => Ok(()),
            UINT8 | INT8 => Ok(self.r.skip(1)?),
            UINT16 | INT16 => Ok(self.r.skip(2)?),
            UINT32 | INT32 | FLOAT32 => Ok(self.r.skip(4)?),
            UINT64 | INT64 | FLOAT64 => Ok(self.r.skip(8)?),
            c if is_fixstr(c) => Ok(self.r.skip((c - FIXSTR) as usize)?),
            STR8 => {
                let len = self.r.u8()? as usize;
                Ok(self.r.skip(len)?)
            }
            STR16 => {
                let len = self.r.u16()? as usize;
                Ok(self.r.skip(len)?)
            }
            STR32 => {
                let len = self.r.u32()? as usize;
                Ok(self.r.skip(len)?)
            }
            c if is_fixarray(c) => self.skip_values((c - FIXARRAY) as usize),
            ARRAY16 => {
                let count = self.r.u16()? as usize;
                self.skip_values(count)
            }
            ARRAY32 => {
                let count = self.r.u32()? as usize;
                self.skip_values(count)
            }
            c if is_fixmap(c) => self.skip_values((c - FIXMAP) as usize * 2),
            MAP16 => {
                let count = self.r.u16()? as usize;
                self.skip_values(count * 2)
            }
            MAP32 => {
                let count = self.r.u32()? as usize;
                self.skip_values(count * 2)
            }
            _ => Err(PackError::InvalidCode {
                code,
                expected: "any value",
            }),
        }
    }

    fn skip_values(&mut self, count: usize) -> Result<(), PackError> {
        self.check_min_remaining(count)?;
        for _ in 0..count {
            self.skip_value()?;
        }
        Ok(())
    }

    /// Decodes one value of whatever shape the bytes declare.
    pub fn read_value(&mut self) -> Result<Value, PackError> {
        let code = self.peek()?;
        match code {
            NIL => {
                self.r.skip(1)?;
                Ok(Value::Nil)
            }
            TRUE | FALSE => Ok(Value::Bool(self.read_bool()?)),
            c if is_positive_fixint(c) || is_negative_fixint(c) => {
                Ok(Value::Int(self.read_i64("integer")?))
            }
            INT8 | INT16 | INT32 | INT64 => Ok(Value::Int(self.read_i64("integer")?)),
            UINT8 | UINT16 | UINT32 | UINT64 => {
                let val = self.read_u64("integer")?;
                // Prefer the signed variant when the value fits.
                Ok(match i64::try_from(val) {
                    Ok(int) => Value::Int(int),
                    Err(_) => Value::UInt(val),
                })
            }
            FLOAT32 => Ok(Value::F32(self.read_f32()?)),
            FLOAT64 => Ok(Value::F64(self.read_f64()?)),
            c if is_fixstr(c) => self.read_value_str(),
            STR8 | STR16 | STR32 => self.read_value_str(),
            c if is_fixarray(c) => self.read_value_array(),
            ARRAY16 | ARRAY32 => self.read_value_array(),
            c if is_fixmap(c) => self.read_value_map(),
            MAP16 | MAP32 => self.read_value_map(),
            _ => Err(PackError::InvalidCode {
                code,
                expected: "any value",
            }),
        }
    }

    fn read_value_str(&mut self) -> Result<Value, PackError> {
        let bytes = self.read_str_bytes("string")?;
        // A byte run is only a string if it happens to be valid UTF-8.
        Ok(match std::str::from_utf8(bytes) {
            Ok(s) => Value::Str(s.to_owned()),
            Err(_) => Value::Bytes(bytes.to_vec()),
        })
    }

    fn read_value_array(&mut self) -> Result<Value, PackError> {
        let count = self.read_array_header("array")?;
        self.check_min_remaining(count)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_value()?);
        }
        Ok(Value::Array(items))
    }

    fn read_value_map(&mut self) -> Result<Value, PackError> {
        let count = self.read_map_header("map")?;
        self.check_min_remaining(count.saturating_mul(2))?;
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.read_value()?;
            let val = self.read_value()?;
            pairs.push((key, val));
        }
        Ok(Value::Map(pairs))
    }
}

/// Decodes one encoded value into a caller-supplied destination.
///
/// The input must hold exactly one value: an empty buffer is `EmptyInput`,
/// leftover bytes after the walk are `TrailingBytes`.
pub fn decode<T: Decode + ?Sized>(bytes: &[u8], dest: &mut T) -> Result<(), PackError> {
    if bytes.is_empty() {
        return Err(PackError::EmptyInput);
    }
    let mut dec = Decoder::new(bytes);
    dest.decode_into(&mut dec)?;
    let consumed = dec.pos();
    if consumed != bytes.len() {
        return Err(PackError::TrailingBytes {
            consumed,
            len: bytes.len(),
        });
    }
    Ok(())
}

impl Decode for i64 {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_i64("i64")?;
        Ok(())
    }
}

impl Decode for u64 {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_u64("u64")?;
        Ok(())
    }
}

macro_rules! impl_decode_int {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
                let val = dec.read_i64(stringify!($ty))?;
                *self = <$ty>::try_from(val).map_err(|_| PackError::NotRepresentable {
                    dest: stringify!($ty),
                })?;
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_decode_uint {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
                let val = dec.read_u64(stringify!($ty))?;
                *self = <$ty>::try_from(val).map_err(|_| PackError::NotRepresentable {
                    dest: stringify!($ty),
                })?;
                Ok(())
            }
        }
    )*};
}

impl_decode_int!(i8, i16, i32);
impl_decode_uint!(u8, u16, u32);

impl Decode for bool {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_bool()?;
        Ok(())
    }
}

impl Decode for f32 {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_f32()?;
        Ok(())
    }
}

impl Decode for f64 {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_f64()?;
        Ok(())
    }
}

impl Decode for String {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        let bytes = dec.read_str_bytes("string")?;
        let s = std::str::from_utf8(bytes).map_err(|_| PackError::InvalidUtf8)?;
        self.clear();
        self.push_str(s);
        Ok(())
    }
}

/// The one permitted tag/kind cross-mapping: a string-family value into a
/// byte-sequence destination, no UTF-8 validation.
impl Decode for Bytes {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        let bytes = dec.read_str_bytes("byte run")?;
        self.0.clear();
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        (**self).decode_into(dec)
    }
}

/// Nil yields `None` and consumes exactly one byte; anything else
/// materializes storage on first write, then recurses.
impl<T: Decode + Default> Decode for Option<T> {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        if dec.take_nil()? {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).decode_into(dec)
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        if dec.take_nil()? {
            self.clear();
            return Ok(());
        }
        let count = dec.read_array_header("array")?;
        dec.check_min_remaining(count)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let mut item = T::default();
            item.decode_into(dec)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }
}

/// Fixed-length destination: the decoded count may not exceed the capacity;
/// slots past the count keep their prior contents.
impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        if dec.take_nil()? {
            return Ok(());
        }
        let count = dec.read_array_header("array")?;
        if count > N {
            return Err(PackError::LengthMismatch {
                capacity: N,
                count,
            });
        }
        dec.check_min_remaining(count)?;
        for slot in self.iter_mut().take(count) {
            slot.decode_into(dec)?;
        }
        Ok(())
    }
}

macro_rules! impl_decode_string_map {
    ($($map:ident),*) => {$(
        impl<V: Decode + Default> Decode for $map<String, V> {
            fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
                if dec.take_nil()? {
                    self.clear();
                    return Ok(());
                }
                let count = dec.read_map_header("map")?;
                dec.check_min_remaining(count.saturating_mul(2))?;
                let mut out = Self::default();
                for _ in 0..count {
                    let mut key = String::new();
                    key.decode_into(dec)?;
                    let mut val = V::default();
                    val.decode_into(dec)?;
                    // Duplicate wire keys: last write wins.
                    out.insert(key, val);
                }
                *self = out;
                Ok(())
            }
        }
    )*};
}

impl_decode_string_map!(HashMap, BTreeMap);

impl Decode for Value {
    fn decode_into(&mut self, dec: &mut Decoder<'_>) -> Result<(), PackError> {
        *self = dec.read_value()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn skip_over(bytes: &[u8]) -> usize {
        let mut dec = Decoder::new(bytes);
        dec.skip_value().unwrap();
        dec.pos()
    }

    #[test]
    fn skip_walk_covers_every_tag_family() {
        for value in [
            Value::Nil,
            Value::Bool(true),
            Value::Int(-5),
            Value::Int(-124),
            Value::Int(-40000),
            Value::UInt(130),
            Value::UInt(70000),
            Value::UInt(u64::MAX),
            Value::F32(1.5),
            Value::F64(-2.5),
            Value::Str("hello".to_owned()),
            Value::Str("x".repeat(300)),
            Value::Str("y".repeat(70000)),
            Value::Array(vec![Value::Int(1), Value::Str("a".to_owned())]),
            Value::Map(vec![(
                Value::Str("k".to_owned()),
                Value::Array(vec![Value::Nil]),
            )]),
        ] {
            let bytes = encode(&value).unwrap();
            assert_eq!(skip_over(&bytes), bytes.len(), "value {value:?}");
        }
    }

    #[test]
    fn skip_walk_stops_at_value_boundary() {
        let mut bytes = encode(&vec![1i64, 2, 3]).unwrap();
        bytes.push(0xff);
        let mut dec = Decoder::new(&bytes);
        dec.skip_value().unwrap();
        assert_eq!(dec.pos(), bytes.len() - 1);
    }

    #[test]
    fn skip_walk_rejects_reserved_code() {
        let mut dec = Decoder::new(&[0xc1]);
        assert!(matches!(
            dec.skip_value(),
            Err(PackError::InvalidCode { code: 0xc1, .. })
        ));
    }

    #[test]
    fn skip_walk_detects_truncated_composites() {
        // fixarray of 3 with only one element present
        let mut dec = Decoder::new(&[0x93, 0x01]);
        assert_eq!(dec.skip_value(), Err(PackError::TruncatedInput));
    }

    #[test]
    fn truncated_payload_is_an_error_not_a_panic() {
        let mut dest = 0i64;
        assert_eq!(
            decode(&[UINT32, 0x01], &mut dest),
            Err(PackError::TruncatedInput)
        );
        let mut v = Value::Nil;
        assert_eq!(decode(&[FLOAT32], &mut v), Err(PackError::TruncatedInput));
    }

    #[test]
    fn oversized_count_fails_before_allocation() {
        // MAP32 declaring u32::MAX pairs with no payload behind it.
        let bytes = [MAP32, 0xff, 0xff, 0xff, 0xff];
        let mut dest: HashMap<String, i64> = HashMap::new();
        assert_eq!(decode(&bytes, &mut dest), Err(PackError::TruncatedInput));
    }

    #[test]
    fn empty_input() {
        let mut dest = 0i64;
        assert_eq!(decode(&[], &mut dest), Err(PackError::EmptyInput));
    }

    #[test]
    fn signed_wire_value_into_unsigned_destination() {
        let bytes = encode(&-8i64).unwrap();
        let mut dest = 0u8;
        assert_eq!(
            decode(&bytes, &mut dest),
            Err(PackError::NotRepresentable { dest: "u8" })
        );
    }

    #[test]
    fn uint64_beyond_i64_range() {
        let bytes = encode(&u64::MAX).unwrap();
        let mut dest = 0i64;
        assert_eq!(
            decode(&bytes, &mut dest),
            Err(PackError::NotRepresentable { dest: "i64" })
        );
        let mut wide = 0u64;
        decode(&bytes, &mut wide).unwrap();
        assert_eq!(wide, u64::MAX);
    }

    #[test]
    fn negative_int64_into_u64_is_sign_loss() {
        let bytes = encode(&(i64::MIN + 12345)).unwrap();
        assert_eq!(bytes[0], INT64);
        let mut dest = 0u64;
        assert_eq!(
            decode(&bytes, &mut dest),
            Err(PackError::NotRepresentable { dest: "u64" })
        );
    }

    #[test]
    fn fixed_array_capacity() {
        let bytes = encode(&vec![1i64, 2, 3]).unwrap();
        let mut small = [0i64; 2];
        assert_eq!(
            decode(&bytes, &mut small),
            Err(PackError::LengthMismatch {
                capacity: 2,
                count: 3
            })
        );
        let mut exact = [0i64; 3];
        decode(&bytes, &mut exact).unwrap();
        assert_eq!(exact, [1, 2, 3]);
        // Larger destination: untouched tail keeps prior contents.
        let mut wide = [9i64; 4];
        decode(&bytes, &mut wide).unwrap();
        assert_eq!(wide, [1, 2, 3, 9]);
    }

    #[test]
    fn duplicate_map_keys_last_write_wins() {
        let value = Value::Map(vec![
            (Value::Str("k".to_owned()), Value::Int(1)),
            (Value::Str("k".to_owned()), Value::Int(2)),
        ]);
        let bytes = encode(&value).unwrap();
        let mut dest: HashMap<String, i64> = HashMap::new();
        decode(&bytes, &mut dest).unwrap();
        assert_eq!(dest.len(), 1);
        assert_eq!(dest["k"], 2);
    }

    #[test]
    fn dynamic_destination_keeps_duplicate_pairs() {
        let value = Value::Map(vec![
            (Value::Str("k".to_owned()), Value::Int(1)),
            (Value::Str("k".to_owned()), Value::Int(2)),
        ]);
        let bytes = encode(&value).unwrap();
        let mut dest = Value::Nil;
        decode(&bytes, &mut dest).unwrap();
        let Value::Map(pairs) = dest else {
            panic!("expected map");
        };
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn float_tag_mismatches() {
        let f64_bytes = encode(&1.5f64).unwrap();
        let mut narrow = 0.0f32;
        assert!(matches!(
            decode(&f64_bytes, &mut narrow),
            Err(PackError::InvalidCode {
                code: FLOAT64,
                ..
            })
        ));
        // Exact widening is allowed.
        let f32_bytes = encode(&1.5f32).unwrap();
        let mut wide = 0.0f64;
        decode(&f32_bytes, &mut wide).unwrap();
        assert_eq!(wide, 1.5);
    }

    #[test]
    fn string_into_bytes_skips_utf8_validation() {
        let mut raw = Vec::new();
        raw.push(FIXSTR | 2);
        raw.extend_from_slice(&[0xff, 0xfe]);
        let mut dest = Bytes::default();
        decode(&raw, &mut dest).unwrap();
        assert_eq!(dest.0, vec![0xff, 0xfe]);
        let mut s = String::new();
        assert_eq!(decode(&raw, &mut s), Err(PackError::InvalidUtf8));
    }
}
