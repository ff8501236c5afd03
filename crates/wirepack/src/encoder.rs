//! Value tree to bytes.
//!
//! Two passes over one traversal order: the size pass computes the exact
//! serialized length of the whole tree, the write pass emits bytes into a
//! buffer allocated once at that length. Both passes share the ladder
//! helpers in [`crate::constants`], and the final cursor is checked against
//! the computed size.

use std::collections::{BTreeMap, HashMap};

use wirepack_buffers::FixedWriter;

use crate::constants::*;
use crate::error::PackError;
use crate::value::{Bytes, Value};

/// A value that can be serialized to the wire.
///
/// The two methods are the two encoder passes and must visit the value in
/// the identical order. Implementations derive every tag choice from the
/// runtime value, never from the declared width.
pub trait Encode {
    /// Size pass: the exact number of bytes [`Encode::write`] will emit.
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError>;

    /// Write pass: emit tag bytes and payload at the advancing cursor.
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError>;
}

/// Encoder state for one `encode` call.
///
/// Holds the fixed output buffer and the per-map key orders the size pass
/// resolved. Hash maps are the one traversal whose iteration order is not
/// reproducible on demand, so the size pass materializes each map's key
/// order once and the write pass replays it; slots are claimed in pre-order,
/// which is the order both passes visit maps in.
pub struct Encoder {
    w: FixedWriter,
    map_orders: Vec<Vec<String>>,
    replayed: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            w: FixedWriter::new(),
            map_orders: Vec::new(),
            replayed: 0,
        }
    }

    fn pass_desync(&self) -> PackError {
        PackError::SizeMismatch {
            computed: self.w.capacity(),
            written: self.w.pos(),
        }
    }

    /// Claims the next map-order slot during the size pass. Claimed before
    /// the map's entries are visited so nested maps land in later slots.
    pub(crate) fn reserve_map_order(&mut self) -> usize {
        self.map_orders.push(Vec::new());
        self.map_orders.len() - 1
    }

    pub(crate) fn finish_map_order(
        &mut self,
        slot: usize,
        order: Vec<String>,
    ) -> Result<(), PackError> {
        match self.map_orders.get_mut(slot) {
            Some(entry) => {
                *entry = order;
                Ok(())
            }
            None => Err(self.pass_desync()),
        }
    }

    /// Consumes the next recorded key order during the write pass.
    pub(crate) fn take_map_order(&mut self) -> Result<Vec<String>, PackError> {
        let slot = self.replayed;
        if slot >= self.map_orders.len() {
            return Err(self.pass_desync());
        }
        self.replayed += 1;
        Ok(std::mem::take(&mut self.map_orders[slot]))
    }

    pub fn write_nil(&mut self) -> Result<(), PackError> {
        Ok(self.w.u8(NIL)?)
    }

    pub fn write_bool(&mut self, val: bool) -> Result<(), PackError> {
        Ok(self.w.u8(if val { TRUE } else { FALSE })?)
    }

    /// Emits an unsigned integer with the narrowest covering representation.
    pub fn write_uint(&mut self, val: u64) -> Result<(), PackError> {
        if val <= FIXINT_MAX as u64 {
            self.w.u8(val as u8)?;
        } else if val <= u8::MAX as u64 {
            self.w.u8(UINT8)?;
            self.w.u8(val as u8)?;
        } else if val <= u16::MAX as u64 {
            self.w.u8(UINT16)?;
            self.w.u16(val as u16)?;
        } else if val <= u32::MAX as u64 {
            self.w.u8(UINT32)?;
            self.w.u32(val as u32)?;
        } else {
            self.w.u8(UINT64)?;
            self.w.u64(val)?;
        }
        Ok(())
    }

    /// Emits a signed integer. Non-negative values ride the unsigned
    /// ladder; negatives pick the narrowest signed form, starting with the
    /// 5-bit fixint band.
    pub fn write_int(&mut self, val: i64) -> Result<(), PackError> {
        if val >= 0 {
            return self.write_uint(val as u64);
        }
        if val >= -32 {
            self.w.u8(val as i8 as u8)?;
        } else if val >= i8::MIN as i64 {
            self.w.u8(INT8)?;
            self.w.u8(val as i8 as u8)?;
        } else if val >= i16::MIN as i64 {
            self.w.u8(INT16)?;
            self.w.u16(val as i16 as u16)?;
        } else if val >= i32::MIN as i64 {
            self.w.u8(INT32)?;
            self.w.u32(val as i32 as u32)?;
        } else {
            self.w.u8(INT64)?;
            self.w.u64(val as u64)?;
        }
        Ok(())
    }

    pub fn write_f32(&mut self, val: f32) -> Result<(), PackError> {
        self.w.u8(FLOAT32)?;
        Ok(self.w.f32(val)?)
    }

    pub fn write_f64(&mut self, val: f64) -> Result<(), PackError> {
        self.w.u8(FLOAT64)?;
        Ok(self.w.f64(val)?)
    }

    pub fn write_str(&mut self, val: &str) -> Result<(), PackError> {
        self.write_byte_run(val.as_bytes())
    }

    /// Emits a string-family byte run: tag, length prefix per the ladder,
    /// then the bytes verbatim.
    pub fn write_byte_run(&mut self, bytes: &[u8]) -> Result<(), PackError> {
        let len = bytes.len();
        if len <= FIX_STR_MAX {
            self.w.u8(FIXSTR | len as u8)?;
        } else if len <= u8::MAX as usize {
            self.w.u8(STR8)?;
            self.w.u8(len as u8)?;
        } else if len <= u16::MAX as usize {
            self.w.u8(STR16)?;
            self.w.u16(len as u16)?;
        } else if len as u64 <= u32::MAX as u64 {
            self.w.u8(STR32)?;
            self.w.u32(len as u32)?;
        } else {
            return Err(PackError::CountOverflow { len });
        }
        Ok(self.w.buf_bytes(bytes)?)
    }

    pub fn write_array_header(&mut self, count: usize) -> Result<(), PackError> {
        self.write_seq_header(count, FIXARRAY, ARRAY16, ARRAY32)
    }

    pub fn write_map_header(&mut self, count: usize) -> Result<(), PackError> {
        self.write_seq_header(count, FIXMAP, MAP16, MAP32)
    }

    fn write_seq_header(
        &mut self,
        count: usize,
        fix: u8,
        tag16: u8,
        tag32: u8,
    ) -> Result<(), PackError> {
        if count <= FIX_SEQ_MAX {
            self.w.u8(fix | count as u8)?;
        } else if count <= u16::MAX as usize {
            self.w.u8(tag16)?;
            self.w.u16(count as u16)?;
        } else if count as u64 <= u32::MAX as u64 {
            self.w.u8(tag32)?;
            self.w.u32(count as u32)?;
        } else {
            return Err(PackError::CountOverflow { len: count });
        }
        Ok(())
    }
}

/// Serializes a value tree to its exact-length byte encoding.
///
/// Runs the size pass, allocates a buffer of exactly that size, runs the
/// write pass, and asserts the final cursor equals the computed size.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, PackError> {
    let mut enc = Encoder::new();
    let size = value.compute_size(&mut enc)?;
    enc.w = FixedWriter::with_capacity(size);
    if let Err(err) = value.write(&mut enc) {
        return Err(match err {
            PackError::SizeMismatch { .. } => enc.pass_desync(),
            other => other,
        });
    }
    let written = enc.w.pos();
    if written != size {
        return Err(PackError::SizeMismatch {
            computed: size,
            written,
        });
    }
    Ok(enc.w.into_vec())
}

macro_rules! impl_encode_uint {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
                Ok(uint_tagged_len(*self as u64))
            }
            fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
                enc.write_uint(*self as u64)
            }
        }
    )*};
}

macro_rules! impl_encode_int {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
                Ok(int_tagged_len(*self as i64))
            }
            fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
                enc.write_int(*self as i64)
            }
        }
    )*};
}

impl_encode_uint!(u8, u16, u32, u64);
impl_encode_int!(i8, i16, i32, i64);

impl Encode for bool {
    fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
        Ok(1)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_bool(*self)
    }
}

impl Encode for f32 {
    fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
        Ok(5)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_f32(*self)
    }
}

impl Encode for f64 {
    fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
        Ok(9)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_f64(*self)
    }
}

impl Encode for str {
    fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
        str_tagged_len(self.len())
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_str(self)
    }
}

impl Encode for String {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        self.as_str().compute_size(enc)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_str(self)
    }
}

impl Encode for Bytes {
    fn compute_size(&self, _enc: &mut Encoder) -> Result<usize, PackError> {
        str_tagged_len(self.0.len())
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_byte_run(&self.0)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        (**self).compute_size(enc)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        (**self).write(enc)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        (**self).compute_size(enc)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        (**self).write(enc)
    }
}

/// An absent value contributes exactly one Nil byte and short-circuits its
/// subtree.
impl<T: Encode> Encode for Option<T> {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        match self {
            None => Ok(1),
            Some(inner) => inner.compute_size(enc),
        }
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        match self {
            None => enc.write_nil(),
            Some(inner) => inner.write(enc),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        let mut size = seq_header_len(self.len())?;
        for item in self {
            size += item.compute_size(enc)?;
        }
        Ok(size)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_array_header(self.len())?;
        for item in self {
            item.write(enc)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        self.as_slice().compute_size(enc)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        self.as_slice().write(enc)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        self[..].compute_size(enc)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        self[..].write(enc)
    }
}

impl<V: Encode> Encode for HashMap<String, V> {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        let slot = enc.reserve_map_order();
        let mut size = seq_header_len(self.len())?;
        let mut order = Vec::with_capacity(self.len());
        for (key, val) in self {
            size += str_tagged_len(key.len())?;
            size += val.compute_size(enc)?;
            order.push(key.clone());
        }
        enc.finish_map_order(slot, order)?;
        Ok(size)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_map_header(self.len())?;
        let order = enc.take_map_order()?;
        for key in &order {
            let Some(val) = self.get(key) else {
                return Err(enc.pass_desync());
            };
            enc.write_str(key)?;
            val.write(enc)?;
        }
        Ok(())
    }
}

/// Ordered map: iteration is deterministic, so no key order is recorded.
impl<V: Encode> Encode for BTreeMap<String, V> {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        let mut size = seq_header_len(self.len())?;
        for (key, val) in self {
            size += str_tagged_len(key.len())?;
            size += val.compute_size(enc)?;
        }
        Ok(size)
    }
    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        enc.write_map_header(self.len())?;
        for (key, val) in self {
            enc.write_str(key)?;
            val.write(enc)?;
        }
        Ok(())
    }
}

impl Encode for Value {
    fn compute_size(&self, enc: &mut Encoder) -> Result<usize, PackError> {
        match self {
            Value::Nil | Value::Bool(_) => Ok(1),
            Value::Int(val) => Ok(int_tagged_len(*val)),
            Value::UInt(val) => Ok(uint_tagged_len(*val)),
            Value::F32(_) => Ok(5),
            Value::F64(_) => Ok(9),
            Value::Str(s) => str_tagged_len(s.len()),
            Value::Bytes(b) => str_tagged_len(b.len()),
            Value::Array(items) => {
                let mut size = seq_header_len(items.len())?;
                for item in items {
                    size += item.compute_size(enc)?;
                }
                Ok(size)
            }
            Value::Map(pairs) => {
                let mut size = seq_header_len(pairs.len())?;
                for (key, val) in pairs {
                    size += key.compute_size(enc)?;
                    size += val.compute_size(enc)?;
                }
                Ok(size)
            }
        }
    }

    fn write(&self, enc: &mut Encoder) -> Result<(), PackError> {
        match self {
            Value::Nil => enc.write_nil(),
            Value::Bool(val) => enc.write_bool(*val),
            Value::Int(val) => enc.write_int(*val),
            Value::UInt(val) => enc.write_uint(*val),
            Value::F32(val) => enc.write_f32(*val),
            Value::F64(val) => enc.write_f64(*val),
            Value::Str(s) => enc.write_str(s),
            Value::Bytes(b) => enc.write_byte_run(b),
            Value::Array(items) => {
                enc.write_array_header(items.len())?;
                for item in items {
                    item.write(enc)?;
                }
                Ok(())
            }
            Value::Map(pairs) => {
                enc.write_map_header(pairs.len())?;
                for (key, val) in pairs {
                    key.write(enc)?;
                    val.write(enc)?;
                }
                Ok(())
            }
        }
    }
}
