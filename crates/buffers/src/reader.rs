//! Bounds-checked binary reader with cursor tracking.

use std::str;

use crate::BufferError;

/// Reads big-endian binary data from a borrowed byte slice.
///
/// The reader maintains a cursor position; every read method checks the
/// remaining length first and returns [`BufferError::EndOfBuffer`] instead of
/// panicking when the input is truncated.
pub struct Reader<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Current cursor position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.x
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if self.remaining() < n {
            return Err(BufferError::EndOfBuffer);
        }
        Ok(())
    }

    /// Returns the current byte without advancing the cursor.
    #[inline]
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.data[self.x])
    }

    /// Advances the cursor by `n` bytes.
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    /// Returns the next `n` bytes and advances the cursor.
    pub fn buf(&mut self, n: usize) -> Result<&'a [u8], BufferError> {
        self.check(n)?;
        let x = self.x;
        self.x = x + n;
        Ok(&self.data[x..x + n])
    }

    /// Reads `n` bytes as a UTF-8 string slice.
    pub fn utf8(&mut self, n: usize) -> Result<&'a str, BufferError> {
        let bytes = self.buf(n)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.u8()? as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.check(2)?;
        let x = self.x;
        let val = u16::from_be_bytes([self.data[x], self.data[x + 1]]);
        self.x = x + 2;
        Ok(val)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.check(4)?;
        let x = self.x;
        let val = u32::from_be_bytes([
            self.data[x],
            self.data[x + 1],
            self.data[x + 2],
            self.data[x + 3],
        ]);
        self.x = x + 4;
        Ok(val)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.check(8)?;
        let x = self.x;
        let val = u64::from_be_bytes([
            self.data[x],
            self.data[x + 1],
            self.data[x + 2],
            self.data[x + 3],
            self.data[x + 4],
            self.data[x + 5],
            self.data[x + 6],
            self.data[x + 7],
        ]);
        self.x = x + 8;
        Ok(val)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(self.u16()? as i16)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(self.u32()? as i32)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(self.u64()? as i64)
    }

    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.u32()?))
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.u64()?))
    }
}
