//! Fixed-capacity binary writer.

use crate::BufferError;

/// Writes big-endian binary data into a buffer of fixed, pre-computed size.
///
/// The buffer is allocated once at construction and never reallocates; a
/// write past the capacity returns [`BufferError::Overflow`]. This is the
/// write half of an exact-presize encoder: the caller computes the total
/// output size up front, allocates once, then appends at the advancing
/// cursor.
pub struct FixedWriter {
    buf: Vec<u8>,
    x: usize,
}

impl Default for FixedWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWriter {
    /// Creates a writer with zero capacity. Useful as a placeholder before
    /// the final size is known.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Allocates a buffer of exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            x: 0,
        }
    }

    /// Current cursor position (bytes written so far).
    #[inline]
    pub fn pos(&self) -> usize {
        self.x
    }

    /// Total buffer capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if self.buf.len() - self.x < n {
            return Err(BufferError::Overflow);
        }
        Ok(())
    }

    /// Consumes the writer and returns the underlying buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn u8(&mut self, val: u8) -> Result<(), BufferError> {
        self.check(1)?;
        self.buf[self.x] = val;
        self.x += 1;
        Ok(())
    }

    #[inline]
    pub fn u16(&mut self, val: u16) -> Result<(), BufferError> {
        self.buf_bytes(&val.to_be_bytes())
    }

    #[inline]
    pub fn u32(&mut self, val: u32) -> Result<(), BufferError> {
        self.buf_bytes(&val.to_be_bytes())
    }

    #[inline]
    pub fn u64(&mut self, val: u64) -> Result<(), BufferError> {
        self.buf_bytes(&val.to_be_bytes())
    }

    #[inline]
    pub fn f32(&mut self, val: f32) -> Result<(), BufferError> {
        self.buf_bytes(&val.to_be_bytes())
    }

    #[inline]
    pub fn f64(&mut self, val: f64) -> Result<(), BufferError> {
        self.buf_bytes(&val.to_be_bytes())
    }

    /// Copies a byte run verbatim at the cursor.
    pub fn buf_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.check(bytes.len())?;
        let x = self.x;
        self.buf[x..x + bytes.len()].copy_from_slice(bytes);
        self.x = x + bytes.len();
        Ok(())
    }
}
