//! Dynamic wire value.

/// A decoded or to-be-encoded wire value of no particular static shape.
///
/// This is the "any value" destination: a closed sum over everything the
/// wire grammar can carry. `Map` is an ordered sequence of key/value pairs,
/// so the encoder's size pass and write pass trivially agree on pair order,
/// and duplicate keys survive a dynamic round trip untouched.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// A byte run carried on the string family (this wire subset has no bin
/// family). Encodes its bytes verbatim; decodes from any string-family tag
/// without UTF-8 validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl PartialEq for Value {
    /// Structural equality with two wire-driven allowances: `Int`/`UInt`
    /// compare by exact numeric value (the encoder picks the tag family from
    /// the runtime magnitude, so a round trip may switch variants), and
    /// `Str`/`Bytes` compare by byte content (byte runs travel on the string
    /// family and decode back as `Str` when they happen to be valid UTF-8).
    fn eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Int(a), UInt(b)) | (UInt(b), Int(a)) => *a >= 0 && *a as u64 == *b,
            (F32(a), F32(b)) => a == b,
            (F64(a), F64(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Str(a), Bytes(b)) | (Bytes(b), Str(a)) => a.as_bytes() == &b[..],
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// True for `Value::Nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}
