//! Exact-presize MessagePack-subset codec.
//!
//! Converts an in-memory value tree to and from a compact binary encoding
//! (a strict subset of the MessagePack grammar: no extension types, no bin
//! family, no timestamps; byte runs travel on the string family). The
//! encoder computes the exact output size before allocating, writes into a
//! single fixed buffer, and checks that both passes agree. The decoder
//! walks the byte stream once, guided by the shape of a caller-supplied
//! destination, skipping unknown record fields structurally and rejecting
//! any value the destination cannot represent exactly.
//!
//! # Example
//!
//! ```
//! use wirepack::{decode, encode, Value};
//!
//! let value = Value::Map(vec![
//!     (Value::Str("answer".to_owned()), Value::Int(42)),
//! ]);
//! let bytes = encode(&value).unwrap();
//! let mut back = Value::Nil;
//! decode(&bytes, &mut back).unwrap();
//! assert_eq!(back, value);
//! ```
//!
//! Typed destinations implement [`Encode`] and [`Decode`]; structs get both
//! through [`wire_fields!`], which also resolves the field projection (wire
//! names, order, exclusions) once per type.

pub mod constants;
mod decoder;
mod encoder;
mod error;
pub mod fields;
mod json;
mod value;

pub use decoder::{decode, Decode, Decoder};
pub use encoder::{encode, Encode, Encoder};
pub use error::PackError;
pub use fields::{Field, Projection, Record};
pub use value::{Bytes, Value};
