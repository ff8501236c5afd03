//! Field projection for record types.
//!
//! A record serializes as a map with a fixed, compile-time-declared field
//! order: each field carries a wire name and three fn pointers covering the
//! encoder's two passes and the decoder. The projection for a type is built
//! once, on first use, inside a per-type `OnceLock` static; concurrent
//! callers observe a single computation and the result lives for the rest
//! of the process.
//!
//! [`wire_fields!`](crate::wire_fields) generates the implementation from an
//! explicit `field => "wire-name"` list. A struct field left off the list is
//! excluded from the wire entirely; renaming is just a different string.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::PackError;

/// One serializable field of a record: its wire name plus accessors for
/// sizing, writing, and reading it.
pub struct Field<T> {
    pub name: &'static str,
    pub size: fn(&T, &mut Encoder) -> Result<usize, PackError>,
    pub write: fn(&T, &mut Encoder) -> Result<(), PackError>,
    pub read: fn(&mut T, &mut Decoder<'_>) -> Result<(), PackError>,
}

/// The resolved, ordered field list of a record type.
pub struct Projection<T> {
    pub fields: Vec<Field<T>>,
}

/// A structured type with a cached field projection.
pub trait Record: Sized {
    /// The projection, computed once per type for the process lifetime.
    fn projection() -> &'static Projection<Self>;
}

/// Size pass for a record: map header plus each wire name and field value.
/// Field enumeration order comes from the projection, identically in both
/// passes.
pub fn record_size<T: Record + 'static>(value: &T, enc: &mut Encoder) -> Result<usize, PackError> {
    let projection = T::projection();
    let mut size = crate::constants::seq_header_len(projection.fields.len())?;
    for field in &projection.fields {
        size += crate::constants::str_tagged_len(field.name.len())?;
        size += (field.size)(value, enc)?;
    }
    Ok(size)
}

/// Write pass for a record.
pub fn record_write<T: Record + 'static>(value: &T, enc: &mut Encoder) -> Result<(), PackError> {
    let projection = T::projection();
    enc.write_map_header(projection.fields.len())?;
    for field in &projection.fields {
        enc.write_str(field.name)?;
        (field.write)(value, enc)?;
    }
    Ok(())
}

/// Structured field matching: each decoded key is looked up against the
/// projection by byte length then byte content; a match decodes into that
/// field, anything else is structurally skipped.
pub fn record_read<T: Record + 'static>(dest: &mut T, dec: &mut Decoder<'_>) -> Result<(), PackError> {
    let count = dec.read_map_header("record")?;
    let projection = T::projection();
    for _ in 0..count {
        let key = dec.read_str_bytes("record key")?;
        let field = projection
            .fields
            .iter()
            .find(|f| f.name.len() == key.len() && f.name.as_bytes() == key);
        match field {
            Some(field) => (field.read)(dest, dec)?,
            None => dec.skip_value()?,
        }
    }
    Ok(())
}

/// Implements [`Record`], [`Encode`](crate::Encode), and
/// [`Decode`](crate::Decode) for a concrete struct from an ordered
/// `field => "wire-name"` list.
///
/// ```
/// use wirepack::wire_fields;
///
/// #[derive(Debug, Default, PartialEq)]
/// pub struct Point {
///     pub x: i64,
///     pub y: i64,
///     pub scratch: bool, // not on the wire
/// }
///
/// wire_fields!(Point { x => "x", y => "y" });
///
/// let bytes = wirepack::encode(&Point { x: 1, y: 2, scratch: true }).unwrap();
/// let mut back = Point::default();
/// wirepack::decode(&bytes, &mut back).unwrap();
/// assert_eq!(back, Point { x: 1, y: 2, scratch: false });
/// ```
#[macro_export]
macro_rules! wire_fields {
    ($ty:ty { $($field:ident => $name:literal),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn projection() -> &'static $crate::Projection<Self> {
                static PROJECTION: ::std::sync::OnceLock<$crate::Projection<$ty>> =
                    ::std::sync::OnceLock::new();
                PROJECTION.get_or_init(|| $crate::Projection {
                    fields: ::std::vec![
                        $($crate::Field {
                            name: $name,
                            size: {
                                fn size(
                                    value: &$ty,
                                    enc: &mut $crate::Encoder,
                                ) -> ::std::result::Result<usize, $crate::PackError> {
                                    $crate::Encode::compute_size(&value.$field, enc)
                                }
                                size
                            },
                            write: {
                                fn write(
                                    value: &$ty,
                                    enc: &mut $crate::Encoder,
                                ) -> ::std::result::Result<(), $crate::PackError> {
                                    $crate::Encode::write(&value.$field, enc)
                                }
                                write
                            },
                            read: {
                                fn read(
                                    dest: &mut $ty,
                                    dec: &mut $crate::Decoder<'_>,
                                ) -> ::std::result::Result<(), $crate::PackError> {
                                    $crate::Decode::decode_into(&mut dest.$field, dec)
                                }
                                read
                            },
                        },)*
                    ],
                })
            }
        }

        impl $crate::Encode for $ty {
            fn compute_size(
                &self,
                enc: &mut $crate::Encoder,
            ) -> ::std::result::Result<usize, $crate::PackError> {
                $crate::fields::record_size(self, enc)
            }
            fn write(
                &self,
                enc: &mut $crate::Encoder,
            ) -> ::std::result::Result<(), $crate::PackError> {
                $crate::fields::record_write(self, enc)
            }
        }

        impl $crate::Decode for $ty {
            fn decode_into(
                &mut self,
                dec: &mut $crate::Decoder<'_>,
            ) -> ::std::result::Result<(), $crate::PackError> {
                $crate::fields::record_read(self, dec)
            }
        }
    };
}
