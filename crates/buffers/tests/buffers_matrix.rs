//! Writer/Reader roundtrip matrix for the buffers crate.

use wirepack_buffers::{BufferError, FixedWriter, Reader};

#[test]
fn roundtrip_u8() {
    let mut w = FixedWriter::with_capacity(3);
    w.u8(0x00).unwrap();
    w.u8(0x7f).unwrap();
    w.u8(0xff).unwrap();
    let data = w.into_vec();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8().unwrap(), 0x00);
    assert_eq!(r.u8().unwrap(), 0x7f);
    assert_eq!(r.u8().unwrap(), 0xff);
}

#[test]
fn roundtrip_i8() {
    let mut w = FixedWriter::with_capacity(4);
    for v in [i8::MIN, -1, 0, i8::MAX] {
        w.u8(v as u8).unwrap();
    }
    let data = w.into_vec();
    let mut r = Reader::new(&data);
    assert_eq!(r.i8().unwrap(), i8::MIN);
    assert_eq!(r.i8().unwrap(), -1);
    assert_eq!(r.i8().unwrap(), 0);
    assert_eq!(r.i8().unwrap(), i8::MAX);
}

#[test]
fn roundtrip_multibyte_big_endian() {
    let mut w = FixedWriter::with_capacity(2 + 4 + 8);
    w.u16(0xbeef).unwrap();
    w.u32(0xdeadbeef).unwrap();
    w.u64(0x0102030405060708).unwrap();
    let data = w.into_vec();
    assert_eq!(&data[..2], [0xbe, 0xef]);
    let mut r = Reader::new(&data);
    assert_eq!(r.u16().unwrap(), 0xbeef);
    assert_eq!(r.u32().unwrap(), 0xdeadbeef);
    assert_eq!(r.u64().unwrap(), 0x0102030405060708);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn roundtrip_signed_multibyte() {
    let mut w = FixedWriter::with_capacity(2 + 4 + 8);
    w.u16(i16::MIN as u16).unwrap();
    w.u32(-5i32 as u32).unwrap();
    w.u64(i64::MIN as u64).unwrap();
    let data = w.into_vec();
    let mut r = Reader::new(&data);
    assert_eq!(r.i16().unwrap(), i16::MIN);
    assert_eq!(r.i32().unwrap(), -5);
    assert_eq!(r.i64().unwrap(), i64::MIN);
}

#[test]
fn roundtrip_floats_bit_exact() {
    let mut w = FixedWriter::with_capacity(4 + 8 + 8);
    w.f32(f32::MIN_POSITIVE).unwrap();
    w.f64(-0.25).unwrap();
    w.f64(f64::NAN).unwrap();
    let data = w.into_vec();
    let mut r = Reader::new(&data);
    assert_eq!(r.f32().unwrap(), f32::MIN_POSITIVE);
    assert_eq!(r.f64().unwrap(), -0.25);
    assert!(r.f64().unwrap().is_nan());
}

#[test]
fn roundtrip_byte_runs() {
    let payload = b"binary \xff payload";
    let mut w = FixedWriter::with_capacity(payload.len());
    w.buf_bytes(payload).unwrap();
    let data = w.into_vec();
    let mut r = Reader::new(&data);
    assert_eq!(r.buf(payload.len()).unwrap(), payload);
}

#[test]
fn writer_capacity_is_a_hard_limit() {
    let mut w = FixedWriter::with_capacity(2);
    w.u8(1).unwrap();
    assert_eq!(w.u16(0x0203), Err(BufferError::Overflow));
    // The failed write left the remaining byte untouched.
    w.u8(2).unwrap();
    assert_eq!(w.into_vec(), vec![1, 2]);
}

#[test]
fn reader_errors_are_not_sticky() {
    let data = [0x01, 0x02];
    let mut r = Reader::new(&data);
    assert_eq!(r.u32(), Err(BufferError::EndOfBuffer));
    assert_eq!(r.u16().unwrap(), 0x0102);
}
