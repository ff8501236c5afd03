//! Record projections: declared field order, renames, exclusions, and the
//! structural skip of fields the destination does not know.

use wirepack::{decode, encode, wire_fields, PackError, Value};

#[derive(Debug, Default, PartialEq)]
struct Full {
    one: i64,
    two: String,
    three: bool,
    hidden: i64,
}

wire_fields!(Full {
    one => "One",
    two => "two",
    three => "three",
});

#[derive(Debug, Default, PartialEq)]
struct Partial {
    two: String,
}

wire_fields!(Partial { two => "two" });

#[test]
fn fields_travel_in_declared_order_under_wire_names() {
    let value = Full {
        one: 1,
        two: "2".to_owned(),
        three: true,
        hidden: 99,
    };
    let bytes = encode(&value).unwrap();
    let mut dynamic = Value::Nil;
    decode(&bytes, &mut dynamic).unwrap();
    assert_eq!(
        dynamic,
        Value::Map(vec![
            (Value::Str("One".to_owned()), Value::Int(1)),
            (Value::Str("two".to_owned()), Value::Str("2".to_owned())),
            (Value::Str("three".to_owned()), Value::Bool(true)),
        ])
    );
}

#[test]
fn unknown_fields_are_skipped_structurally() {
    let value = Full {
        one: 1,
        two: "2".to_owned(),
        three: true,
        hidden: 0,
    };
    let bytes = encode(&value).unwrap();
    let mut narrow = Partial::default();
    decode(&bytes, &mut narrow).unwrap();
    assert_eq!(narrow.two, "2");
}

#[test]
fn unknown_composite_fields_are_skipped_whole() {
    // A destination that knows none of the nested shapes still lands the
    // cursor exactly at the end of the input.
    let wire = Value::Map(vec![
        (
            Value::Str("junk".to_owned()),
            Value::Map(vec![(
                Value::Str("deep".to_owned()),
                Value::Array(vec![Value::Int(1), Value::Str("x".repeat(300))]),
            )]),
        ),
        (Value::Str("two".to_owned()), Value::Str("kept".to_owned())),
        (Value::Str("more".to_owned()), Value::F64(2.5)),
    ]);
    let bytes = encode(&wire).unwrap();
    let mut dest = Partial::default();
    decode(&bytes, &mut dest).unwrap();
    assert_eq!(dest.two, "kept");
}

#[test]
fn decoding_stops_if_unknown_field_holds_a_reserved_code() {
    // fixmap{1}, fixstr "z", then the reserved 0xc1 where a value should be.
    let bytes = [0x81, 0xa1, b'z', 0xc1];
    let mut dest = Partial::default();
    assert!(matches!(
        decode(&bytes, &mut dest),
        Err(PackError::InvalidCode { code: 0xc1, .. })
    ));
}

#[test]
fn missing_fields_leave_the_destination_untouched() {
    let bytes = encode(&Partial {
        two: "only".to_owned(),
    })
    .unwrap();
    let mut dest = Full {
        one: 7,
        two: String::new(),
        three: true,
        hidden: 3,
    };
    decode(&bytes, &mut dest).unwrap();
    assert_eq!(dest.one, 7);
    assert_eq!(dest.two, "only");
    assert!(dest.three);
    assert_eq!(dest.hidden, 3);
}

#[derive(Debug, Default, PartialEq)]
struct Renamed {
    h_offset: i64,
    on_mouse_up: String,
}

wire_fields!(Renamed {
    h_offset => "hOffset",
    on_mouse_up => "onMouseUp",
});

#[test]
fn renamed_fields_roundtrip_by_wire_name() {
    let value = Renamed {
        h_offset: 250,
        on_mouse_up: "sun1.opacity = 0".to_owned(),
    };
    let bytes = encode(&value).unwrap();
    let mut dynamic = Value::Nil;
    decode(&bytes, &mut dynamic).unwrap();
    let Value::Map(pairs) = &dynamic else {
        panic!("expected map");
    };
    assert_eq!(pairs[0].0, Value::Str("hOffset".to_owned()));
    assert_eq!(pairs[1].0, Value::Str("onMouseUp".to_owned()));
    let mut back = Renamed::default();
    decode(&bytes, &mut back).unwrap();
    assert_eq!(back, value);
}

#[derive(Debug, Default, PartialEq)]
struct WithMap {
    name: String,
    attrs: std::collections::HashMap<String, i64>,
}

wire_fields!(WithMap { name => "name", attrs => "attrs" });

#[test]
fn hash_map_field_sizes_and_writes_in_one_iteration_order() {
    // The two encoder passes must see the hash map in the same order even
    // though that order is unspecified; a desync would surface as
    // SizeMismatch.
    let mut value = WithMap {
        name: "m".to_owned(),
        attrs: Default::default(),
    };
    for i in 0..64 {
        value.attrs.insert(format!("attr{i}"), i);
    }
    let bytes = encode(&value).unwrap();
    let mut back = WithMap::default();
    decode(&bytes, &mut back).unwrap();
    assert_eq!(back, value);
}

#[test]
fn duplicate_record_keys_last_write_wins() {
    let wire = Value::Map(vec![
        (Value::Str("two".to_owned()), Value::Str("first".to_owned())),
        (Value::Str("two".to_owned()), Value::Str("second".to_owned())),
    ]);
    let bytes = encode(&wire).unwrap();
    let mut dest = Partial::default();
    decode(&bytes, &mut dest).unwrap();
    assert_eq!(dest.two, "second");
}
