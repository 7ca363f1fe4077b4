//! Round-trip checks for the derived `Encode`/`Decode` impls.

use scale_codec::error::ErrorKind;
use scale_codec::{decode, encode};
use scale_codec_derive::{Decode, Encode};

// Multi field named struct.
#[derive(Encode, Decode, Debug, PartialEq)]
// this should lead to no issues:
#[scale_codec(path = "::scale_codec")]
struct Header {
    version: u8,
    flags: u16,
    name: String,
}

// Multi field unnamed struct.
#[derive(Encode, Decode, Debug, PartialEq)]
struct Pair(u32, String);

// Unit struct; occupies no bytes at all.
#[derive(Encode, Decode, Clone, Debug, PartialEq)]
struct Empty;

// Struct with generic params.
#[derive(Encode, Decode, Debug, PartialEq)]
struct Wrapper<T> {
    value: T,
    extra: Option<T>,
}

#[derive(Encode, Decode, Debug, PartialEq)]
enum Message {
    Ping,
    Payload(Vec<u8>),
    Pair { left: u32, right: u32 },
}

fn roundtrips<T>(value: T)
where
    T: scale_codec::Encode + scale_codec::Decode + PartialEq + std::fmt::Debug,
{
    let bytes = encode(&value).expect("can encode");
    assert_eq!(decode::<T>(&bytes).expect("can decode"), value);
}

#[test]
fn derived_structs_roundtrip() {
    roundtrips(Header {
        version: 3,
        flags: 0xf00d,
        name: "genesis".to_string(),
    });
    roundtrips(Pair(42, "forty-two".to_string()));
    roundtrips(Empty);
    roundtrips(Wrapper {
        value: vec![1u64, 2, 3],
        extra: None,
    });
}

#[test]
fn derived_struct_fields_concatenate_in_declaration_order() {
    let bytes = encode(&Header {
        version: 1,
        flags: 2,
        name: "a".to_string(),
    })
    .expect("can encode");
    assert_eq!(bytes, [1, 2, 0, 0x04, b'a']);
}

#[test]
fn derived_enums_tag_variants_by_position() {
    let bytes = encode(&Message::Ping).expect("can encode");
    assert_eq!(bytes, [0]);

    let bytes = encode(&Message::Pair { left: 1, right: 2 }).expect("can encode");
    assert_eq!(bytes[0], 2);

    roundtrips(Message::Ping);
    roundtrips(Message::Payload(vec![9, 8, 7]));
    roundtrips(Message::Pair { left: 1, right: 2 });
}

#[test]
fn derived_enums_reject_unknown_indices() {
    let err = decode::<Message>(&[0x03]).expect_err("3 selects no variant");
    assert!(matches!(
        err.kind(),
        ErrorKind::WrongTypeIndex {
            index: 3,
            variant_count: 3
        }
    ));
}

#[test]
fn zero_sized_structs_are_capped_in_sequences() {
    // A sequence of zero-sized elements is all length prefix; the decoder
    // caps the declared count rather than trusting it.
    let many = vec![Empty; 100];
    roundtrips(many);

    // Compact encoding of 2^21, above the default cap of 2^20.
    let bytes = [0x02, 0x00, 0x80, 0x00];
    let err = decode::<Vec<Empty>>(&bytes).expect_err("over the zero-sized cap");
    assert!(matches!(err.kind(), ErrorKind::TooManyItems { .. }));
}

#[test]
fn decode_failures_attribute_the_failing_field() {
    // Header { version, flags, .. } with a name that is not valid UTF-8.
    let bytes = [1, 2, 0, 0x04, 0xff];
    let err = decode::<Header>(&bytes).expect_err("name is not UTF-8");
    assert_eq!(err.context().path().to_string(), "name");

    // The failing variant and field both appear in the path.
    let bytes = [2, 1, 0, 0, 0];
    let err = decode::<Message>(&bytes).expect_err("right is truncated");
    assert_eq!(err.context().path().to_string(), "(Pair).right");
}
