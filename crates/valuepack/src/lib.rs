//! Tagged-value marshaling codec with exact 64-bit limb arithmetic.
//!
//! Three pieces form one subsystem:
//! - [`value`] — the dynamically tagged, reference-counted value model
//! - [`int64`] — exact signed 64-bit arithmetic over 24-bit limbs
//! - [`compare`] / [`hash`] — structural ordering and bounded hashing
//! - [`marshal`] — the binary wire codec, with an object-sharing table
//!   that preserves aliasing across a round trip
//!
//! Encode, decode, compare and hash are pure synchronous functions over
//! in-memory buffers: no I/O, no logging, no global state. All failures
//! propagate as typed `Result` errors.

pub mod compare;
pub mod hash;
pub mod int64;
pub mod marshal;
pub mod value;

pub use compare::{compare, total_compare};
pub use hash::hash;
pub use int64::{Int64, Int64Error};
pub use marshal::{data_size, decode, encode, DecodeError, EncodeError, MarshalDecoder, MarshalEncoder};
pub use value::{Block, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::rc::Rc;

    #[test]
    fn roundtrip_mixed_block() {
        let v = Value::block(
            0,
            vec![
                Value::Int(1),
                Value::bytes(*b"hi"),
                Value::Int64(Int64::from(10_000_000_000i64)),
            ],
        );
        let bytes = encode(&v).expect("encode");
        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);

        // data_size reports the full message length: body plus header
        let block_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(data_size(&bytes, 0), Ok(block_len + 20));
        assert_eq!(data_size(&bytes, 0).unwrap() as usize, bytes.len());
    }

    #[test]
    fn roundtrip_scalars() {
        let values = vec![
            Value::Int(0),
            Value::Int(63),
            Value::Int(64),
            Value::Int(-1),
            Value::Int(i32::MIN),
            Value::Int(i32::MAX),
            Value::Double(0.5),
            Value::Double(-0.0),
            Value::Double(f64::INFINITY),
            Value::Int64(Int64::from(i64::MIN)),
            Value::Int64(Int64::from(-1i64)),
            Value::bytes(*b""),
            Value::bytes(vec![0u8; 300]),
            Value::block(0, vec![]),
            Value::block(20, vec![]),
        ];
        for v in values {
            let bytes = encode(&v).expect("encode");
            let back = decode(&bytes, 0).expect("decode");
            assert_eq!(total_compare(&v, &back), Ordering::Equal, "roundtrip {v:?}");
        }
    }

    #[test]
    fn roundtrip_nested() {
        let v = Value::block(
            2,
            vec![
                Value::block(0, vec![Value::Int(-300), Value::Double(2.5)]),
                Value::bytes(*b"a longer byte string that will not fit a packed header"),
                Value::block(16, (0..20).map(Value::Int).collect()),
            ],
        );
        let bytes = encode(&v).expect("encode");
        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
    }

    #[test]
    fn forward_is_unwrapped_by_the_codec() {
        let v = Value::forward(Value::block(1, vec![Value::forward(Value::Int(9))]));
        let bytes = encode(&v).expect("encode");
        let back = decode(&bytes, 0).expect("decode");
        // The indirection itself does not survive the wire
        assert!(matches!(back, Value::Block(_)));
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
    }

    #[test]
    fn corrupted_magic_is_bad_magic() {
        let mut bytes = encode(&Value::Int(1)).expect("encode");
        bytes[0] = 0;
        bytes[1] = 0;
        bytes[2] = 0;
        bytes[3] = 0;
        assert_eq!(decode(&bytes, 0), Err(DecodeError::BadMagic));
        assert_eq!(data_size(&bytes, 0), Err(DecodeError::BadMagic));
    }

    #[test]
    fn truncation_never_panics() {
        let v = Value::block(
            0,
            vec![
                Value::bytes(*b"hello"),
                Value::Int64(Int64::from(7i64)),
                Value::Double(1.25),
            ],
        );
        let bytes = encode(&v).expect("encode");
        for len in 0..bytes.len() {
            let err = decode(&bytes[..len], 0).expect_err("truncated must fail");
            assert!(
                matches!(err, DecodeError::TruncatedInput | DecodeError::BadMagic),
                "prefix {len}: {err:?}"
            );
        }
    }

    #[test]
    fn sharing_is_preserved() {
        let shared = Value::bytes(*b"shared payload");
        let v = Value::block(0, vec![shared.clone(), shared.clone(), Value::Int(3)]);
        let bytes = encode(&v).expect("encode");

        // num_objects counts distinct sharable objects: the outer block
        // and the byte string, emitted once.
        let num_objects = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(num_objects, 2);

        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
        match &back {
            Value::Block(b) => match (&b.fields[0], &b.fields[1]) {
                (Value::Bytes(x), Value::Bytes(y)) => {
                    assert!(Rc::ptr_eq(x, y), "decoded fields must alias");
                }
                other => panic!("expected byte strings, got {other:?}"),
            },
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn shared_block_backreference() {
        let inner = Value::block(1, vec![Value::Int(5)]);
        let v = Value::block(0, vec![inner.clone(), inner.clone()]);
        let bytes = encode(&v).expect("encode");
        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
        match &back {
            Value::Block(b) => match (&b.fields[0], &b.fields[1]) {
                (Value::Block(x), Value::Block(y)) => assert!(Rc::ptr_eq(x, y)),
                other => panic!("expected blocks, got {other:?}"),
            },
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn atoms_are_not_shared() {
        // Zero-arity packed blocks carry no object number on the wire
        let atom = Value::block(0, vec![]);
        let v = Value::block(0, vec![atom.clone(), atom.clone()]);
        let bytes = encode(&v).expect("encode");
        let num_objects = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(num_objects, 1); // just the outer block
        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
    }

    #[test]
    fn double_array_roundtrip() {
        let v = Value::block(
            254,
            vec![Value::Double(1.0), Value::Double(-2.5), Value::Double(0.0)],
        );
        let bytes = encode(&v).expect("encode");
        let back = decode(&bytes, 0).expect("decode");
        assert_eq!(total_compare(&v, &back), Ordering::Equal);
    }

    #[test]
    fn double_array_with_non_double_field_is_rejected() {
        let v = Value::block(254, vec![Value::Double(1.0), Value::Int(2)]);
        assert_eq!(encode(&v), Err(EncodeError::NonSerializable(254)));
    }

    #[test]
    fn reserved_tags_are_rejected() {
        for tag in [247u8, 249, 250, 251, 255] {
            let v = Value::block(tag, vec![Value::Int(0)]);
            assert_eq!(encode(&v), Err(EncodeError::NonSerializable(tag)), "tag {tag}");
        }
        // Neighboring tags stay encodable
        for tag in [246u8, 248, 252, 253] {
            let v = Value::block(tag, vec![Value::Int(0)]);
            let bytes = encode(&v).expect("encode");
            let back = decode(&bytes, 0).expect("decode");
            assert_eq!(total_compare(&v, &back), Ordering::Equal, "tag {tag}");
        }
    }

    #[test]
    fn decode_at_offset() {
        let payload = encode(&Value::Int(42)).expect("encode");
        let mut framed = vec![0xaa; 7];
        framed.extend_from_slice(&payload);
        assert_eq!(decode(&framed, 7), Ok(Value::Int(42)));
        assert_eq!(data_size(&framed, 7), Ok(payload.len() as u32));
    }

    #[test]
    fn depth_limit_guards_encoder_and_decoder() {
        let mut v = Value::Int(0);
        for _ in 0..64 {
            v = Value::block(0, vec![v]);
        }
        let mut enc = MarshalEncoder::with_max_depth(16);
        assert_eq!(enc.encode(&v), Err(EncodeError::TooDeep));

        let bytes = encode(&v).expect("encode within default depth");
        let dec = MarshalDecoder::with_max_depth(16);
        assert_eq!(dec.decode(&bytes, 0), Err(DecodeError::TooDeep));
    }

    #[test]
    fn encoder_is_reusable_after_failure() {
        let mut enc = MarshalEncoder::new();
        let bad = Value::block(255, vec![]);
        assert!(enc.encode(&bad).is_err());
        let good = encode(&Value::Int(5)).expect("reference");
        assert_eq!(enc.encode(&Value::Int(5)).expect("encode"), good);
    }

    #[test]
    fn unknown_custom_ident_is_rejected() {
        let mut bytes = encode(&Value::Int64(Int64::ONE)).expect("encode");
        // Body starts at 20: CODE_CUSTOM, '_', 'j', 0, payload...
        assert_eq!(bytes[21..23], *b"_j");
        bytes[22] = b'k';
        assert_eq!(decode(&bytes, 0), Err(DecodeError::UnknownCustomBlock));
    }

    #[test]
    fn code_pointers_are_unsupported() {
        for code in [0x10u8, 0x11] {
            let mut bytes = encode(&Value::Int(0)).expect("encode");
            bytes[20] = code;
            assert_eq!(decode(&bytes, 0), Err(DecodeError::UnsupportedCodePointer));
        }
    }

    #[test]
    fn ill_formed_leading_byte() {
        for code in [0x03u8, 0x13, 0x14, 0x1f] {
            let mut bytes = encode(&Value::Int(0)).expect("encode");
            bytes[20] = code;
            assert_eq!(decode(&bytes, 0), Err(DecodeError::IllFormedMessage), "code {code:#x}");
        }
    }

    #[test]
    fn backreference_out_of_range_is_ill_formed() {
        let mut bytes = encode(&Value::Int(0)).expect("encode");
        // SHARED8 with offset 1 into an empty table
        bytes[20] = 0x04;
        bytes.push(0x01);
        assert_eq!(decode(&bytes, 0), Err(DecodeError::IllFormedMessage));
    }

    #[test]
    fn wide_integer_division_scenarios() {
        assert_eq!(
            Int64::from(10i64).divmod(Int64::ZERO),
            Err(Int64Error::DivideByZero)
        );
        assert_eq!(Int64::from(-255i64).to_string_radix(16), "-ff");
    }
}
