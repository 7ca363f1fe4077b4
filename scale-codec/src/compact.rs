// Copyright (C) 2023 Parity Technologies (UK) Ltd. (admin@parity.io)
// This file is a part of the scale-codec crate.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//         http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The compact integer codec.
//!
//! A compact integer is an unsigned value stored in one of four modes,
//! selected by the low two bits of the first byte:
//!
//! | Mode bits | Value range      | Layout                                           |
//! |-----------|------------------|--------------------------------------------------|
//! | `0b00`    | `0..2^6`         | value in the high six bits of a single byte      |
//! | `0b01`    | `2^6..2^14`      | value in the high 14 bits of two bytes, LE       |
//! | `0b10`    | `2^14..2^30`     | value in the high 30 bits of four bytes, LE      |
//! | `0b11`    | `2^30..2^536`    | high six bits hold `M - 4`; `M` value bytes, LE  |
//!
//! Encoding always picks the smallest mode that fits. Decoding accepts
//! non-minimal forms unless [`CodecConfig::strict_minimal_compact`] is set.
//!
//! [`CodecConfig::strict_minimal_compact`]: crate::CodecConfig::strict_minimal_compact

use crate::error::{Error, ErrorKind};
use crate::{Decode, Decoder, Encode, Encoder};
use std::fmt;

// Mode 3 stores the value byte count minus 4 in six bits, so a value can
// occupy at most 63 + 4 = 67 bytes: the 2^536 range limit.
const MAX_VALUE_BYTES: usize = 67;

/// Wraps a fixed-width unsigned integer so that it is encoded in the
/// variable-length compact format instead of its fixed width.
///
/// Decoding fails with [`ErrorKind::ValueOutOfRange`] if the value on the
/// wire does not fit the wrapped type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Compact<T>(pub T);

/// An unsigned integer in `0..2^536`: the full range the compact format can
/// express, which exceeds every fixed-width type.
///
/// The value is held as its minimal little-endian byte string. No
/// general-purpose big-integer arithmetic is provided; ordering, conversions
/// from and to the fixed-width unsigned types, and the codec itself are all a
/// compact integer needs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CompactInteger {
    // Minimal form: no trailing zero bytes, so zero is the empty string.
    le: Vec<u8>,
}

impl CompactInteger {
    /// Construct from little-endian bytes. Trailing zero bytes are ignored;
    /// fails with [`ErrorKind::ValueOutOfRange`] if the value needs more than
    /// 67 bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<CompactInteger, Error> {
        let len = trimmed_len(bytes);
        if len > MAX_VALUE_BYTES {
            return Err(Error::new(ErrorKind::ValueOutOfRange {
                reason: "compact integers cannot exceed 2^536",
            }));
        }
        Ok(CompactInteger {
            le: bytes[..len].to_vec(),
        })
    }

    /// The value as minimal little-endian bytes. Zero is the empty slice.
    pub fn as_le_bytes(&self) -> &[u8] {
        &self.le
    }

    /// The value as a `u128`, if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.le.len() > 16 {
            return None;
        }
        let mut word = [0u8; 16];
        word[..self.le.len()].copy_from_slice(&self.le);
        Some(u128::from_le_bytes(word))
    }
}

impl From<u128> for CompactInteger {
    fn from(value: u128) -> CompactInteger {
        let bytes = value.to_le_bytes();
        let len = trimmed_len(&bytes);
        CompactInteger {
            le: bytes[..len].to_vec(),
        }
    }
}

macro_rules! impl_compact_integer_from {
    ($($t:ty),*) => {$(
        impl From<$t> for CompactInteger {
            fn from(value: $t) -> CompactInteger {
                CompactInteger::from(value as u128)
            }
        }
    )*}
}
impl_compact_integer_from!(u8, u16, u32, u64, usize);

impl Ord for CompactInteger {
    fn cmp(&self, other: &CompactInteger) -> std::cmp::Ordering {
        // Minimal form makes longer strictly greater; equal lengths compare
        // most-significant byte first.
        self.le
            .len()
            .cmp(&other.le.len())
            .then_with(|| self.le.iter().rev().cmp(other.le.iter().rev()))
    }
}

impl PartialOrd for CompactInteger {
    fn partial_cmp(&self, other: &CompactInteger) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for CompactInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactInteger(0x")?;
        if self.le.is_empty() {
            write!(f, "0")?;
        }
        for byte in self.le.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl Encode for CompactInteger {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        match self.to_u128() {
            Some(value) => encode_compact_value(value, out),
            None => {
                // More than 16 bytes, so far beyond 2^30: mode 3.
                out.write_byte((((self.le.len() - 4) as u8) << 2) | 0b11);
                out.write(&self.le);
            }
        }
        Ok(())
    }
}

impl Decode for CompactInteger {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<CompactInteger, Error> {
        match decode_compact(input)? {
            RawCompact::Small(value) => Ok(CompactInteger::from(value)),
            RawCompact::Big(le) => Ok(CompactInteger { le }),
        }
    }
}

macro_rules! impl_compact_codec_for_uint {
    ($($t:ty),*) => {$(
        impl Encode for Compact<$t> {
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                encode_compact_value(self.0 as u128, out);
                Ok(())
            }
        }
        impl Decode for Compact<$t> {
            const MIN_ENCODED_LEN: usize = 1;

            fn decode_from(input: &mut Decoder<'_>) -> Result<Compact<$t>, Error> {
                let value = decode_compact_value(input)?;
                let value = <$t>::try_from(value).map_err(|_| {
                    Error::new(ErrorKind::ValueOutOfRange {
                        reason: concat!("compact value does not fit in a ", stringify!($t)),
                    })
                })?;
                Ok(Compact(value))
            }
        }
    )*}
}
impl_compact_codec_for_uint!(u8, u16, u32, u64, u128);

impl Encode for Compact<CompactInteger> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        self.0.encode_to(out)
    }
}

impl Decode for Compact<CompactInteger> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(Compact(CompactInteger::decode_from(input)?))
    }
}

/// Write `value` in the smallest compact mode that fits it.
pub(crate) fn encode_compact_value(value: u128, out: &mut Encoder) {
    if value < (1 << 6) {
        out.write_byte((value as u8) << 2);
    } else if value < (1 << 14) {
        out.write(&(((value as u16) << 2) | 0b01).to_le_bytes());
    } else if value < (1 << 30) {
        out.write(&(((value as u32) << 2) | 0b10).to_le_bytes());
    } else {
        let bytes = value.to_le_bytes();
        let len = trimmed_len(&bytes);
        out.write_byte((((len - 4) as u8) << 2) | 0b11);
        out.write(&bytes[..len]);
    }
}

/// Read a compact value that must fit in a `u128` (which every length prefix
/// and every `Compact<T>` target does).
pub(crate) fn decode_compact_value(input: &mut Decoder<'_>) -> Result<u128, Error> {
    match decode_compact(input)? {
        RawCompact::Small(value) => Ok(value as u128),
        RawCompact::Big(le) => {
            if le.len() > 16 {
                return Err(Error::new(ErrorKind::ValueOutOfRange {
                    reason: "compact value does not fit in 128 bits",
                }));
            }
            let mut word = [0u8; 16];
            word[..le.len()].copy_from_slice(&le);
            Ok(u128::from_le_bytes(word))
        }
    }
}

enum RawCompact {
    Small(u32),
    // Minimal little-endian bytes; always more than four of them.
    Big(Vec<u8>),
}

/// Read one compact integer in any of the four modes, applying the minimality
/// policy the decoder is configured with.
fn decode_compact(input: &mut Decoder<'_>) -> Result<RawCompact, Error> {
    let strict = input.config().strict_minimal_compact;
    let first = input.next_byte()?;
    match first & 0b11 {
        0b00 => Ok(RawCompact::Small((first >> 2) as u32)),
        0b01 => {
            let second = input.next_byte()?;
            let value = u16::from_le_bytes([first, second]) >> 2;
            if strict && value < (1 << 6) {
                return Err(non_minimal());
            }
            Ok(RawCompact::Small(value as u32))
        }
        0b10 => {
            let rest = input.read_bytes(3)?;
            let value = u32::from_le_bytes([first, rest[0], rest[1], rest[2]]) >> 2;
            if strict && value < (1 << 14) {
                return Err(non_minimal());
            }
            Ok(RawCompact::Small(value))
        }
        _ => {
            let len = ((first >> 2) as usize) + 4;
            let bytes = input.read_bytes(len)?;
            let trimmed = trimmed_len(bytes);
            if strict {
                if trimmed != len {
                    return Err(non_minimal());
                }
                let low = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                if len == 4 && low < (1 << 30) {
                    return Err(non_minimal());
                }
            }
            if trimmed <= 4 {
                let mut word = [0u8; 4];
                word[..trimmed].copy_from_slice(&bytes[..trimmed]);
                Ok(RawCompact::Small(u32::from_le_bytes(word)))
            } else {
                Ok(RawCompact::Big(bytes[..trimmed].to_vec()))
            }
        }
    }
}

fn non_minimal() -> Error {
    Error::new(ErrorKind::ValueOutOfRange {
        reason: "non-minimal compact encoding",
    })
}

fn trimmed_len(bytes: &[u8]) -> usize {
    let mut len = bytes.len();
    while len > 0 && bytes[len - 1] == 0 {
        len -= 1;
    }
    len
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{CodecConfig, Decoder};

    fn encodes_to(value: u128, bytes: &[u8]) {
        assert_eq!(
            Compact(value).encode().expect("can encode"),
            bytes,
            "encoding of {value}"
        );
    }

    fn compact_roundtrips(value: u128) {
        let bytes = Compact(value).encode().expect("can encode");
        let mut input = Decoder::new(&bytes);
        let decoded = Compact::<u128>::decode_from(&mut input).expect("can decode");
        assert_eq!(input.remaining(), 0, "no bytes should be remaining");
        assert_eq!(decoded.0, value);
    }

    #[test]
    fn mode_boundaries_encode_as_specified() {
        encodes_to(0, &[0x00]);
        encodes_to(63, &[0xfc]);
        encodes_to(64, &[0x01, 0x01]);
        encodes_to(16383, &[0xfd, 0xff]);
        encodes_to(16384, &[0x02, 0x00, 0x01, 0x00]);
        encodes_to(1073741823, &[0xfe, 0xff, 0xff, 0xff]);
        encodes_to(1073741824, &[0x03, 0x00, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn values_roundtrip_across_all_modes() {
        for value in [
            0,
            1,
            63,
            64,
            16383,
            16384,
            1073741823,
            1073741824,
            u32::MAX as u128,
            u64::MAX as u128,
            u64::MAX as u128 + 1,
            u128::MAX,
        ] {
            compact_roundtrips(value);
        }
    }

    #[test]
    fn big_integers_roundtrip_up_to_the_range_limit() {
        // 2^536 - 1: all 67 value bytes set.
        let max = CompactInteger::from_le_bytes(&[0xff; 67]).expect("67 bytes is in range");
        let bytes = max.encode().expect("can encode");
        assert_eq!(bytes.len(), 68);
        assert_eq!(bytes[0], 0xff);

        let mut input = Decoder::new(&bytes);
        let decoded = CompactInteger::decode_from(&mut input).expect("can decode");
        assert_eq!(input.remaining(), 0);
        assert_eq!(decoded, max);
    }

    #[test]
    fn values_beyond_the_range_limit_fail_to_construct() {
        let err = CompactInteger::from_le_bytes(&[1u8; 68]).expect_err("68 bytes is out of range");
        assert!(matches!(err.kind(), ErrorKind::ValueOutOfRange { .. }));

        // Trailing zeros don't count towards the width.
        let mut bytes = [0u8; 68];
        bytes[66] = 1;
        CompactInteger::from_le_bytes(&bytes).expect("67 significant bytes is in range");
    }

    #[test]
    fn small_targets_reject_oversized_values() {
        let bytes = Compact(256u128).encode().expect("can encode");
        let mut input = Decoder::new(&bytes);
        let err = Compact::<u8>::decode_from(&mut input).expect_err("256 does not fit a u8");
        assert!(matches!(err.kind(), ErrorKind::ValueOutOfRange { .. }));
    }

    #[test]
    fn mode_3_headers_larger_than_the_input_fail_cleanly() {
        // Header asks for 67 value bytes; only 8 follow.
        let bytes = [0xffu8; 9];
        let mut input = Decoder::new(&bytes);
        let err = CompactInteger::decode_from(&mut input).expect_err("input is truncated");
        assert!(matches!(
            err.kind(),
            ErrorKind::NotEnoughData {
                needed: 67,
                available: 8
            }
        ));
    }

    #[test]
    fn non_minimal_encodings_are_accepted_by_default() {
        // 0 spelled in two bytes (mode 1).
        let mut input = Decoder::new(&[0x01, 0x00]);
        assert_eq!(Compact::<u32>::decode_from(&mut input).expect("accepted").0, 0);

        // 64 spelled in mode 3 with trailing zero bytes.
        let mut input = Decoder::new(&[0x03, 0x40, 0x00, 0x00, 0x00]);
        assert_eq!(Compact::<u32>::decode_from(&mut input).expect("accepted").0, 64);
    }

    #[test]
    fn strict_mode_rejects_non_minimal_encodings() {
        let config = CodecConfig {
            strict_minimal_compact: true,
            ..Default::default()
        };

        // 0 in mode 1, 1000 in mode 2, 64 in mode 3 (with trailing zeros),
        // and 2^29 in mode 3 (minimal length, wrong mode).
        for bytes in [
            &[0x01, 0x00][..],
            &[0xa2, 0x0f, 0x00, 0x00][..],
            &[0x03, 0x40, 0x00, 0x00, 0x00][..],
            &[0x03, 0x00, 0x00, 0x00, 0x20][..],
        ] {
            let mut input = Decoder::with_config(bytes, config);
            let err = Compact::<u32>::decode_from(&mut input).expect_err("non-minimal");
            assert!(matches!(
                err.kind(),
                ErrorKind::ValueOutOfRange {
                    reason: "non-minimal compact encoding"
                }
            ));
        }

        // Minimal encodings still decode fine in strict mode.
        let mut input = Decoder::with_config(&[0x02, 0x00, 0x01, 0x00], config);
        assert_eq!(
            Compact::<u32>::decode_from(&mut input).expect("minimal").0,
            16384
        );
    }

    #[test]
    fn compact_integers_order_by_value() {
        let small = CompactInteger::from(16u32);
        let large = CompactInteger::from(u64::MAX);
        let huge = CompactInteger::from_le_bytes(&[1u8; 20]).expect("in range");

        assert!(small < large);
        assert!(large < huge);
        assert_eq!(small, CompactInteger::from(16u8));
        assert_eq!(CompactInteger::default(), CompactInteger::from(0u8));
    }
}
