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

//! The forward-only cursor that SCALE encodings are read from, plus the
//! policy knobs governing how reads behave.

use crate::compact;
use crate::error::{Error, ErrorKind};
use crate::Decode;

/// Policy knobs controlling decoding behaviour.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Reject compact-integer encodings that are not the minimal form for
    /// their value. The default is to accept them, matching what most other
    /// implementations on the wire do.
    pub strict_minimal_compact: bool,
    /// The largest item count accepted for sequences whose elements occupy
    /// zero bytes on the wire. Such elements make the byte-budget check
    /// useless, so an absolute cap applies instead.
    pub max_items_zero_sized: usize,
    /// Make the top-level [`crate::decode_with_config`] call fail with
    /// [`ErrorKind::ExtraData`] if any input bytes remain unconsumed.
    pub require_full_consumption: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            strict_minimal_compact: false,
            max_items_zero_sized: 1 << 20,
            require_full_consumption: false,
        }
    }
}

/// A cursor over a borrowed byte span, from which values are decoded.
///
/// The cursor only ever moves forward. A failed read leaves it wherever the
/// failure happened, which callers can inspect for diagnostics; any value
/// partially built by then should be considered indeterminate.
pub struct Decoder<'a> {
    bytes: &'a [u8],
    offset: usize,
    config: CodecConfig,
}

impl<'a> Decoder<'a> {
    /// Construct a decoder over the given bytes with the default
    /// [`CodecConfig`].
    pub fn new(bytes: &'a [u8]) -> Decoder<'a> {
        Decoder::with_config(bytes, CodecConfig::default())
    }

    /// Construct a decoder over the given bytes with the given config.
    pub fn with_config(bytes: &'a [u8], config: CodecConfig) -> Decoder<'a> {
        Decoder {
            bytes,
            offset: 0,
            config,
        }
    }

    /// Decode the next value from the input.
    pub fn take<T: Decode>(&mut self) -> Result<T, Error> {
        T::decode_from(self)
    }

    /// Return the byte at the cursor, advancing past it.
    pub fn next_byte(&mut self) -> Result<u8, Error> {
        let Some(&byte) = self.bytes.get(self.offset) else {
            return Err(Error::new(ErrorKind::NotEnoughData {
                needed: 1,
                available: 0,
            }));
        };
        self.offset += 1;
        Ok(byte)
    }

    /// Return the next `n` bytes, advancing past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if !self.has_more(n) {
            return Err(Error::new(ErrorKind::NotEnoughData {
                needed: n,
                available: self.remaining(),
            }));
        }
        let bytes = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Whether at least `n` more bytes remain. Does not advance the cursor.
    pub fn has_more(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// The number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// The number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The config this decoder was constructed with.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Read a compact-encoded length prefix, refusing any count that could
    /// not possibly fit in the remaining input.
    ///
    /// `min_item_size` is the smallest number of bytes one element can occupy
    /// on the wire (usually [`Decode::MIN_ENCODED_LEN`]). A declared count
    /// above `remaining / min_item_size` can never decode successfully, so it
    /// is rejected here, before anything is allocated for it. Zero-sized
    /// elements are capped by [`CodecConfig::max_items_zero_sized`] instead.
    pub fn read_length(&mut self, min_item_size: usize) -> Result<usize, Error> {
        let requested = compact::decode_compact_value(self)?;
        let max = if min_item_size == 0 {
            self.config.max_items_zero_sized
        } else {
            self.remaining() / min_item_size
        };
        if requested > max as u128 {
            return Err(Error::new(ErrorKind::TooManyItems { requested, max }));
        }
        Ok(requested as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn the_cursor_only_moves_forward() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut input = Decoder::new(&bytes);

        assert_eq!(input.next_byte().expect("one byte"), 1);
        assert_eq!(input.read_bytes(2).expect("two bytes"), &[2, 3]);
        assert_eq!(input.offset(), 3);
        assert_eq!(input.remaining(), 2);
        assert!(input.has_more(2));
        assert!(!input.has_more(3));
    }

    #[test]
    fn exhausted_input_reports_not_enough_data() {
        let mut input = Decoder::new(&[1u8]);
        let err = input.read_bytes(3).expect_err("only one byte available");
        assert!(matches!(
            err.kind(),
            ErrorKind::NotEnoughData {
                needed: 3,
                available: 1
            }
        ));

        // The failed read did not advance the cursor; further reads are legal.
        assert_eq!(input.next_byte().expect("the byte is still there"), 1);
    }

    #[test]
    fn lengths_beyond_the_byte_budget_are_rejected() {
        // Length prefix of 5, but only 2 bytes follow.
        let bytes = [0x14u8, 1, 2];
        let mut input = Decoder::new(&bytes);
        let err = input.read_length(1).expect_err("5 items cannot fit in 2 bytes");
        assert!(matches!(
            err.kind(),
            ErrorKind::TooManyItems {
                requested: 5,
                max: 2
            }
        ));
    }

    #[test]
    fn zero_sized_items_are_capped_absolutely() {
        let config = CodecConfig {
            max_items_zero_sized: 10,
            ..Default::default()
        };

        let bytes = [0x28u8]; // length prefix of 10
        let mut input = Decoder::with_config(&bytes, config);
        assert_eq!(input.read_length(0).expect("10 is within the cap"), 10);

        let bytes = [0x2cu8]; // length prefix of 11
        let mut input = Decoder::with_config(&bytes, config);
        let err = input.read_length(0).expect_err("11 exceeds the cap");
        assert!(matches!(err.kind(), ErrorKind::TooManyItems { requested: 11, max: 10 }));
    }
}
