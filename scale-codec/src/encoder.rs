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

//! The append-only byte builder that SCALE encodings are written into.

use crate::compact;
use crate::error::{Error, ErrorKind};
use crate::Encode;

/// An append-only builder for a SCALE byte sequence.
///
/// Values are written with [`Encoder::push`] (or by calling
/// [`Encode::encode_to`] on them directly) and the accumulated bytes are taken
/// out with [`Encoder::finalize`], which consumes the encoder. Writes never
/// perform I/O; the buffer lives entirely in memory.
#[derive(Debug, Default)]
pub struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    /// Construct a new, empty encoder.
    pub fn new() -> Encoder {
        Default::default()
    }

    /// Construct an encoder whose buffer has room for `capacity` bytes
    /// before it needs to reallocate.
    pub fn with_capacity(capacity: usize) -> Encoder {
        Encoder {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Append the SCALE encoding of the given value.
    pub fn push<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.encode_to(self)
    }

    /// Append a single raw byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append raw bytes as-is.
    pub fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a compact-encoded length prefix. Sequences, maps, strings and
    /// bit-sequences all carry their length in this form.
    pub fn write_length(&mut self, len: usize) {
        compact::encode_compact_value(len as u128, self);
    }

    /// Append a sum-type discriminant. Fails with
    /// [`ErrorKind::UnsupportedShape`] if the index cannot fit the one-byte
    /// tag, which limits sum types to 256 variants.
    pub fn write_variant_index(&mut self, index: usize) -> Result<(), Error> {
        let byte = u8::try_from(index).map_err(|_| {
            Error::new(ErrorKind::UnsupportedShape {
                reason: "sum types are limited to 256 variants",
            })
        })?;
        self.write_byte(byte);
        Ok(())
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether any bytes have been written yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the encoder, yielding the accumulated bytes.
    pub fn finalize(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn writes_are_appended_in_order() {
        let mut out = Encoder::new();
        out.write_byte(1);
        out.write(&[2, 3]);
        out.push(&4u16).expect("can encode a u16");
        assert_eq!(out.len(), 5);
        assert_eq!(out.finalize(), vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn length_prefixes_are_compact() {
        let mut out = Encoder::new();
        out.write_length(3);
        out.write_length(64);
        assert_eq!(out.finalize(), vec![0x0c, 0x01, 0x01]);
    }

    #[test]
    fn variant_indices_must_fit_one_byte() {
        let mut out = Encoder::new();
        out.write_variant_index(255).expect("255 fits the tag");
        let err = out.write_variant_index(256).expect_err("256 does not fit");
        assert!(matches!(err.kind(), ErrorKind::UnsupportedShape { .. }));
        assert_eq!(out.finalize(), vec![0xff]);
    }
}
