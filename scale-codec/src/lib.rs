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

//! `scale-codec` implements the SCALE (Simple Concatenated Aggregate
//! Little-Endian) binary serialization format used across the
//! Polkadot/Substrate family of systems. Values are written to and read from
//! in-memory byte buffers with no framing, alignment or embedded type
//! information; both sides must agree on the shape of the data.
//!
//! The [`Encode`] and [`Decode`] traits are implemented for the primitive
//! shapes the format knows about (integers, booleans, optionals, tuples,
//! sequences, maps, strings, fixed arrays and [compact integers][Compact]),
//! and can be implemented (or derived, with the `derive` feature) for user
//! aggregates to compose those.
//!
//! ```rust
//! use scale_codec::{decode, encode};
//!
//! let bytes = encode(&(42u16, "hello".to_string())).expect("can encode");
//! assert_eq!(bytes, [42, 0, 20, 104, 101, 108, 108, 111]);
//!
//! let (num, text): (u16, String) = decode(&bytes).expect("can decode");
//! assert_eq!(num, 42);
//! assert_eq!(text, "hello");
//! ```
//!
//! Decoding never trusts the input: truncated data, bad discriminants and
//! hostile length prefixes all surface as an [`Error`] rather than a panic or
//! an oversized allocation, and [`CodecConfig`] exposes the policy knobs for
//! the cases the wire format leaves open.
#![deny(missing_docs)]

mod compact;
mod decoder;
mod encoder;
mod impls;

pub mod error;

pub use compact::{Compact, CompactInteger};
pub use decoder::{CodecConfig, Decoder};
pub use encoder::Encoder;
pub use error::Error;
pub use impls::OptionBool;

#[cfg(feature = "derive")]
pub use scale_codec_derive::{Decode, Encode};

/// Something which can be written out in the SCALE format.
pub trait Encode {
    /// Append the encoding of this value to the given encoder.
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error>;

    /// This is a helper function which internally calls
    /// [`Encode::encode_to`]. Prefer to implement that instead.
    fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut out = Encoder::new();
        self.encode_to(&mut out)?;
        Ok(out.finalize())
    }
}

/// Something which can be read back out of the SCALE format.
pub trait Decode: Sized {
    /// The smallest number of bytes any encoding of this shape can occupy on
    /// the wire. Length-prefixed containers use this to reject declared
    /// element counts that could never fit in the remaining input, before
    /// allocating anything for them. Implementations may under-state this
    /// value but must never over-state it.
    const MIN_ENCODED_LEN: usize;

    /// Read a value of this type from the decoder.
    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error>;
}

/// Encode a value to SCALE bytes.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    value.encode()
}

/// Decode a value from SCALE bytes with the default [`CodecConfig`].
///
/// Trailing bytes after the value are ignored; use [`decode_with_config`]
/// with [`CodecConfig::require_full_consumption`] set to reject them.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T, Error> {
    decode_with_config(bytes, CodecConfig::default())
}

/// Decode a value from SCALE bytes with the given [`CodecConfig`].
pub fn decode_with_config<T: Decode>(bytes: &[u8], config: CodecConfig) -> Result<T, Error> {
    let mut input = Decoder::with_config(bytes, config);
    let value = T::decode_from(&mut input)?;
    if config.require_full_consumption && input.remaining() > 0 {
        return Err(Error::new(error::ErrorKind::ExtraData {
            remaining: input.remaining(),
        }));
    }
    Ok(value)
}
