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

use crate::error::{Error, ErrorKind};
use crate::{Decode, Decoder, Encode, Encoder};
use core::num::{
    NonZeroI128, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroU128, NonZeroU16,
    NonZeroU32, NonZeroU64, NonZeroU8,
};
use core::ops::{Range, RangeInclusive};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, LinkedList, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

impl Encode for bool {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        out.write_byte(*self as u8);
        Ok(())
    }
}

impl Decode for bool {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<bool, Error> {
        match input.next_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            found => Err(Error::new(ErrorKind::UnexpectedValue {
                found,
                expected: "a boolean (0x00 or 0x01)",
            })),
        }
    }
}

// Fixed-width integers: always little-endian on the wire, two's complement
// for the signed widths.
macro_rules! impl_codec_for_integer {
    ($($t:ty),*) => {$(
        impl Encode for $t {
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                out.write(&self.to_le_bytes());
                Ok(())
            }
        }
        impl Decode for $t {
            const MIN_ENCODED_LEN: usize = core::mem::size_of::<$t>();

            fn decode_from(input: &mut Decoder<'_>) -> Result<$t, Error> {
                let bytes = input.read_bytes(core::mem::size_of::<$t>())?;
                let mut word = [0u8; core::mem::size_of::<$t>()];
                word.copy_from_slice(bytes);
                Ok(<$t>::from_le_bytes(word))
            }
        }
    )*}
}
impl_codec_for_integer!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

macro_rules! impl_codec_for_non_zero {
    ($($t:ty as $base:ty),*) => {$(
        impl Encode for $t {
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                self.get().encode_to(out)
            }
        }
        impl Decode for $t {
            const MIN_ENCODED_LEN: usize = core::mem::size_of::<$base>();

            fn decode_from(input: &mut Decoder<'_>) -> Result<$t, Error> {
                let value = <$base>::decode_from(input)?;
                <$t>::new(value).ok_or_else(|| Error::new(ErrorKind::UnexpectedValue {
                    found: 0,
                    expected: "a non-zero integer",
                }))
            }
        }
    )*}
}
impl_codec_for_non_zero!(
    NonZeroU8 as u8,
    NonZeroU16 as u16,
    NonZeroU32 as u32,
    NonZeroU64 as u64,
    NonZeroU128 as u128,
    NonZeroI8 as i8,
    NonZeroI16 as i16,
    NonZeroI32 as i32,
    NonZeroI64 as i64,
    NonZeroI128 as i128
);

impl Encode for char {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (*self as u32).encode_to(out)
    }
}

impl Decode for char {
    const MIN_ENCODED_LEN: usize = 4;

    fn decode_from(input: &mut Decoder<'_>) -> Result<char, Error> {
        let value = u32::decode_from(input)?;
        char::from_u32(value).ok_or_else(|| {
            Error::new(ErrorKind::ValueOutOfRange {
                reason: "not a valid char code point",
            })
        })
    }
}

impl Encode for () {
    fn encode_to(&self, _out: &mut Encoder) -> Result<(), Error> {
        Ok(())
    }
}

impl Decode for () {
    const MIN_ENCODED_LEN: usize = 0;

    fn decode_from(_input: &mut Decoder<'_>) -> Result<(), Error> {
        Ok(())
    }
}

impl<T> Encode for PhantomData<T> {
    fn encode_to(&self, _out: &mut Encoder) -> Result<(), Error> {
        Ok(())
    }
}

impl<T> Decode for PhantomData<T> {
    const MIN_ENCODED_LEN: usize = 0;

    fn decode_from(_input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(PhantomData)
    }
}

// Tuples: each element in order, no separators. The unit tuple is handled
// above.
macro_rules! impl_codec_for_tuple {
    ($($name:ident: $t:ident),+) => {
        impl<$($t: Encode),+> Encode for ($($t,)+) {
            #[allow(unused_assignments)]
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                let ($($name,)+) = self;
                let mut idx = 0;
                $(
                    $name.encode_to(out).map_err(|e| e.at_idx(idx))?;
                    idx += 1;
                )+
                Ok(())
            }
        }
        impl<$($t: Decode),+> Decode for ($($t,)+) {
            const MIN_ENCODED_LEN: usize = 0 $(+ $t::MIN_ENCODED_LEN)+;

            #[allow(unused_assignments)]
            fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
                let mut idx = 0;
                Ok(($(
                    {
                        let value = $t::decode_from(input).map_err(|e| e.at_idx(idx))?;
                        idx += 1;
                        value
                    },
                )+))
            }
        }
    }
}
#[rustfmt::skip]
const _: () = {
    impl_codec_for_tuple!(a: A);
    impl_codec_for_tuple!(a: A, b: B);
    impl_codec_for_tuple!(a: A, b: B, c: C);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K);
    impl_codec_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K, l: L);
};

impl<T: Encode> Encode for Option<T> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        match self {
            None => {
                out.write_byte(0);
                Ok(())
            }
            Some(value) => {
                out.write_byte(1);
                value.encode_to(out).map_err(|e| e.at_variant("Some"))
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        match input.next_byte()? {
            0 => Ok(None),
            1 => {
                let value = T::decode_from(input).map_err(|e| e.at_variant("Some"))?;
                Ok(Some(value))
            }
            found => Err(Error::new(ErrorKind::UnexpectedValue {
                found,
                expected: "an option discriminant (0x00 or 0x01)",
            })),
        }
    }
}

/// An optional boolean in the collapsed single-byte form.
///
/// The generic `Option<T>` encoding would spend a discriminant byte and then
/// a payload byte; the wire format instead packs the three inhabitants of an
/// optional boolean into one byte: 0 for absent, 1 for `true`, 2 for `false`.
/// Wrap an `Option<bool>` in this type to select the collapsed form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionBool(pub Option<bool>);

impl Encode for OptionBool {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        out.write_byte(match self.0 {
            None => 0,
            Some(true) => 1,
            Some(false) => 2,
        });
        Ok(())
    }
}

impl Decode for OptionBool {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        match input.next_byte()? {
            0 => Ok(OptionBool(None)),
            1 => Ok(OptionBool(Some(true))),
            2 => Ok(OptionBool(Some(false))),
            found => Err(Error::new(ErrorKind::UnexpectedValue {
                found,
                expected: "an optional boolean (0x00, 0x01 or 0x02)",
            })),
        }
    }
}

impl<T: Encode, E: Encode> Encode for Result<T, E> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        match self {
            Ok(value) => {
                out.write_byte(0);
                value.encode_to(out).map_err(|e| e.at_variant("Ok"))
            }
            Err(err) => {
                out.write_byte(1);
                err.encode_to(out).map_err(|e| e.at_variant("Err"))
            }
        }
    }
}

impl<T: Decode, E: Decode> Decode for Result<T, E> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        match input.next_byte()? {
            0 => {
                let value = T::decode_from(input).map_err(|e| e.at_variant("Ok"))?;
                Ok(Ok(value))
            }
            1 => {
                let err = E::decode_from(input).map_err(|e| e.at_variant("Err"))?;
                Ok(Err(err))
            }
            index => Err(Error::new(ErrorKind::WrongTypeIndex {
                index,
                variant_count: 2,
            })),
        }
    }
}

// Encode some iterator of items as a length-prefixed sequence.
fn encode_seq_to<I>(len: usize, it: I, out: &mut Encoder) -> Result<(), Error>
where
    I: Iterator,
    I::Item: Encode,
{
    out.write_length(len);
    for (idx, item) in it.enumerate() {
        item.encode_to(out).map_err(|e| e.at_idx(idx))?;
    }
    Ok(())
}

// Decode a length-prefixed sequence into a Vec. The length prefix has been
// budget-checked by `read_length`, so for non-zero-sized elements the
// pre-allocation here is bounded by the remaining input.
fn decode_seq_from<T: Decode>(input: &mut Decoder<'_>) -> Result<Vec<T>, Error> {
    let len = input.read_length(T::MIN_ENCODED_LEN)?;
    let mut items = if T::MIN_ENCODED_LEN == 0 {
        Vec::new()
    } else {
        Vec::with_capacity(len)
    };
    for idx in 0..len {
        items.push(T::decode_from(input).map_err(|e| e.at_idx(idx))?);
    }
    Ok(items)
}

impl<T: Encode> Encode for [T] {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        encode_seq_to(self.len(), self.iter(), out)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        self[..].encode_to(out)
    }
}

impl<T: Decode> Decode for Vec<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        decode_seq_from(input)
    }
}

// Encode the other ordered collections exactly like a sequence.
macro_rules! impl_encode_for_seq {
    ($($ty:ident [$param:ident]),*) => {$(
        impl<$param: Encode> Encode for $ty<$param> {
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                encode_seq_to(self.len(), self.iter(), out)
            }
        }
    )*}
}
impl_encode_for_seq!(BTreeSet[K], LinkedList[V], BinaryHeap[V], VecDeque[V]);

impl<T: Decode> Decode for VecDeque<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(decode_seq_from(input)?.into())
    }
}

impl<T: Decode> Decode for LinkedList<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(decode_seq_from(input)?.into_iter().collect())
    }
}

impl<T: Decode + Ord> Decode for BinaryHeap<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(decode_seq_from(input)?.into())
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(decode_seq_from(input)?.into_iter().collect())
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        encode_seq_to(self.len(), self.iter(), out)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = input.read_length(<(K, V)>::MIN_ENCODED_LEN)?;
        let mut map = BTreeMap::new();
        for idx in 0..len {
            // A key seen twice keeps its latest value.
            let (key, value) = <(K, V)>::decode_from(input).map_err(|e| e.at_idx(idx))?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl Encode for str {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        out.write_length(self.len());
        out.write(self.as_bytes());
        Ok(())
    }
}

impl Encode for String {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        self.as_str().encode_to(out)
    }
}

impl Decode for String {
    const MIN_ENCODED_LEN: usize = 1;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = input.read_length(1)?;
        let bytes = input.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            let found = e.as_bytes()[e.utf8_error().valid_up_to()];
            Error::new(ErrorKind::UnexpectedValue {
                found,
                expected: "valid UTF-8 string data",
            })
        })
    }
}

// Fixed arrays carry no length prefix; the count is part of the type.
impl<const N: usize, T: Encode> Encode for [T; N] {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        for (idx, item) in self.iter().enumerate() {
            item.encode_to(out).map_err(|e| e.at_idx(idx))?;
        }
        Ok(())
    }
}

impl<const N: usize, T: Decode> Decode for [T; N] {
    const MIN_ENCODED_LEN: usize = N * T::MIN_ENCODED_LEN;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut items = Vec::with_capacity(N);
        for idx in 0..N {
            items.push(T::decode_from(input).map_err(|e| e.at_idx(idx))?);
        }
        match items.try_into() {
            Ok(array) => Ok(array),
            Err(_) => unreachable!("the vector holds exactly N items"),
        }
    }
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (*self).encode_to(out)
    }
}

impl<'a, T> Encode for Cow<'a, T>
where
    T: 'a + Encode + ToOwned + ?Sized,
{
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (**self).encode_to(out)
    }
}

impl<'a, T> Decode for Cow<'a, T>
where
    T: 'a + ToOwned + ?Sized,
    T::Owned: Decode,
{
    const MIN_ENCODED_LEN: usize = <T::Owned as Decode>::MIN_ENCODED_LEN;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(Cow::Owned(<T::Owned as Decode>::decode_from(input)?))
    }
}

// The ownership wrappers carry no wire information of their own: they
// encode and decode exactly as their pointee.
macro_rules! impl_codec_for_box_like {
    ($($ty:ident),*) => {$(
        impl<T: Encode + ?Sized> Encode for $ty<T> {
            fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
                (**self).encode_to(out)
            }
        }
        impl<T: Decode> Decode for $ty<T> {
            const MIN_ENCODED_LEN: usize = T::MIN_ENCODED_LEN;

            fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
                Ok($ty::new(T::decode_from(input)?))
            }
        }
    )*}
}
impl_codec_for_box_like!(Box, Rc, Arc);

impl Encode for Duration {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (self.as_secs(), self.subsec_nanos()).encode_to(out)
    }
}

impl Decode for Duration {
    const MIN_ENCODED_LEN: usize = 12;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let (secs, nanos) = <(u64, u32)>::decode_from(input)?;
        if nanos >= 1_000_000_000 {
            return Err(Error::new(ErrorKind::ValueOutOfRange {
                reason: "the nanosecond part of a duration must be below 10^9",
            }));
        }
        Ok(Duration::new(secs, nanos))
    }
}

impl<T: Encode> Encode for Range<T> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (&self.start, &self.end).encode_to(out)
    }
}

impl<T: Decode> Decode for Range<T> {
    const MIN_ENCODED_LEN: usize = T::MIN_ENCODED_LEN * 2;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let (start, end) = <(T, T)>::decode_from(input)?;
        Ok(start..end)
    }
}

impl<T: Encode> Encode for RangeInclusive<T> {
    fn encode_to(&self, out: &mut Encoder) -> Result<(), Error> {
        (self.start(), self.end()).encode_to(out)
    }
}

impl<T: Decode> Decode for RangeInclusive<T> {
    const MIN_ENCODED_LEN: usize = T::MIN_ENCODED_LEN * 2;

    fn decode_from(input: &mut Decoder<'_>) -> Result<Self, Error> {
        let (start, end) = <(T, T)>::decode_from(input)?;
        Ok(start..=end)
    }
}
