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

//! An error that is emitted whenever encoding or decoding fails.
mod context;

use std::borrow::Cow;
use std::fmt::Display;

pub use context::{Context, Location};

/// An error produced while attempting to encode or decode some value.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    context: Context,
    kind: ErrorKind,
}

impl Error {
    /// Construct a new error given an error kind.
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            context: Context::new(),
            kind,
        }
    }
    /// Construct a new, custom error.
    pub fn custom(error: impl Into<CustomError>) -> Error {
        Error::new(ErrorKind::Custom(error.into()))
    }
    /// Retrieve more information about what went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
    /// Retrieve details about where the error occurred.
    pub fn context(&self) -> &Context {
        &self.context
    }
    /// Give some context to the error.
    pub fn at(mut self, loc: Location) -> Self {
        self.context.push(loc);
        Error {
            context: self.context,
            kind: self.kind,
        }
    }
    /// Note which sequence index the error occurred in.
    pub fn at_idx(mut self, idx: usize) -> Self {
        self.context.push(Location::idx(idx));
        Error {
            context: self.context,
            kind: self.kind,
        }
    }
    /// Note which field the error occurred in.
    pub fn at_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.context.push(Location::field(field));
        Error {
            context: self.context,
            kind: self.kind,
        }
    }
    /// Note which variant the error occurred in.
    pub fn at_variant(mut self, variant: impl Into<Cow<'static, str>>) -> Self {
        self.context.push(Location::variant(variant));
        Error {
            context: self.context,
            kind: self.kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self.context.path();
        let kind = &self.kind;
        write!(f, "Error at {path}: {kind}")
    }
}

/// The underlying nature of the error.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The input ended before the read completed.
    #[error("Not enough data: needed {needed} byte(s) but only {available} remain")]
    NotEnoughData {
        /// How many bytes the read needed.
        needed: usize,
        /// How many bytes were actually left in the input.
        available: usize,
    },
    /// A byte on the wire is not one of the values the shape allows.
    #[error("Unexpected byte 0x{found:02x}: expected {expected}")]
    UnexpectedValue {
        /// The byte we saw.
        found: u8,
        /// A description of what was allowed at this position.
        expected: &'static str,
    },
    /// A sum-type discriminant does not select any declared variant.
    #[error("Variant index {index} is out of range: the type has {variant_count} variant(s)")]
    WrongTypeIndex {
        /// The discriminant byte we saw.
        index: u8,
        /// How many variants the type declares.
        variant_count: usize,
    },
    /// A length prefix declares more items than the remaining input could
    /// possibly hold.
    #[error("Length prefix of {requested} item(s) exceeds what the remaining input could hold (at most {max})")]
    TooManyItems {
        /// The declared item count.
        requested: u128,
        /// The largest item count the decoder was prepared to accept.
        max: usize,
    },
    /// A number does not fit the representation it is being coerced into.
    #[error("Value out of range: {reason}")]
    ValueOutOfRange {
        /// What was out of range.
        reason: &'static str,
    },
    /// Bytes were left over after a decode that was required to consume
    /// the whole input.
    #[error("Decoding finished with {remaining} byte(s) of input left over")]
    ExtraData {
        /// How many bytes remain unconsumed.
        remaining: usize,
    },
    /// The value cannot be expressed on the wire at all.
    #[error("Unsupported shape: {reason}")]
    UnsupportedShape {
        /// What the wire format cannot express.
        reason: &'static str,
    },
    /// A custom error.
    #[error("Custom error: {0}")]
    Custom(CustomError),
}

type CustomError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[cfg(test)]
mod test {
    use super::*;

    #[derive(thiserror::Error, Debug)]
    enum MyError {
        #[error("Foo!")]
        Foo,
    }

    #[test]
    fn custom_error() {
        // Just a compile-time check that we can ergonomically provide an arbitrary custom error:
        Error::custom(MyError::Foo);
    }

    #[test]
    fn error_display_includes_the_path() {
        let err = Error::new(ErrorKind::NotEnoughData {
            needed: 4,
            available: 1,
        })
        .at_field("balance")
        .at_idx(2)
        .at_variant("Transfer");

        let rendered = err.to_string();
        assert!(rendered.starts_with("Error at (Transfer).[2].balance:"), "{rendered}");
    }
}
