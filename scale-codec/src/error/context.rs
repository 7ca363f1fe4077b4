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

//! This module provides a [`Context`] type that is attached to every error.
//! Internally, the [`Context`] tracks the path into the value at which
//! encoding or decoding failed, to aid in error reporting.

use std::borrow::Cow;
use std::sync::Arc;

/// A cheaply clonable, opaque record of the location within some value at
/// which an encode or decode went wrong.
///
/// Locations are pushed innermost first as an error bubbles out of a nested
/// value, so the most recently pushed location is the outermost one.
#[derive(Clone, Default, Debug)]
pub struct Context {
    head: Option<Arc<Frame>>,
}

// Frames share their tails, so cloning a context or growing a clone of one
// never copies the path seen so far.
#[derive(Debug)]
struct Frame {
    location: Location,
    parent: Option<Arc<Frame>>,
}

impl Context {
    /// Construct a new, empty context.
    pub fn new() -> Context {
        Default::default()
    }
    /// Append a location to the context.
    pub fn push(&mut self, location: Location) {
        self.head = Some(Arc::new(Frame {
            location,
            parent: self.head.take(),
        }));
    }
    /// Return the current path.
    pub fn path(&self) -> Path<'_> {
        Path {
            head: self.head.as_deref(),
        }
    }
}

/// The path at which an error occurred, outermost location first.
pub struct Path<'a> {
    head: Option<&'a Frame>,
}

impl<'a> Path<'a> {
    /// Return each location visited, outermost first.
    pub fn locations(&self) -> Locations<'a> {
        Locations { next: self.head }
    }
}

impl<'a> std::fmt::Display for Path<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, loc) in self.locations().enumerate() {
            if idx != 0 {
                f.write_str(".")?;
            }
            match &loc.inner {
                Loc::Field(name) => f.write_str(name)?,
                Loc::Index(i) => write!(f, "[{i}]")?,
                Loc::Variant(name) => write!(f, "({name})")?,
            }
        }
        Ok(())
    }
}

/// An iterator over the locations of a [`Path`], outermost first.
pub struct Locations<'a> {
    next: Option<&'a Frame>,
}

impl<'a> Iterator for Locations<'a> {
    type Item = &'a Location;
    fn next(&mut self) -> Option<&'a Location> {
        let frame = self.next?;
        self.next = frame.parent.as_deref();
        Some(&frame.location)
    }
}

/// Some location, like a field, variant or index in an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    inner: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Loc {
    Field(Cow<'static, str>),
    Index(usize),
    Variant(Cow<'static, str>),
}

impl Location {
    /// This represents some struct field.
    pub fn field(name: impl Into<Cow<'static, str>>) -> Self {
        Location {
            inner: Loc::Field(name.into()),
        }
    }
    /// This represents some variant name.
    pub fn variant(name: impl Into<Cow<'static, str>>) -> Self {
        Location {
            inner: Loc::Variant(name.into()),
        }
    }
    /// This represents a tuple or array index.
    pub fn idx(i: usize) -> Self {
        Location {
            inner: Loc::Index(i),
        }
    }
}
