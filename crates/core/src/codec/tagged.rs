// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation-tag wrapper around any payload encoding
//!
//! Wire layout: `[uint tag len][utf8 tag][payload per inner encoding]`.
//! The wrapper validates nothing about the tag; buffer errors from the
//! inner encoding pass through untouched.

use super::encoding::Encoding;
use super::state::{DecodeError, Decoder, EncodeError, Encoder};

/// A decoded log entry: operation tag plus payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry<T> {
    pub tag: String,
    pub value: T,
}

impl<T> TaggedEntry<T> {
    pub fn new(tag: impl Into<String>, value: T) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
}

/// Derived encoding for `TaggedEntry<E::Value>`
#[derive(Debug, Clone, Copy, Default)]
pub struct Tagged<E>(pub E);

impl<E: Encoding> Encoding for Tagged<E> {
    type Value = TaggedEntry<E::Value>;
    const NAME: &'static str = E::NAME;

    fn measure(&self, entry: &Self::Value) -> Result<usize, EncodeError> {
        let tag = super::state::uint_len(entry.tag.len() as u64) + entry.tag.len();
        Ok(tag + self.0.measure(&entry.value)?)
    }

    fn write(&self, enc: &mut Encoder, entry: &Self::Value) -> Result<(), EncodeError> {
        enc.str(&entry.tag);
        self.0.write(enc, &entry.value)
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Self::Value, DecodeError> {
        let tag = dec.str()?.to_string();
        let value = self.0.read(dec)?;
        Ok(TaggedEntry { tag, value })
    }
}

#[cfg(test)]
#[path = "tagged_tests.rs"]
mod tests;
