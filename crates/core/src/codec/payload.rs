// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared payload shape for every tag of one view variant
//!
//! Layout: `[flags u8][key utf8?][value E?][sub utf8?]` where flag bit 1 marks
//! a key, 2 a value and 4 a namespace.

use super::encoding::Encoding;
use super::state::{DecodeError, Decoder, EncodeError, Encoder};

const FLAG_KEY: u8 = 0b001;
const FLAG_VALUE: u8 = 0b010;
const FLAG_SUB: u8 = 0b100;

/// Body of a log entry: `{key?, value?, sub?}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<V> {
    pub key: Option<String>,
    pub value: Option<V>,
    pub sub: Option<String>,
}

impl<V> Default for Payload<V> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
            sub: None,
        }
    }
}

impl<V> Payload<V> {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_value(value: V) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn sub(mut self, sub: Option<String>) -> Self {
        self.sub = sub;
        self
    }

    pub fn value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Key required by `tag`
    pub fn require_key(&self, tag: &str) -> Result<&str, DecodeError> {
        self.key.as_deref().ok_or_else(|| DecodeError::MissingField {
            tag: tag.to_string(),
            field: "key",
        })
    }

    /// Value required by `tag`
    pub fn require_value(&self, tag: &str) -> Result<&V, DecodeError> {
        self.value.as_ref().ok_or_else(|| DecodeError::MissingField {
            tag: tag.to_string(),
            field: "value",
        })
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.key.is_some() {
            flags |= FLAG_KEY;
        }
        if self.value.is_some() {
            flags |= FLAG_VALUE;
        }
        if self.sub.is_some() {
            flags |= FLAG_SUB;
        }
        flags
    }
}

/// Encoding for `Payload<E::Value>`
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadEncoding<E>(pub E);

impl<E: Encoding> Encoding for PayloadEncoding<E> {
    type Value = Payload<E::Value>;
    const NAME: &'static str = E::NAME;

    fn measure(&self, payload: &Self::Value) -> Result<usize, EncodeError> {
        let text = |s: &Option<String>| {
            s.as_ref()
                .map_or(0, |s| super::state::uint_len(s.len() as u64) + s.len())
        };
        let value = match &payload.value {
            Some(v) => self.0.measure(v)?,
            None => 0,
        };
        Ok(1 + text(&payload.key) + value + text(&payload.sub))
    }

    fn write(&self, enc: &mut Encoder, payload: &Self::Value) -> Result<(), EncodeError> {
        enc.u8(payload.flags());
        if let Some(key) = &payload.key {
            enc.str(key);
        }
        if let Some(value) = &payload.value {
            self.0.write(enc, value)?;
        }
        if let Some(sub) = &payload.sub {
            enc.str(sub);
        }
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Self::Value, DecodeError> {
        let flags = dec.u8()?;
        if flags & !(FLAG_KEY | FLAG_VALUE | FLAG_SUB) != 0 {
            return Err(DecodeError::UnknownFlags(flags));
        }
        let key = if flags & FLAG_KEY != 0 {
            Some(dec.str()?.to_string())
        } else {
            None
        };
        let value = if flags & FLAG_VALUE != 0 {
            Some(self.0.read(dec)?)
        } else {
            None
        };
        let sub = if flags & FLAG_SUB != 0 {
            Some(dec.str()?.to_string())
        } else {
            None
        };
        Ok(Payload { key, value, sub })
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
