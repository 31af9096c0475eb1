// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable value encodings
//!
//! An [`Encoding`] knows how to size, write, and read one value shape.
//! Encodings are zero-sized and stateless; they compose by nesting
//! (e.g. `Tagged<PayloadEncoding<Json<Value>>>`).

use super::state::{DecodeError, Decoder, EncodeError, Encoder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// A value codec with a measure/write/read contract
pub trait Encoding: Send + Sync + 'static {
    type Value;

    /// Short name used in storage type tags (`feed<json>`)
    const NAME: &'static str;

    /// Exact number of bytes `write` will produce
    fn measure(&self, value: &Self::Value) -> Result<usize, EncodeError>;

    fn write(&self, enc: &mut Encoder, value: &Self::Value) -> Result<(), EncodeError>;

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Self::Value, DecodeError>;

    /// Whether `value` counts as empty (an amend replacement that is not appended)
    fn is_empty_value(&self, _value: &Self::Value) -> bool {
        false
    }

    /// Encode a standalone value
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>, EncodeError> {
        let mut enc = Encoder::with_capacity(self.measure(value)?);
        self.write(&mut enc, value)?;
        Ok(enc.finish())
    }

    /// Decode a standalone value, rejecting trailing bytes
    fn decode(&self, bytes: &[u8]) -> Result<Self::Value, DecodeError> {
        let mut dec = Decoder::new(bytes);
        let value = self.read(&mut dec)?;
        dec.finish()?;
        Ok(value)
    }
}

/// Compact unsigned integer
#[derive(Debug, Clone, Copy, Default)]
pub struct Uint;

impl Encoding for Uint {
    type Value = u64;
    const NAME: &'static str = "uint";

    fn measure(&self, value: &u64) -> Result<usize, EncodeError> {
        Ok(super::state::uint_len(*value))
    }

    fn write(&self, enc: &mut Encoder, value: &u64) -> Result<(), EncodeError> {
        enc.uint(*value);
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<u64, DecodeError> {
        dec.uint()
    }
}

/// Length-prefixed UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl Encoding for Utf8 {
    type Value = String;
    const NAME: &'static str = "string";

    fn measure(&self, value: &String) -> Result<usize, EncodeError> {
        Ok(prefixed_len(value.len()))
    }

    fn write(&self, enc: &mut Encoder, value: &String) -> Result<(), EncodeError> {
        enc.str(value);
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<String, DecodeError> {
        Ok(dec.str()?.to_string())
    }

    fn is_empty_value(&self, value: &String) -> bool {
        value.is_empty()
    }
}

/// Length-prefixed opaque bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Encoding for Binary {
    type Value = Vec<u8>;
    const NAME: &'static str = "binary";

    fn measure(&self, value: &Vec<u8>) -> Result<usize, EncodeError> {
        Ok(prefixed_len(value.len()))
    }

    fn write(&self, enc: &mut Encoder, value: &Vec<u8>) -> Result<(), EncodeError> {
        enc.bytes(value);
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Vec<u8>, DecodeError> {
        Ok(dec.bytes()?.to_vec())
    }

    fn is_empty_value(&self, value: &Vec<u8>) -> bool {
        value.is_empty()
    }
}

/// Length-prefixed JSON text of any serde value
pub struct Json<T = serde_json::Value>(PhantomData<fn() -> T>);

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> std::fmt::Debug for Json<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Json")
    }
}

impl<T> Clone for Json<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Json<T> {}

impl<T> Encoding for Json<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    type Value = T;
    const NAME: &'static str = "json";

    fn measure(&self, value: &T) -> Result<usize, EncodeError> {
        Ok(prefixed_len(serde_json::to_string(value)?.len()))
    }

    fn write(&self, enc: &mut Encoder, value: &T) -> Result<(), EncodeError> {
        enc.str(&serde_json::to_string(value)?);
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<T, DecodeError> {
        Ok(serde_json::from_str(dec.str()?)?)
    }

    /// `null`, `false`, `0`, and `""` are empty
    fn is_empty_value(&self, value: &T) -> bool {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::Null) => true,
            Ok(serde_json::Value::Bool(b)) => !b,
            Ok(serde_json::Value::Number(n)) => n.as_f64() == Some(0.0),
            Ok(serde_json::Value::String(s)) => s.is_empty(),
            _ => false,
        }
    }
}

/// Drops the length prefix of an inner encoding and consumes the rest
///
/// Only valid in terminal position. Used for view keys so that byte order
/// equals text order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw<E>(pub E);

impl Encoding for Raw<Utf8> {
    type Value = String;
    const NAME: &'static str = "string";

    fn measure(&self, value: &String) -> Result<usize, EncodeError> {
        Ok(value.len())
    }

    fn write(&self, enc: &mut Encoder, value: &String) -> Result<(), EncodeError> {
        enc.raw(value.as_bytes());
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<String, DecodeError> {
        Ok(std::str::from_utf8(dec.rest())?.to_string())
    }
}

impl Encoding for Raw<Binary> {
    type Value = Vec<u8>;
    const NAME: &'static str = "binary";

    fn measure(&self, value: &Vec<u8>) -> Result<usize, EncodeError> {
        Ok(value.len())
    }

    fn write(&self, enc: &mut Encoder, value: &Vec<u8>) -> Result<(), EncodeError> {
        enc.raw(value);
        Ok(())
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Vec<u8>, DecodeError> {
        Ok(dec.rest().to_vec())
    }
}

/// One presence byte followed by the inner value when present
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<E>(pub E);

impl<E: Encoding> Encoding for Optional<E> {
    type Value = Option<E::Value>;
    const NAME: &'static str = E::NAME;

    fn measure(&self, value: &Option<E::Value>) -> Result<usize, EncodeError> {
        Ok(1 + match value {
            Some(v) => self.0.measure(v)?,
            None => 0,
        })
    }

    fn write(&self, enc: &mut Encoder, value: &Option<E::Value>) -> Result<(), EncodeError> {
        match value {
            Some(v) => {
                enc.u8(1);
                self.0.write(enc, v)
            }
            None => {
                enc.u8(0);
                Ok(())
            }
        }
    }

    fn read(&self, dec: &mut Decoder<'_>) -> Result<Option<E::Value>, DecodeError> {
        match dec.u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.0.read(dec)?)),
            other => Err(DecodeError::UnknownFlags(other)),
        }
    }

    fn is_empty_value(&self, value: &Option<E::Value>) -> bool {
        value.as_ref().map_or(true, |v| self.0.is_empty_value(v))
    }
}

fn prefixed_len(len: usize) -> usize {
    super::state::uint_len(len as u64) + len
}

#[cfg(test)]
#[path = "encoding_tests.rs"]
mod tests;
