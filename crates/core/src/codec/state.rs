// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffer primitives shared by every encoding
//!
//! Integers use the compact varint layout:
//!
//! ```text
//! n <= 0xfc         -> [n]
//! n <= 0xffff       -> [0xfd, u16 LE]
//! n <= 0xffff_ffff  -> [0xfe, u32 LE]
//! otherwise         -> [0xff, u64 LE]
//! ```

use thiserror::Error;

/// Errors surfaced while reading a buffer
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("out of bounds: needed {needed} bytes, {remaining} remaining")]
    OutOfBounds { needed: usize, remaining: usize },
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    #[error("unknown flag bits: {0:#04x}")]
    UnknownFlags(u8),
    #[error("missing field `{field}` for `{tag}`")]
    MissingField { tag: String, field: &'static str },
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("value does not re-encode: {0}")]
    Unencodable(#[from] EncodeError),
}

/// Errors surfaced while writing a value
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Number of bytes `uint` writes for `n`
pub fn uint_len(n: u64) -> usize {
    if n <= 0xfc {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Growable write buffer
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn uint(&mut self, n: u64) {
        if n <= 0xfc {
            self.buf.push(n as u8);
        } else if n <= 0xffff {
            self.buf.push(0xfd);
            self.buf.extend_from_slice(&(n as u16).to_le_bytes());
        } else if n <= 0xffff_ffff {
            self.buf.push(0xfe);
            self.buf.extend_from_slice(&(n as u32).to_le_bytes());
        } else {
            self.buf.push(0xff);
            self.buf.extend_from_slice(&n.to_le_bytes());
        }
    }

    pub fn u8(&mut self, n: u8) {
        self.buf.push(n);
    }

    /// Bytes without a length prefix
    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Length-prefixed bytes
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.uint(bytes.len() as u64);
        self.raw(bytes);
    }

    /// Length-prefixed UTF-8 text
    pub fn str(&mut self, s: &str) {
        self.bytes(s.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed buffer
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::OutOfBounds {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Everything left in the buffer
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn uint(&mut self) -> Result<u64, DecodeError> {
        let head = self.u8()?;
        match head {
            0xfd => {
                let mut b = [0u8; 2];
                b.copy_from_slice(self.take(2)?);
                Ok(u16::from_le_bytes(b) as u64)
            }
            0xfe => {
                let mut b = [0u8; 4];
                b.copy_from_slice(self.take(4)?);
                Ok(u32::from_le_bytes(b) as u64)
            }
            0xff => {
                let mut b = [0u8; 8];
                b.copy_from_slice(self.take(8)?);
                Ok(u64::from_le_bytes(b))
            }
            n => Ok(n as u64),
        }
    }

    pub fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.uint()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::OutOfBounds {
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.take(len)
    }

    pub fn str(&mut self) -> Result<&'a str, DecodeError> {
        Ok(std::str::from_utf8(self.bytes()?)?)
    }

    /// Fail unless the whole buffer was consumed
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
