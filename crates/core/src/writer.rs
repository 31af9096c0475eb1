// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writer identities and the derived writer set

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected {KEY_LEN} bytes, got {0}")]
    Length(usize),
}

/// Opaque 32-byte writer identity
///
/// Rendered as lowercase hex wherever it must travel as text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriterKey([u8; KEY_LEN]);

impl WriterKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Fresh random key for a new local writer
    pub fn generate() -> Self {
        Self(rand::random())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First eight hex digits, for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl TryFrom<&[u8]> for WriterKey {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; KEY_LEN] = bytes.try_into().map_err(|_| KeyError::Length(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl FromStr for WriterKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for WriterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for WriterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WriterKey({})", self.short())
    }
}

impl Serialize for WriterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WriterKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Writer role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    /// May finalize the log ordering
    Indexer,
}

/// Active writers, folded from membership entries in log order
///
/// Ordered so iteration (and therefore any derived state) is identical on
/// every replica.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterSet {
    writers: BTreeMap<WriterKey, Role>,
}

impl WriterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seeded with the bootstrap writer as an indexer
    pub fn bootstrap(key: WriterKey) -> Self {
        let mut set = Self::new();
        set.add(key, Role::Indexer);
        set
    }

    /// Add or re-role a writer. Returns the previous role, if any.
    pub fn add(&mut self, key: WriterKey, role: Role) -> Option<Role> {
        self.writers.insert(key, role)
    }

    /// Remove a writer. Removing an absent writer is a no-op.
    pub fn remove(&mut self, key: &WriterKey) -> Option<Role> {
        self.writers.remove(key)
    }

    pub fn contains(&self, key: &WriterKey) -> bool {
        self.writers.contains_key(key)
    }

    pub fn role(&self, key: &WriterKey) -> Option<Role> {
        self.writers.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WriterKey, Role)> {
        self.writers.iter().map(|(k, r)| (k, *r))
    }

    pub fn indexers(&self) -> impl Iterator<Item = &WriterKey> {
        self.writers
            .iter()
            .filter(|(_, role)| **role == Role::Indexer)
            .map(|(k, _)| k)
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
