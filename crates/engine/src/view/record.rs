// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value view with optional sub-namespaces
//!
//! Keys are stored as raw bytes so iteration order within a namespace is
//! byte order. The key layer decides how a caller's key is written into the
//! log and how it is laid out in the view.

use super::View;
use crate::dispatch::Dispatch;
use braid_core::{op, Binary, DecodeError, EncodeError, Encoding, Payload, Raw, Utf8, ViewConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Translation between caller keys, log keys, and view keys
pub trait KeyLayer: Send + Sync + 'static {
    type Key;

    const NAME: &'static str;

    /// Text form written into the entry's `key` field
    fn to_log(key: &Self::Key) -> String;

    /// View bytes for a key read back out of the log
    fn to_storage(key: &str) -> Result<Vec<u8>, DecodeError>;

    /// View bytes for a caller key
    fn lookup(key: &Self::Key) -> Result<Vec<u8>, EncodeError>;

    fn from_storage(bytes: &[u8]) -> Result<Self::Key, DecodeError>;
}

/// UTF-8 keys, stored as their raw bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct TextKeys;

impl KeyLayer for TextKeys {
    type Key = String;
    const NAME: &'static str = "string";

    fn to_log(key: &String) -> String {
        key.clone()
    }

    fn to_storage(key: &str) -> Result<Vec<u8>, DecodeError> {
        Ok(Raw(Utf8).encode(&key.to_string())?)
    }

    fn lookup(key: &String) -> Result<Vec<u8>, EncodeError> {
        Raw(Utf8).encode(key)
    }

    fn from_storage(bytes: &[u8]) -> Result<String, DecodeError> {
        Raw(Utf8).decode(bytes)
    }
}

/// Byte keys: hex text in the log, raw bytes in the view
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryKeys;

impl KeyLayer for BinaryKeys {
    type Key = Vec<u8>;
    const NAME: &'static str = "binary";

    fn to_log(key: &Vec<u8>) -> String {
        hex::encode(key)
    }

    fn to_storage(key: &str) -> Result<Vec<u8>, DecodeError> {
        hex::decode(key).map_err(|e| DecodeError::InvalidKey(format!("{key:?}: {e}")))
    }

    fn lookup(key: &Vec<u8>) -> Result<Vec<u8>, EncodeError> {
        Raw(Binary).encode(key)
    }

    fn from_storage(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Raw(Binary).decode(bytes)
    }
}

type Namespace = BTreeMap<Vec<u8>, Vec<u8>>;

/// An empty sub names the root namespace
fn namespace_key(sub: Option<&str>) -> Option<String> {
    sub.filter(|s| !s.is_empty()).map(str::to_string)
}

pub struct RecordView<K, E> {
    name: String,
    namespaces: BTreeMap<Option<String>, Namespace>,
    encoding: E,
    keys: PhantomData<fn() -> K>,
}

impl<K: KeyLayer, E: Encoding + Default> RecordView<K, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: BTreeMap::new(),
            encoding: E::default(),
            keys: PhantomData,
        }
    }

    fn namespace(&self, sub: Option<&str>) -> Option<&Namespace> {
        self.namespaces.get(&namespace_key(sub))
    }

    pub fn get(&self, key: &K::Key, sub: Option<&str>) -> Result<Option<E::Value>, DecodeError> {
        let key = K::lookup(key)?;
        let Some(bytes) = self.namespace(sub).and_then(|ns| ns.get(&key)) else {
            return Ok(None);
        };
        self.encoding.decode(bytes).map(Some)
    }

    /// All entries of one namespace in key byte order
    pub fn entries(&self, sub: Option<&str>) -> Result<Vec<(K::Key, E::Value)>, DecodeError> {
        let Some(ns) = self.namespace(sub) else {
            return Ok(Vec::new());
        };
        ns.iter()
            .map(|(k, v)| Ok((K::from_storage(k)?, self.encoding.decode(v)?)))
            .collect()
    }

    /// Number of keys in one namespace
    pub fn len(&self, sub: Option<&str>) -> usize {
        self.namespace(sub).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

impl<K: KeyLayer, E: Encoding + Default> View for RecordView<K, E> {
    type Encoding = E;

    fn kind() -> String {
        format!("record<{}, {}>", K::NAME, E::NAME)
    }

    fn adjust_config(mut config: ViewConfig) -> ViewConfig {
        config.extension = Some(false);
        config
    }

    fn open(name: String, _config: &ViewConfig) -> Self {
        Self::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, tag: &str, payload: &Payload<E::Value>) -> Result<Dispatch, DecodeError> {
        match tag {
            op::PUT => {
                let key = K::to_storage(payload.require_key(tag)?)?;
                let value = self.encoding.encode(payload.require_value(tag)?)?;
                let sub = namespace_key(payload.sub.as_deref());
                tracing::debug!(view = %self.name, ?sub, "put");
                self.namespaces
                    .entry(sub)
                    .or_default()
                    .insert(key, value);
                Ok(Dispatch::Handled)
            }
            op::DEL => {
                let key = K::to_storage(payload.require_key(tag)?)?;
                let sub = namespace_key(payload.sub.as_deref());
                tracing::debug!(view = %self.name, ?sub, "del");
                if let Some(ns) = self.namespaces.get_mut(&sub) {
                    ns.remove(&key);
                    if ns.is_empty() {
                        self.namespaces.remove(&sub);
                    }
                }
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Unhandled),
        }
    }
}

impl<K, E> PartialEq for RecordView<K, E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespaces == other.namespaces
    }
}

impl<K, E> fmt::Debug for RecordView<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView")
            .field("name", &self.name)
            .field("namespaces", &self.namespaces.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
