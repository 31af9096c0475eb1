// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only sequence view

use super::View;
use crate::dispatch::Dispatch;
use braid_core::{op, DecodeError, Encoding, Payload, ViewConfig};
use std::fmt;
use std::sync::Arc;

/// Ordered blocks, each holding one encoded value
pub struct FeedView<E> {
    name: String,
    blocks: Vec<Arc<[u8]>>,
    encoding: E,
}

impl<E: Encoding + Default> FeedView<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            encoding: E::default(),
        }
    }

    pub fn len(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Decoded value at `index`, `None` past the end
    pub fn get(&self, index: u64) -> Result<Option<E::Value>, DecodeError> {
        let Some(block) = usize::try_from(index).ok().and_then(|i| self.blocks.get(i)) else {
            return Ok(None);
        };
        self.encoding.decode(block).map(Some)
    }

    /// Detached copy sharing this view's blocks
    ///
    /// Later appends to `self` are not seen by the snapshot.
    pub fn snapshot(&self) -> Self {
        Self {
            name: self.name.clone(),
            blocks: self.blocks.clone(),
            encoding: E::default(),
        }
    }

    pub(crate) fn push(&mut self, value: &E::Value) -> Result<u64, DecodeError> {
        self.blocks.push(self.encoding.encode(value)?.into());
        Ok(self.len() - 1)
    }
}

impl<E: Encoding + Default> View for FeedView<E> {
    type Encoding = E;

    fn kind() -> String {
        format!("feed<{}>", E::NAME)
    }

    fn open(name: String, _config: &ViewConfig) -> Self {
        Self::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, tag: &str, payload: &Payload<E::Value>) -> Result<Dispatch, DecodeError> {
        match tag {
            op::APPEND => {
                let value = payload.require_value(tag)?;
                let index = self.push(value)?;
                tracing::debug!(view = %self.name, index, "appended");
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Unhandled),
        }
    }
}

impl<E> PartialEq for FeedView<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.blocks == other.blocks
    }
}

impl<E> fmt::Debug for FeedView<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedView")
            .field("name", &self.name)
            .field("len", &self.blocks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
