// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writer-set owner and the base membership dispatch table

use crate::dispatch::Dispatch;
use braid_core::{DecodeError, Membership, Payload, Role, WriterKey, WriterSet};

/// Host context handed to the apply fold
///
/// Owns the derived writer set, separate from any view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    writers: WriterSet,
}

impl Host {
    pub fn new(bootstrap: WriterKey) -> Self {
        Self {
            writers: WriterSet::bootstrap(bootstrap),
        }
    }

    pub fn add_writer(&mut self, key: WriterKey, indexer: bool) {
        let role = if indexer { Role::Indexer } else { Role::Member };
        match self.writers.add(key, role) {
            Some(previous) if previous != role => {
                tracing::info!(writer = %key.short(), ?previous, ?role, "writer role changed")
            }
            Some(_) => {}
            None => tracing::info!(writer = %key.short(), ?role, "writer added"),
        }
    }

    pub fn remove_writer(&mut self, key: &WriterKey) {
        if self.writers.remove(key).is_some() {
            tracing::info!(writer = %key.short(), "writer removed");
        }
    }

    pub fn is_writer(&self, key: &WriterKey) -> bool {
        self.writers.contains(key)
    }

    pub fn writers(&self) -> &WriterSet {
        &self.writers
    }
}

/// Base table: `add`, `add-indexer`, `remove`
pub fn apply_membership<V>(
    tag: &str,
    payload: &Payload<V>,
    host: &mut Host,
) -> Result<Dispatch, DecodeError> {
    match Membership::parse(tag, payload)? {
        Some(Membership::Add { key, role }) => {
            host.add_writer(key, role == Role::Indexer);
            Ok(Dispatch::Handled)
        }
        Some(Membership::Remove { key }) => {
            host.remove_writer(&key);
            Ok(Dispatch::Handled)
        }
        None => Ok(Dispatch::Unhandled),
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
