// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process shared log
//!
//! Every replica handle sees the same node vector, so arrival order is the
//! canonical order. Used for tests and for embedding several replicas in one
//! process.

use crate::substrate::{Node, Substrate};
use crate::StorageError;
use async_trait::async_trait;
use braid_core::WriterKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct MemoryLog {
    nodes: Arc<Mutex<Vec<Node>>>,
    closed: AtomicBool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Another handle onto the same log, with its own lifecycle
    pub fn replica(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Snapshot of every node (for inspection in tests)
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Substrate for MemoryLog {
    async fn append(&self, writer: &WriterKey, value: Vec<u8>) -> Result<u64, StorageError> {
        self.check_open()?;
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        let position = nodes.len() as u64;
        nodes.push(Node {
            position,
            writer: *writer,
            value,
        });
        tracing::trace!(position, writer = %writer.short(), "memory append");
        Ok(position)
    }

    async fn read_from(&self, position: u64, limit: usize) -> Result<Vec<Node>, StorageError> {
        self.check_open()?;
        let nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        let start = usize::try_from(position).unwrap_or(usize::MAX).min(nodes.len());
        Ok(nodes[start..].iter().take(limit).cloned().collect())
    }

    async fn len(&self) -> Result<u64, StorageError> {
        self.check_open()?;
        Ok(self.nodes.lock().unwrap_or_else(|e| e.into_inner()).len() as u64)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
