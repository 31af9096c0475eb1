// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The replicated-storage seam
//!
//! A substrate stores raw entry bytes per writer and delivers them to every
//! replica in one linear order that respects each writer's own append order.
//! Positions are canonical: position `n` is the same node on every replica.

use crate::StorageError;
use async_trait::async_trait;
use braid_core::WriterKey;
use std::sync::Arc;

/// One delivered log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Canonical position in the merged log
    pub position: u64,
    pub writer: WriterKey,
    /// Tagged-entry bytes
    pub value: Vec<u8>,
}

#[async_trait]
pub trait Substrate: Send + Sync + 'static {
    /// Durably append `value` on behalf of `writer`. Returns its position.
    async fn append(&self, writer: &WriterKey, value: Vec<u8>) -> Result<u64, StorageError>;

    /// Up to `limit` nodes starting at `position`, in canonical order
    async fn read_from(&self, position: u64, limit: usize) -> Result<Vec<Node>, StorageError>;

    /// Number of nodes currently known
    async fn len(&self) -> Result<u64, StorageError>;

    /// Release this handle. Idempotent.
    async fn close(&self) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: Substrate + ?Sized> Substrate for Arc<S> {
    async fn append(&self, writer: &WriterKey, value: Vec<u8>) -> Result<u64, StorageError> {
        (**self).append(writer, value).await
    }

    async fn read_from(&self, position: u64, limit: usize) -> Result<Vec<Node>, StorageError> {
        (**self).read_from(position, limit).await
    }

    async fn len(&self) -> Result<u64, StorageError> {
        (**self).len().await
    }

    async fn close(&self) -> Result<(), StorageError> {
        (**self).close().await
    }
}
