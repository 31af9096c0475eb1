// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable single-directory substrate
//!
//! All local writers append to one WAL file, so file order is the canonical
//! order. Nodes are cached in memory after open; the file is only re-read
//! on the next open.

use super::reader::WalReader;
use super::writer::WalWriter;
use crate::substrate::{Node, Substrate};
use crate::StorageError;
use async_trait::async_trait;
use braid_core::WriterKey;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Configuration for [`WalLog`]
#[derive(Debug, Clone)]
pub struct WalLogConfig {
    /// fsync after every append
    pub sync: bool,
    /// Truncate a torn tail on open instead of failing
    pub repair: bool,
}

impl Default for WalLogConfig {
    fn default() -> Self {
        Self {
            sync: true,
            repair: false,
        }
    }
}

struct Inner {
    writer: WalWriter,
    nodes: Vec<Node>,
}

/// WAL-backed substrate
pub struct WalLog {
    path: PathBuf,
    inner: Arc<Mutex<Inner>>,
    closed: AtomicBool,
}

impl WalLog {
    /// Open or create the log at `path`
    pub fn open(path: &Path, config: WalLogConfig) -> Result<Self, StorageError> {
        let validation = WalReader::open(path)?.validate()?;
        if let Some(corruption) = &validation.corruption {
            if !config.repair {
                tracing::warn!(
                    line = corruption.line,
                    reason = %corruption.reason,
                    "WAL corruption detected; reopen with repair to truncate"
                );
                return Err(super::reader::WalReadError::Corrupted {
                    line: corruption.line,
                    reason: corruption.reason.clone(),
                }
                .into());
            }
            Self::repair(path)?;
        }

        let mut nodes = Vec::new();
        for entry in WalReader::open(path)?.entries()? {
            let entry = entry?;
            nodes.push(Node {
                position: entry.sequence,
                writer: entry.writer,
                value: entry.value()?,
            });
        }

        let writer = WalWriter::open(path, config.sync)?;
        tracing::info!(path = %path.display(), nodes = nodes.len(), "opened WAL log");

        Ok(Self {
            path: path.to_path_buf(),
            inner: Arc::new(Mutex::new(Inner { writer, nodes })),
            closed: AtomicBool::new(false),
        })
    }

    /// Another handle onto the same file, with its own lifecycle
    pub fn replica(&self) -> Self {
        Self {
            path: self.path.clone(),
            inner: Arc::clone(&self.inner),
            closed: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate a WAL file at the first corruption point.
    ///
    /// Returns the number of bytes removed, or 0 if the file was clean.
    pub fn repair(path: &Path) -> Result<u64, StorageError> {
        if !path.exists() {
            return Ok(0);
        }

        let validation = WalReader::open(path)?.validate()?;
        if validation.corruption.is_none() {
            return Ok(0);
        }

        let old_size = std::fs::metadata(path)?.len();
        let keep = validation.last_valid_position.min(old_size);

        let file = std::fs::OpenOptions::new().write(true).open(path)?;
        file.set_len(keep)?;
        file.sync_all()?;

        tracing::info!(position = keep, removed = old_size - keep, "WAL truncated at corruption point");
        Ok(old_size - keep)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StorageError::Closed);
        }
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl Substrate for WalLog {
    async fn append(&self, writer: &WriterKey, value: Vec<u8>) -> Result<u64, StorageError> {
        let mut inner = self.lock()?;
        let position = inner.writer.append(*writer, &value)?;
        inner.nodes.push(Node {
            position,
            writer: *writer,
            value,
        });
        tracing::debug!(position, writer = %writer.short(), "WAL append");
        Ok(position)
    }

    async fn read_from(&self, position: u64, limit: usize) -> Result<Vec<Node>, StorageError> {
        let inner = self.lock()?;
        let start = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(inner.nodes.len());
        Ok(inner.nodes[start..].iter().take(limit).cloned().collect())
    }

    async fn len(&self) -> Result<u64, StorageError> {
        Ok(self.lock()?.nodes.len() as u64)
    }

    async fn close(&self) -> Result<(), StorageError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.writer.sync()?;
        tracing::info!(path = %self.path.display(), "closed WAL log");
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
