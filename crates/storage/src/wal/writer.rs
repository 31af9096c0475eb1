// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL writer for durable append operations

use super::entry::WalEntry;
use super::reader::WalReader;
use crate::StorageError;
use braid_core::WriterKey;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// WAL writer for durable append operations
pub struct WalWriter {
    path: PathBuf,
    file: File,
    next_sequence: u64,
    sync: bool,
    failed: bool,
}

impl WalWriter {
    /// Open or create a WAL file
    ///
    /// If the file exists, scans to find the next sequence number. With
    /// `sync` set every append is fsync'd before returning.
    pub fn open(path: &Path, sync: bool) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let next_sequence = if path.exists() {
            WalReader::open(path)?
                .last_sequence()?
                .map(|s| s + 1)
                .unwrap_or(0)
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            next_sequence,
            sync,
            failed: false,
        })
    }

    /// Append entry bytes for `writer`
    ///
    /// Returns the assigned sequence number.
    pub fn append(&mut self, writer: WriterKey, value: &[u8]) -> Result<u64, StorageError> {
        let entry = WalEntry::new(self.next_sequence, writer, value);
        self.write_entry(&entry)?;
        Ok(entry.sequence)
    }

    fn write_entry(&mut self, entry: &WalEntry) -> Result<(), StorageError> {
        if self.failed {
            return Err(StorageError::Poisoned);
        }
        let mut line = entry.to_line()?;
        line.push('\n');

        let start = self.file.metadata()?.len();
        if let Err(e) = self.write_line(line.as_bytes()) {
            self.rollback(start);
            return Err(e.into());
        }

        self.next_sequence += 1;
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.file.write_all(line)?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Cut a torn line back off the end of the file
    ///
    /// A writer whose file cannot be restored refuses further appends, since
    /// the next line would land after the partial one.
    fn rollback(&mut self, len: u64) {
        if let Err(e) = self.file.set_len(len) {
            tracing::warn!(path = %self.path.display(), error = %e, "WAL rollback failed");
            self.failed = true;
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<(), StorageError> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Next sequence number to be assigned
    pub fn sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
