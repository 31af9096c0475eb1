// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL entry structure with checksum verification
//!
//! Each line holds a sequence number, timestamp, writer key, the hex-encoded
//! tagged-entry bytes, and a CRC32 over writer key plus payload.

use crate::StorageError;
use braid_core::WriterKey;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single entry in the write-ahead log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing sequence number (canonical position)
    pub sequence: u64,
    /// Microseconds since Unix epoch; informational, never applied
    pub timestamp_micros: u64,
    pub writer: WriterKey,
    /// Hex-encoded entry bytes
    pub payload: String,
    /// CRC32 of writer key bytes followed by payload bytes
    pub checksum: u32,
}

impl WalEntry {
    pub fn new(sequence: u64, writer: WriterKey, value: &[u8]) -> Self {
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Self::new_with_timestamp(sequence, timestamp_micros, writer, value)
    }

    /// Create an entry with a specific timestamp (for testing)
    pub fn new_with_timestamp(
        sequence: u64,
        timestamp_micros: u64,
        writer: WriterKey,
        value: &[u8],
    ) -> Self {
        Self {
            sequence,
            timestamp_micros,
            writer,
            payload: hex::encode(value),
            checksum: Self::calculate_checksum(&writer, value),
        }
    }

    fn calculate_checksum(writer: &WriterKey, value: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(writer.as_bytes());
        hasher.update(value);
        hasher.finalize()
    }

    /// Decoded payload bytes
    pub fn value(&self) -> Result<Vec<u8>, StorageError> {
        hex::decode(&self.payload).map_err(|source| StorageError::PayloadHex {
            sequence: self.sequence,
            source,
        })
    }

    /// Verify the checksum matches writer and payload
    pub fn verify(&self) -> bool {
        match hex::decode(&self.payload) {
            Ok(value) => self.checksum == Self::calculate_checksum(&self.writer, &value),
            Err(_) => false,
        }
    }

    /// Serialize to newline-delimited JSON (one line)
    pub fn to_line(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(StorageError::from)
    }

    /// Parse from a single line of JSON
    pub fn from_line(line: &str) -> Result<Self, StorageError> {
        serde_json::from_str(line).map_err(StorageError::from)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
