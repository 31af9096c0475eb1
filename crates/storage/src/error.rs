// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::wal::WalReadError;
use braid_core::KeyError;
use thiserror::Error;

/// Errors raised by a substrate or the storage directory
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("WAL read error: {0}")]
    WalRead(#[from] WalReadError),
    #[error("invalid key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: KeyError,
    },
    #[error("invalid payload hex at sequence {sequence}: {source}")]
    PayloadHex {
        sequence: u64,
        #[source]
        source: hex::FromHexError,
    },
    #[error("WAL writer failed to roll back a torn append")]
    Poisoned,
    #[error("storage closed")]
    Closed,
}
