// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the apply core

use braid_core::{ConfigError, DecodeError, EncodeError};
use braid_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by a [`Base`](crate::Base)
///
/// Unknown operation tags are not errors: they are skipped so older
/// replicas tolerate entries from newer writers.
#[derive(Debug, Error)]
pub enum BraidError {
    /// Malformed entry; the apply loop cannot continue past it
    #[error("decode error at log position {position}: {source}")]
    Decode {
        position: u64,
        #[source]
        source: DecodeError,
    },
    /// Materialized view bytes could not be read back
    #[error("corrupt view entry at {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: DecodeError,
    },
    /// Local value could not be encoded; nothing was appended
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("not ready")]
    NotReady,
    #[error("closed")]
    Closed,
    #[error("local writer {0} is not in the writer set")]
    NotWritable(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
