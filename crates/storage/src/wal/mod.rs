// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-Ahead Log (WAL) substrate
//!
//! ```text
//! append(writer, bytes) → WalEntry → WalWriter → disk (wal.jsonl)
//!                                                  ↓
//!                                  WalReader → nodes → apply loop
//! ```
//!
//! ## Durability Guarantees
//!
//! - Appends are fsync'd before returning (unless disabled)
//! - Checksums detect corruption from bit flips
//! - Truncated writes (crash during append) are detected on read
//! - `WalLog::repair` truncates the file at the last valid entry

pub mod entry;
pub mod log;
pub mod reader;
pub mod writer;

pub use entry::WalEntry;
pub use log::{WalLog, WalLogConfig};
pub use reader::{WalCorruption, WalEntryIter, WalReadError, WalReader, WalValidation};
pub use writer::WalWriter;
