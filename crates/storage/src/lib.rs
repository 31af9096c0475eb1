// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Substrates that deliver ordered, deduplicated entry bytes to the apply loop

mod error;
pub mod memory;
pub mod store;
pub mod substrate;
pub mod wal;

pub use error::StorageError;
pub use memory::MemoryLog;
pub use store::{create, StoreDir};
pub use substrate::{Node, Substrate};
pub use wal::{WalLog, WalLogConfig};
