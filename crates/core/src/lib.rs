// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! braid-core: shared vocabulary for the braid multi-writer log
//!
//! This crate provides:
//! - The tagged binary codec and the pluggable value encodings
//! - Writer keys, roles, and the derived writer set
//! - Operation tags and membership parsing
//! - Construction-time configuration

pub mod codec;
pub mod config;
pub mod op;
pub mod writer;

pub use codec::{
    Binary, DecodeError, EncodeError, Encoding, EntryEncoding, Json, Payload, PayloadEncoding,
    Raw, Tagged, TaggedEntry, Utf8,
};
pub use config::{BraidConfig, ConfigError, Identity, LogConfig, ViewConfig};
pub use op::Membership;
pub use writer::{KeyError, Role, WriterKey, WriterSet};
