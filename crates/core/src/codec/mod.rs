// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary codec layer
//!
//! ```text
//! Tagged<PayloadEncoding<E>>
//!   [uint len][utf8 tag] [flags][key?][E value?][sub?]
//! ```
//!
//! Every log entry is a [`TaggedEntry`] whose payload shape is shared by all
//! tags of one view variant; only the value encoding `E` varies.

pub mod encoding;
pub mod payload;
pub mod state;
pub mod tagged;

pub use encoding::{Binary, Encoding, Json, Optional, Raw, Uint, Utf8};
pub use payload::{Payload, PayloadEncoding};
pub use state::{DecodeError, Decoder, EncodeError, Encoder};
pub use tagged::{Tagged, TaggedEntry};

/// Log encoding for a view whose values use `E`
pub type EntryEncoding<E> = Tagged<PayloadEncoding<E>>;
