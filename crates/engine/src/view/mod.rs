// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized views folded from the log
//!
//! A view owns its dispatch table. Tags it does not recognize fall through
//! to the membership table and then to the unknown-op counter.

pub mod feed;
pub mod record;

pub use feed::FeedView;
pub use record::{BinaryKeys, KeyLayer, RecordView, TextKeys};

use crate::dispatch::Dispatch;
use braid_core::{DecodeError, Encoding, Payload, ViewConfig};

/// Value type carried by a view's entries
pub type ValueOf<V> = <<V as View>::Encoding as Encoding>::Value;

pub trait View: Send + 'static {
    /// Encoding of the `value` field in this view's log entries
    type Encoding: Encoding + Default;

    /// Storage type tag, e.g. `feed<json>`
    fn kind() -> String;

    /// Hook for variants that pin part of the view config
    fn adjust_config(config: ViewConfig) -> ViewConfig {
        config
    }

    fn open(name: String, config: &ViewConfig) -> Self;

    fn name(&self) -> &str;

    /// Apply one decoded entry. Must validate before mutating so a failed
    /// entry leaves the view untouched.
    fn apply(&mut self, tag: &str, payload: &Payload<ValueOf<Self>>)
        -> Result<Dispatch, DecodeError>;
}
