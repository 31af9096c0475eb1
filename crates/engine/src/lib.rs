// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! braid-engine: the membership-aware apply core and its views
//!
//! A [`Base`] replays a substrate's canonical node order into a view. Four
//! ready-made variants cover the common shapes:
//!
//! | alias                | view                           | kind                   |
//! |----------------------|--------------------------------|------------------------|
//! | [`Feed`]             | `FeedView<Binary>`             | `feed<binary>`         |
//! | [`FeedJson`]         | `FeedView<Json>`               | `feed<json>`           |
//! | [`RecordStringJson`] | `RecordView<TextKeys, Json>`   | `record<string, json>` |
//! | [`RecordBinaryJson`] | `RecordView<BinaryKeys, Json>` | `record<binary, json>` |

mod base;
mod dispatch;
mod error;
mod feed;
mod host;
mod record;
pub mod scan;
pub mod view;

pub use base::{AddWriterOptions, Base, ViewRef};
pub use dispatch::Dispatch;
pub use error::BraidError;
pub use host::{apply_membership, Host};
pub use scan::{AmendConfig, Amendment, Scan, ScanConfig, ScanCursor};
pub use view::{BinaryKeys, FeedView, KeyLayer, RecordView, TextKeys, View};

use braid_core::{Binary, Json};

pub type Feed<S> = Base<FeedView<Binary>, S>;
pub type FeedJson<S> = Base<FeedView<Json>, S>;
pub type RecordStringJson<S> = Base<RecordView<TextKeys, Json>, S>;
pub type RecordBinaryJson<S> = Base<RecordView<BinaryKeys, Json>, S>;
