// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome of offering an entry to one dispatch table

/// Each layer either consumes a tag or hands it down to the next table.
///
/// View tables run first, then the membership table. A tag nobody handles
/// is an unknown operation and is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Unhandled,
}
