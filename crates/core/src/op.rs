// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation tags written into the log

use crate::codec::{DecodeError, Payload};
use crate::writer::{Role, WriterKey};

pub const ADD: &str = "add";
pub const ADD_INDEXER: &str = "add-indexer";
pub const REMOVE: &str = "remove";
pub const APPEND: &str = "append";
pub const PUT: &str = "put";
pub const DEL: &str = "del";

/// A decoded membership operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Add { key: WriterKey, role: Role },
    Remove { key: WriterKey },
}

impl Membership {
    /// Tag for an add request
    pub fn add_tag(indexer: bool) -> &'static str {
        if indexer {
            ADD_INDEXER
        } else {
            ADD
        }
    }

    /// Interpret `tag` as a membership operation.
    ///
    /// `Ok(None)` means the tag is not a membership tag. A membership tag
    /// without a valid writer key is a decode error.
    pub fn parse<V>(tag: &str, payload: &Payload<V>) -> Result<Option<Self>, DecodeError> {
        let role = match tag {
            ADD => Some(Role::Member),
            ADD_INDEXER => Some(Role::Indexer),
            REMOVE => None,
            _ => return Ok(None),
        };
        let text = payload.require_key(tag)?;
        let key: WriterKey = text
            .parse()
            .map_err(|e| DecodeError::InvalidKey(format!("{text}: {e}")))?;
        Ok(Some(match role {
            Some(role) => Self::Add { key, role },
            None => Self::Remove { key },
        }))
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
