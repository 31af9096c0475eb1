// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value operations on a [`Base`] over a [`RecordView`]

use crate::base::Base;
use crate::error::BraidError;
use crate::view::{KeyLayer, RecordView};
use braid_core::{op, DecodeError, Encoding, Payload};
use braid_storage::Substrate;

impl<K, E, S> Base<RecordView<K, E>, S>
where
    K: KeyLayer,
    E: Encoding + Default,
    S: Substrate,
{
    /// Upsert `key` in namespace `sub`. Visible after the next `update`.
    pub async fn put(
        &self,
        key: &K::Key,
        value: E::Value,
        sub: Option<&str>,
    ) -> Result<u64, BraidError> {
        let payload = Payload::with_key(K::to_log(key))
            .value(value)
            .sub(sub.map(str::to_string));
        self.append_entry(op::PUT, payload).await
    }

    pub async fn del(&self, key: &K::Key, sub: Option<&str>) -> Result<u64, BraidError> {
        let payload = Payload::with_key(K::to_log(key)).sub(sub.map(str::to_string));
        self.append_entry(op::DEL, payload).await
    }

    pub async fn get(
        &self,
        key: &K::Key,
        sub: Option<&str>,
    ) -> Result<Option<E::Value>, BraidError> {
        let location = || {
            format!("{}/{}/{}", self.view_name(), sub.unwrap_or(""), K::to_log(key))
        };
        self.view()
            .await?
            .get(key, sub)
            .map_err(|source| self.corrupt(location(), source))
    }

    /// Every entry of namespace `sub`, in key byte order
    pub async fn entries(
        &self,
        sub: Option<&str>,
    ) -> Result<Vec<(K::Key, E::Value)>, BraidError> {
        let location = format!("{}/{}", self.view_name(), sub.unwrap_or(""));
        self.view()
            .await?
            .entries(sub)
            .map_err(|source| self.corrupt(location, source))
    }

    fn corrupt(&self, location: String, source: DecodeError) -> BraidError {
        tracing::warn!(view = %self.view_name(), %location, error = %source, "corrupt record");
        BraidError::Corrupt { location, source }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
