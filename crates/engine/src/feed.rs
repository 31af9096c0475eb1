// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed operations on a [`Base`] over a [`FeedView`]

use crate::base::Base;
use crate::error::BraidError;
use crate::scan::{AmendConfig, Amendment, Scan, ScanConfig};
use crate::view::FeedView;
use braid_core::{op, Encoding, Payload};
use braid_storage::Substrate;

impl<E, S> Base<FeedView<E>, S>
where
    E: Encoding + Default,
    S: Substrate,
{
    /// Append `value` as the local writer. Visible after the next `update`.
    pub async fn append(&self, value: E::Value) -> Result<u64, BraidError> {
        self.append_entry(op::APPEND, Payload::with_value(value))
            .await
    }

    pub async fn get(&self, index: u64) -> Result<Option<E::Value>, BraidError> {
        self.view()
            .await?
            .get(index)
            .map_err(|source| BraidError::Corrupt {
                location: format!("{}[{index}]", self.view_name()),
                source,
            })
    }

    pub async fn len(&self) -> Result<u64, BraidError> {
        Ok(self.view().await?.len())
    }

    /// Oldest entry matching `predicate`
    pub async fn first(
        &self,
        predicate: impl Fn(&E::Value) -> bool + Send + Sync + 'static,
    ) -> Result<Option<(u64, E::Value)>, BraidError> {
        let mut scan = self
            .create_scan_stream(ScanConfig::new().predicate(predicate))
            .await?;
        scan.next().transpose()
    }

    /// Newest entry matching `predicate`
    pub async fn last(
        &self,
        predicate: impl Fn(&E::Value) -> bool + Send + Sync + 'static,
    ) -> Result<Option<(u64, E::Value)>, BraidError> {
        let mut scan = self
            .create_scan_stream(ScanConfig::new().reverse(true).predicate(predicate))
            .await?;
        scan.next().transpose()
    }

    /// Scan stream over a snapshot of the current feed
    ///
    /// The view lock is released before this returns, so the caller may
    /// append or update while the stream is open. Entries applied after the
    /// snapshot are not visited.
    pub async fn create_scan_stream(
        &self,
        config: ScanConfig<E::Value>,
    ) -> Result<Scan<E>, BraidError> {
        let snapshot = self.view().await?.snapshot();
        Ok(Scan::new(snapshot, config))
    }

    /// Collect every match of `config`
    pub async fn scan(
        &self,
        config: ScanConfig<E::Value>,
    ) -> Result<Vec<(u64, E::Value)>, BraidError> {
        self.create_scan_stream(config).await?.collect()
    }

    /// Find one entry and append a replacement derived from it
    ///
    /// Brings the view up to date first. The replacement is `map(entry)` if
    /// a map is given, else `constant`, else the entry itself. An empty
    /// replacement (see [`Encoding::is_empty_value`]) or a map returning
    /// `None` appends nothing and yields [`Amendment::Dropped`].
    pub async fn amend(
        &self,
        config: AmendConfig<E::Value>,
    ) -> Result<Amendment<E::Value>, BraidError>
    where
        E::Value: Clone,
    {
        self.update().await?;

        let (scan, replacement) = config.into_parts();
        let found = self.create_scan_stream(scan).await?.next().transpose()?;
        let Some((source, entry)) = found else {
            tracing::debug!(view = %self.view_name(), "amend found no match");
            return Ok(Amendment::NotFound);
        };

        match replacement.apply(entry) {
            Some(value) if !E::default().is_empty_value(&value) => {
                self.append(value.clone()).await?;
                tracing::debug!(view = %self.view_name(), source, "amended");
                Ok(Amendment::Appended { source, value })
            }
            value => {
                tracing::debug!(view = %self.view_name(), source, "amend dropped");
                Ok(Amendment::Dropped { source, value })
            }
        }
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
