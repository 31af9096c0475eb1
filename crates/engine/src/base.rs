// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Membership-aware apply core
//!
//! A `Base` folds the substrate's canonical node order into one view plus
//! the derived writer set:
//!
//! ```text
//! substrate.read_from(applied) -> admit (writer?) -> decode -> view table
//!                                                     -> membership table
//!                                                     -> unknown op (skip)
//! ```
//!
//! All derived state sits behind one async mutex. Mutations encode and
//! append outside it; `update` holds it for the whole fold so at most one
//! apply runs per instance.

use crate::dispatch::Dispatch;
use crate::error::BraidError;
use crate::host::{apply_membership, Host};
use crate::view::{ValueOf, View};
use braid_core::{
    op, BraidConfig, Encoding, EntryEncoding, Identity, LogConfig, Membership, Payload,
    PayloadEncoding, Tagged, TaggedEntry, ViewConfig, WriterKey, WriterSet,
};
use braid_storage::{Node, StoreDir, Substrate, WalLog, WalLogConfig};
use std::ops::Deref;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddWriterOptions {
    /// Add the writer with the indexer role
    pub indexer: bool,
}

struct State<V> {
    view: V,
    host: Host,
    /// Canonical position of the next node to apply
    applied: u64,
    unknown_ops: u64,
}

/// Read guard over an opened view. Holds the apply lock while alive.
pub struct ViewRef<'a, V>(MappedMutexGuard<'a, V>);

impl<V> Deref for ViewRef<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.0
    }
}

pub struct Base<V: View, S> {
    bootstrap: WriterKey,
    local: WriterKey,
    identity: Identity,
    log_config: LogConfig,
    view_config: ViewConfig,
    view_name: String,
    substrate: S,
    codec: EntryEncoding<V::Encoding>,
    closed: AtomicBool,
    state: Mutex<Option<State<V>>>,
}

impl<V: View, S: Substrate> Base<V, S> {
    /// Build an unopened instance over `substrate`.
    ///
    /// `key` is the bootstrap writer of an existing log; `None` makes
    /// `local` the bootstrap writer of a new one.
    pub fn new(
        substrate: S,
        local: WriterKey,
        key: Option<WriterKey>,
        config: BraidConfig,
    ) -> Result<Self, BraidError> {
        config.validate()?;
        let identity = Self::bind_identity(config.identity);
        let view_config = V::adjust_config(config.view);
        let view_name = view_config.view_name(&identity);
        Ok(Self {
            bootstrap: key.unwrap_or(local),
            local,
            identity,
            log_config: config.log,
            view_config,
            view_name,
            substrate,
            codec: Tagged(PayloadEncoding(V::Encoding::default())),
            closed: AtomicBool::new(false),
            state: Mutex::new(None),
        })
    }

    /// `new` followed by `ready`. The substrate is closed if replay fails.
    pub async fn open(
        substrate: S,
        local: WriterKey,
        key: Option<WriterKey>,
        config: BraidConfig,
    ) -> Result<Self, BraidError> {
        let base = Self::new(substrate, local, key, config)?;
        if let Err(e) = base.ready().await {
            if let Err(close) = base.substrate.close().await {
                tracing::warn!(view = %base.view_name, error = %close, "close after failed open");
            }
            return Err(e);
        }
        Ok(base)
    }

    /// Local writer key for `identity`'s storage region under `root`
    pub fn create(root: &Path, identity: Identity) -> Result<WriterKey, BraidError> {
        Ok(braid_storage::create(root, &Self::bind_identity(identity))?)
    }

    fn bind_identity(identity: Identity) -> Identity {
        if identity.kind.is_empty() {
            identity.with_kind(V::kind())
        } else {
            identity
        }
    }

    /// Open the view (once) and replay everything the substrate holds
    pub async fn ready(&self) -> Result<(), BraidError> {
        self.ensure_open()?;
        let mut guard = self.state.lock().await;
        let state = guard.get_or_insert_with(|| self.open_view());
        self.catch_up(state).await
    }

    fn open_view(&self) -> State<V> {
        tracing::info!(
            view = %self.view_name,
            kind = %self.identity.kind,
            bootstrap = %self.bootstrap.short(),
            local = %self.local.short(),
            "opening view"
        );
        State {
            view: V::open(self.view_name.clone(), &self.view_config),
            host: Host::new(self.bootstrap),
            applied: 0,
            unknown_ops: 0,
        }
    }

    /// Release the substrate. Later mutations fail with `Closed`.
    pub async fn close(&self) -> Result<(), BraidError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.substrate.close().await?;
        tracing::info!(view = %self.view_name, "closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), BraidError> {
        if self.is_closed() {
            Err(BraidError::Closed)
        } else {
            Ok(())
        }
    }

    /// Apply every node the substrate currently holds
    pub async fn update(&self) -> Result<(), BraidError> {
        self.ensure_open()?;
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(BraidError::NotReady)?;
        self.catch_up(state).await
    }

    async fn catch_up(&self, state: &mut State<V>) -> Result<(), BraidError> {
        let start = state.applied;
        loop {
            let nodes = self
                .substrate
                .read_from(state.applied, self.log_config.max_batch)
                .await?;
            if nodes.is_empty() {
                break;
            }
            self.apply(state, nodes)?;
        }
        if state.applied > start {
            tracing::debug!(view = %self.view_name, from = start, to = state.applied, "caught up");
        }
        Ok(())
    }

    fn apply(&self, state: &mut State<V>, nodes: Vec<Node>) -> Result<(), BraidError> {
        for node in nodes {
            if node.position < state.applied {
                continue;
            }
            if state.host.is_writer(&node.writer) {
                self.apply_node(state, &node)?;
            } else {
                tracing::debug!(
                    view = %self.view_name,
                    position = node.position,
                    writer = %node.writer.short(),
                    "skipping entry from non-writer"
                );
            }
            state.applied = node.position + 1;
        }
        Ok(())
    }

    fn apply_node(&self, state: &mut State<V>, node: &Node) -> Result<(), BraidError> {
        let decode = |source| BraidError::Decode {
            position: node.position,
            source,
        };
        let TaggedEntry { tag, value: payload } = self.codec.decode(&node.value).map_err(decode)?;

        let mut dispatch = state.view.apply(&tag, &payload).map_err(decode)?;
        if dispatch == Dispatch::Unhandled {
            dispatch = apply_membership(&tag, &payload, &mut state.host).map_err(decode)?;
        }

        match dispatch {
            Dispatch::Handled => {
                tracing::debug!(view = %self.view_name, position = node.position, %tag, "applied")
            }
            Dispatch::Unhandled => {
                state.unknown_ops += 1;
                tracing::warn!(
                    view = %self.view_name,
                    position = node.position,
                    %tag,
                    "unknown operation, skipping"
                );
            }
        }
        Ok(())
    }

    /// Encode and append one entry as the local writer
    pub(crate) async fn append_entry(
        &self,
        tag: &str,
        payload: Payload<ValueOf<V>>,
    ) -> Result<u64, BraidError> {
        self.ensure_open()?;
        {
            let guard = self.state.lock().await;
            let state = guard.as_ref().ok_or(BraidError::NotReady)?;
            if !state.host.is_writer(&self.local) {
                return Err(BraidError::NotWritable(self.local.to_hex()));
            }
        }
        let bytes = self.codec.encode(&TaggedEntry::new(tag, payload))?;
        let position = self.substrate.append(&self.local, bytes).await?;
        tracing::debug!(view = %self.view_name, position, %tag, "appended entry");
        Ok(position)
    }

    pub async fn add_writer(
        &self,
        key: &WriterKey,
        options: AddWriterOptions,
    ) -> Result<u64, BraidError> {
        let tag = Membership::add_tag(options.indexer);
        self.append_entry(tag, Payload::with_key(key.to_hex())).await
    }

    pub async fn remove_writer(&self, key: &WriterKey) -> Result<u64, BraidError> {
        self.append_entry(op::REMOVE, Payload::with_key(key.to_hex()))
            .await
    }

    /// Read access to the view; `NotReady` before `ready`
    pub async fn view(&self) -> Result<ViewRef<'_, V>, BraidError> {
        let guard = self.state.lock().await;
        MutexGuard::try_map(guard, |state| state.as_mut().map(|s| &mut s.view))
            .map(ViewRef)
            .map_err(|_| BraidError::NotReady)
    }

    async fn read<R>(&self, f: impl FnOnce(&State<V>) -> R) -> Result<R, BraidError> {
        let guard = self.state.lock().await;
        guard.as_ref().map(f).ok_or(BraidError::NotReady)
    }

    pub async fn writers(&self) -> Result<WriterSet, BraidError> {
        self.read(|s| s.host.writers().clone()).await
    }

    /// Whether the local key is in the derived writer set
    pub async fn writable(&self) -> Result<bool, BraidError> {
        self.read(|s| s.host.is_writer(&self.local)).await
    }

    /// Canonical position of the next node to apply
    pub async fn applied(&self) -> Result<u64, BraidError> {
        self.read(|s| s.applied).await
    }

    /// Entries skipped because no table recognized their tag
    pub async fn unknown_ops(&self) -> Result<u64, BraidError> {
        self.read(|s| s.unknown_ops).await
    }

    /// Bootstrap writer key, shared by every replica of this log
    pub fn key(&self) -> &WriterKey {
        &self.bootstrap
    }

    pub fn id(&self) -> String {
        self.bootstrap.to_hex()
    }

    pub fn local(&self) -> &WriterKey {
        &self.local
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> &str {
        &self.identity.kind
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view_config
    }

    pub fn substrate(&self) -> &S {
        &self.substrate
    }
}

impl<V: View> Base<V, WalLog> {
    /// Open a WAL-backed instance in `identity`'s storage region under `root`
    pub async fn open_dir(
        root: &Path,
        key: Option<WriterKey>,
        config: BraidConfig,
        wal: WalLogConfig,
    ) -> Result<Self, BraidError> {
        let identity = Self::bind_identity(config.identity.clone());
        let dir = StoreDir::open(root, &identity)?;
        let local = dir.local_key()?;
        let log = dir.open_log(wal)?;
        tracing::info!(dir = %dir.path().display(), local = %local.short(), "opening wal-backed log");
        Self::open(log, local, key, BraidConfig { identity, ..config }).await
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
