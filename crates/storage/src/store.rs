// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk storage region for one `(kind, name)` identity
//!
//! ```text
//! <root>/__<kind>__<name>__/
//!     local.key    hex writer key of this replica
//!     wal.jsonl    shared log
//! ```

use crate::wal::{WalLog, WalLogConfig};
use crate::StorageError;
use braid_core::{Identity, WriterKey};
use std::path::{Path, PathBuf};

const KEY_FILE: &str = "local.key";
const WAL_FILE: &str = "wal.jsonl";

#[derive(Debug, Clone)]
pub struct StoreDir {
    dir: PathBuf,
}

impl StoreDir {
    pub fn open(root: &Path, identity: &Identity) -> Result<Self, StorageError> {
        let dir = root.join(identity.storage_name());
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Local writer key, generated and persisted on first use
    pub fn local_key(&self) -> Result<WriterKey, StorageError> {
        let path = self.dir.join(KEY_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => text.trim().parse().map_err(|source| StorageError::KeyFile {
                path: path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let key = WriterKey::generate();
                std::fs::write(&path, key.to_hex())?;
                tracing::info!(key = %key.short(), dir = %self.dir.display(), "generated local writer key");
                Ok(key)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn open_log(&self, config: WalLogConfig) -> Result<WalLog, StorageError> {
        WalLog::open(&self.dir.join(WAL_FILE), config)
    }
}

/// Local writer key bound to the identity's storage region
pub fn create(root: &Path, identity: &Identity) -> Result<WriterKey, StorageError> {
    StoreDir::open(root, identity)?.local_key()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
