//! Shared helpers for scenario specs

pub use braid_core::writer::KEY_LEN;
pub use braid_core::{BraidConfig, Identity, Role, WriterKey};
pub use braid_engine::{
    AddWriterOptions, AmendConfig, Amendment, BraidError, FeedJson, RecordStringJson, ScanConfig,
};
pub use braid_storage::{MemoryLog, Substrate};
pub use serde_json::{json, Value};

pub fn key(n: u8) -> WriterKey {
    WriterKey::from_bytes([n; KEY_LEN])
}

/// One shared in-memory log plus the bootstrap writer's key
pub struct Cluster {
    pub log: MemoryLog,
    pub bootstrap: WriterKey,
}

impl Cluster {
    pub fn new(bootstrap: u8) -> Self {
        Self {
            log: MemoryLog::new(),
            bootstrap: key(bootstrap),
        }
    }

    pub async fn records(&self, local: u8) -> RecordStringJson<MemoryLog> {
        RecordStringJson::open(
            self.log.replica(),
            key(local),
            Some(self.bootstrap),
            BraidConfig::default(),
        )
        .await
        .unwrap()
    }

    pub async fn feed(&self, local: u8) -> FeedJson<MemoryLog> {
        FeedJson::open(
            self.log.replica(),
            key(local),
            Some(self.bootstrap),
            BraidConfig::default(),
        )
        .await
        .unwrap()
    }
}

pub fn writer_keys(set: &braid_core::WriterSet) -> Vec<(WriterKey, Role)> {
    set.iter().map(|(k, r)| (*k, r)).collect()
}
