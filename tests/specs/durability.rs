//! Durability specs
//!
//! A WAL-backed log reopens to the same view it was closed with.

use crate::prelude::*;
use braid_core::Json;
use braid_engine::{Base, FeedView};
use braid_storage::{WalLog, WalLogConfig};
use similar_asserts::assert_eq;

type WalFeed = Base<FeedView<Json>, WalLog>;

fn config(name: &str) -> BraidConfig {
    BraidConfig {
        identity: Identity::named(name),
        ..BraidConfig::default()
    }
}

#[tokio::test]
async fn reopened_feed_replays_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let feed = WalFeed::open_dir(dir.path(), None, config("journal"), WalLogConfig::default())
        .await
        .unwrap();
    let bootstrap = *feed.key();
    for n in 0..5 {
        feed.append(json!({ "n": n })).await.unwrap();
    }
    feed.add_writer(&key(7), AddWriterOptions::default()).await.unwrap();
    feed.close().await.unwrap();

    let reopened = WalFeed::open_dir(
        dir.path(),
        Some(bootstrap),
        config("journal"),
        WalLogConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(reopened.len().await.unwrap(), 5);
    assert_eq!(reopened.get(4).await.unwrap(), Some(json!({ "n": 4 })));
    assert!(reopened.writers().await.unwrap().contains(&key(7)));
    assert_eq!(reopened.applied().await.unwrap(), 6);
}

#[tokio::test]
async fn identities_use_separate_regions() {
    let dir = tempfile::tempdir().unwrap();
    let a = WalFeed::create(dir.path(), Identity::named("a")).unwrap();
    let b = WalFeed::create(dir.path(), Identity::named("b")).unwrap();
    assert!(a != b);
    assert!(dir.path().join("__feed<json>__a__").is_dir());
    assert!(dir.path().join("__feed<json>__b__").is_dir());
}

#[tokio::test]
async fn torn_tail_needs_repair() {
    let dir = tempfile::tempdir().unwrap();
    let feed = WalFeed::open_dir(dir.path(), None, config("torn"), WalLogConfig::default())
        .await
        .unwrap();
    feed.append(json!("kept")).await.unwrap();
    let bootstrap = *feed.key();
    feed.close().await.unwrap();

    let wal = dir.path().join("__feed<json>__torn__").join("wal.jsonl");
    let mut text = std::fs::read_to_string(&wal).unwrap();
    text.push_str("{\"sequence\":1,\"trunc");
    std::fs::write(&wal, text).unwrap();

    let refused =
        WalFeed::open_dir(dir.path(), Some(bootstrap), config("torn"), WalLogConfig::default())
            .await;
    assert!(matches!(refused, Err(BraidError::Storage(_))));

    let repaired = WalFeed::open_dir(
        dir.path(),
        Some(bootstrap),
        config("torn"),
        WalLogConfig { repair: true, ..WalLogConfig::default() },
    )
    .await
    .unwrap();
    assert_eq!(repaired.len().await.unwrap(), 1);
    assert_eq!(repaired.get(0).await.unwrap(), Some(json!("kept")));
}
