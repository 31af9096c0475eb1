// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{AmendConfig, Amendment, Feed, FeedJson, ScanConfig};
use braid_core::writer::KEY_LEN;
use braid_core::{BraidConfig, WriterKey};
use braid_storage::MemoryLog;
use serde_json::{json, Value};
use std::time::Duration;

fn key(n: u8) -> WriterKey {
    WriterKey::from_bytes([n; KEY_LEN])
}

fn starts_with(prefix: &'static str) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |v| v.as_str().is_some_and(|s| s.starts_with(prefix))
}

async fn feed_of(values: &[&str]) -> FeedJson<MemoryLog> {
    let feed = FeedJson::open(MemoryLog::new(), key(1), None, BraidConfig::default())
        .await
        .unwrap();
    for v in values {
        feed.append(json!(v)).await.unwrap();
    }
    feed.update().await.unwrap();
    feed
}

async fn contents(feed: &FeedJson<MemoryLog>) -> Vec<Value> {
    feed.scan(ScanConfig::new())
        .await
        .unwrap()
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

#[tokio::test]
async fn appends_are_visible_after_update() {
    let feed = feed_of(&[]).await;
    feed.append(json!({"n": 1})).await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 0);

    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 1);
    assert_eq!(feed.get(0).await.unwrap(), Some(json!({"n": 1})));
    assert_eq!(feed.get(1).await.unwrap(), None);
}

#[tokio::test]
async fn first_and_last() {
    let feed = feed_of(&["Apple", "Banana", "Blueberry", "Cherry"]).await;
    assert_eq!(feed.first(starts_with("B")).await.unwrap(), Some((1, json!("Banana"))));
    assert_eq!(feed.last(starts_with("B")).await.unwrap(), Some((2, json!("Blueberry"))));
    assert_eq!(feed.first(starts_with("Z")).await.unwrap(), None);
}

#[tokio::test]
async fn scan_stream_can_be_abandoned() {
    let feed = feed_of(&["a", "b", "c"]).await;
    {
        let mut stream = feed.create_scan_stream(ScanConfig::new()).await.unwrap();
        assert_eq!(stream.next().unwrap().unwrap(), (0, json!("a")));
    }
    feed.append(json!("d")).await.unwrap();
    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 4);
}

#[tokio::test]
async fn amend_backward_finds_newest_match() {
    let feed = feed_of(&["A", "B", "C"]).await;
    let result = feed
        .amend(AmendConfig::new().predicate(starts_with("B")))
        .await
        .unwrap();
    assert_eq!(result, Amendment::Appended { source: 1, value: json!("B") });

    feed.update().await.unwrap();
    assert_eq!(contents(&feed).await, vec![json!("A"), json!("B"), json!("C"), json!("B")]);
}

#[tokio::test]
async fn amend_forward_match_all_picks_oldest() {
    let feed = feed_of(&["A", "B", "C"]).await;
    let result = feed.amend(AmendConfig::new().reverse(false)).await.unwrap();
    assert_eq!(result.value(), Some(&json!("A")));
}

#[tokio::test]
async fn amend_with_map_and_constant() {
    let feed = feed_of(&["draft"]).await;

    let mapped = feed
        .amend(AmendConfig::new().map(|v: Value| Some(json!({ "final": v }))))
        .await
        .unwrap();
    assert_eq!(mapped.value(), Some(&json!({"final": "draft"})));

    let constant = feed.amend(AmendConfig::new().constant(json!("fixed"))).await.unwrap();
    assert_eq!(constant, Amendment::Appended { source: 1, value: json!("fixed") });

    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 3);
}

#[tokio::test]
async fn amend_with_empty_replacement_appends_nothing() {
    let feed = feed_of(&["A"]).await;
    let result = feed.amend(AmendConfig::new().map(|_| None)).await.unwrap();
    assert_eq!(result, Amendment::Dropped { source: 0, value: None });
    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 1);
}

#[tokio::test]
async fn amend_without_match() {
    let feed = feed_of(&["A"]).await;
    let result = feed
        .amend(AmendConfig::new().predicate(starts_with("Z")))
        .await
        .unwrap();
    assert_eq!(result, Amendment::NotFound);

    let empty = feed_of(&[]).await;
    assert_eq!(empty.amend(AmendConfig::new()).await.unwrap(), Amendment::NotFound);
}

#[tokio::test]
async fn amend_sees_entries_from_other_replicas() {
    let log = MemoryLog::new();
    let owner = FeedJson::open(log.replica(), key(1), None, BraidConfig::default())
        .await
        .unwrap();
    let peer = FeedJson::open(log.replica(), key(2), Some(key(1)), BraidConfig::default())
        .await
        .unwrap();
    owner.add_writer(&key(2), Default::default()).await.unwrap();
    peer.update().await.unwrap();
    peer.append(json!("from-peer")).await.unwrap();

    let result = owner.amend(AmendConfig::new()).await.unwrap();
    assert_eq!(result.value(), Some(&json!("from-peer")));
}

#[tokio::test]
async fn amend_with_empty_constant_appends_nothing() {
    let feed = feed_of(&["A"]).await;
    let result = feed.amend(AmendConfig::new().constant(json!(""))).await.unwrap();
    assert_eq!(result, Amendment::Dropped { source: 0, value: Some(json!("")) });
    assert_eq!(result.value(), Some(&json!("")));

    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 1);
}

#[tokio::test]
async fn amend_of_empty_entry_appends_nothing() {
    let feed = Feed::open(MemoryLog::new(), key(1), None, BraidConfig::default())
        .await
        .unwrap();
    feed.append(Vec::new()).await.unwrap();

    let result = feed.amend(AmendConfig::new()).await.unwrap();
    assert_eq!(result, Amendment::Dropped { source: 0, value: Some(Vec::new()) });

    feed.update().await.unwrap();
    assert_eq!(feed.len().await.unwrap(), 1);
}

#[tokio::test]
async fn writes_proceed_while_a_scan_is_open() {
    let feed = feed_of(&["a", "b"]).await;
    let run = async {
        let mut visited = Vec::new();
        for item in feed.create_scan_stream(ScanConfig::new()).await.unwrap() {
            let (_, value) = item.unwrap();
            feed.append(json!(format!("{}-copy", value.as_str().unwrap())))
                .await
                .unwrap();
            feed.update().await.unwrap();
            visited.push(value);
        }
        visited
    };
    let visited = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap();

    assert_eq!(visited, vec![json!("a"), json!("b")]);
    let expected = vec![json!("a"), json!("b"), json!("a-copy"), json!("b-copy")];
    assert_eq!(contents(&feed).await, expected);
}
