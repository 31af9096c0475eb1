//! Feed specs

use crate::prelude::*;
use similar_asserts::assert_eq;

fn starts_with(prefix: &'static str) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |v| v.as_str().is_some_and(|s| s.starts_with(prefix))
}

#[tokio::test]
async fn amend_appends_a_copy_of_the_newest_match() {
    let cluster = Cluster::new(1);
    let feed = cluster.feed(1).await;
    for v in ["A", "B", "C"] {
        feed.append(json!(v)).await.unwrap();
    }

    let result = feed
        .amend(AmendConfig::new().predicate(starts_with("B")))
        .await
        .unwrap();
    assert_eq!(result.value(), Some(&json!("B")));

    feed.update().await.unwrap();
    let all: Vec<Value> = feed
        .scan(ScanConfig::new())
        .await
        .unwrap()
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    assert_eq!(all, vec![json!("A"), json!("B"), json!("C"), json!("B")]);

    let forward = feed.amend(AmendConfig::new().reverse(false)).await.unwrap();
    assert_eq!(forward, Amendment::Appended { source: 0, value: json!("A") });
}

#[tokio::test]
async fn interleaved_writers_share_one_order() {
    let cluster = Cluster::new(1);
    let a = cluster.feed(1).await;
    let b = cluster.feed(2).await;
    a.add_writer(&key(2), AddWriterOptions::default()).await.unwrap();
    b.update().await.unwrap();

    a.append(json!("a1")).await.unwrap();
    b.append(json!("b1")).await.unwrap();
    a.append(json!("a2")).await.unwrap();
    a.update().await.unwrap();
    b.update().await.unwrap();

    let from_a = a.scan(ScanConfig::new()).await.unwrap();
    let from_b = b.scan(ScanConfig::new()).await.unwrap();
    assert_eq!(from_a, from_b);
    assert_eq!(from_a.len(), 3);
}

#[tokio::test]
async fn unknown_tags_from_newer_writers_are_tolerated() {
    use braid_core::{Encoding, EntryEncoding, Json, Payload, PayloadEncoding, Tagged, TaggedEntry};

    let cluster = Cluster::new(1);
    let feed = cluster.feed(1).await;
    let codec: EntryEncoding<Json> = Tagged(PayloadEncoding(Json::default()));
    let bytes = codec
        .encode(&TaggedEntry::new("compact", Payload::<Value>::default()))
        .unwrap();
    cluster.log.append(&key(1), bytes).await.unwrap();
    feed.append(json!("still works")).await.unwrap();

    feed.update().await.unwrap();
    assert_eq!(feed.unknown_ops().await.unwrap(), 1);
    assert_eq!(feed.get(0).await.unwrap(), Some(json!("still works")));
}

#[tokio::test]
async fn corrupt_entry_stops_every_replica_at_the_same_position() {
    let cluster = Cluster::new(1);
    let a = cluster.feed(1).await;
    a.append(json!("ok")).await.unwrap();
    cluster.log.append(&key(1), vec![0x03, b'a']).await.unwrap();

    let late = FeedJson::open(
        cluster.log.replica(),
        key(2),
        Some(key(1)),
        BraidConfig::default(),
    )
    .await;
    assert!(matches!(late, Err(BraidError::Decode { position: 1, .. })));

    let err = a.update().await.unwrap_err();
    assert!(matches!(err, BraidError::Decode { position: 1, .. }));
    assert_eq!(a.applied().await.unwrap(), 1);
}
