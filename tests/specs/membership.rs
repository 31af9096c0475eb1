//! Membership specs
//!
//! The writer set is derived from the log and only changes through
//! `add`, `add-indexer`, and `remove` entries.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn writer_set_converges_across_replicas() {
    let cluster = Cluster::new(1);
    let x = cluster.records(1).await;
    let y = cluster.records(2).await;

    x.add_writer(&key(1), AddWriterOptions::default()).await.unwrap();
    x.add_writer(&key(2), AddWriterOptions { indexer: true }).await.unwrap();
    x.put(&"a".to_string(), json!(1), None).await.unwrap();
    x.remove_writer(&key(1)).await.unwrap();

    y.update().await.unwrap();
    y.put(&"a".to_string(), json!(2), None).await.unwrap();

    x.update().await.unwrap();
    y.update().await.unwrap();

    for replica in [&x, &y] {
        let writers = replica.writers().await.unwrap();
        assert_eq!(writer_keys(&writers), vec![(key(2), Role::Indexer)]);
        assert_eq!(replica.get(&"a".to_string(), None).await.unwrap(), Some(json!(2)));
    }
    assert!(!x.writable().await.unwrap());
    assert!(y.writable().await.unwrap());
}

#[tokio::test]
async fn removed_writer_can_no_longer_append() {
    let cluster = Cluster::new(1);
    let owner = cluster.feed(1).await;
    let guest = cluster.feed(2).await;

    owner.add_writer(&key(2), AddWriterOptions::default()).await.unwrap();
    guest.update().await.unwrap();
    guest.append(json!("first")).await.unwrap();

    owner.remove_writer(&key(2)).await.unwrap();
    guest.update().await.unwrap();
    assert!(matches!(
        guest.append(json!("second")).await,
        Err(BraidError::NotWritable(_))
    ));

    owner.update().await.unwrap();
    assert_eq!(owner.len().await.unwrap(), 1);
}

#[tokio::test]
async fn re_adding_a_writer_changes_its_role() {
    let cluster = Cluster::new(1);
    let owner = cluster.feed(1).await;

    owner.add_writer(&key(3), AddWriterOptions { indexer: true }).await.unwrap();
    owner.add_writer(&key(3), AddWriterOptions::default()).await.unwrap();
    owner.remove_writer(&key(9)).await.unwrap();
    owner.update().await.unwrap();

    let writers = owner.writers().await.unwrap();
    assert_eq!(
        writer_keys(&writers),
        vec![(key(1), Role::Indexer), (key(3), Role::Member)]
    );
    assert_eq!(owner.unknown_ops().await.unwrap(), 0);
}

#[tokio::test]
async fn late_joiner_replays_membership_history() {
    let cluster = Cluster::new(1);
    let owner = cluster.feed(1).await;
    owner.add_writer(&key(2), AddWriterOptions::default()).await.unwrap();
    owner.append(json!("hello")).await.unwrap();

    let late = cluster.feed(2).await;
    assert!(late.writable().await.unwrap());
    assert_eq!(late.get(1).await.unwrap(), None);
    assert_eq!(late.get(0).await.unwrap(), Some(json!("hello")));
    assert_eq!(late.applied().await.unwrap(), 2);
}
