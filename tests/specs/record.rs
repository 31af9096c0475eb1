//! Record specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn replicas_agree_on_every_namespace() {
    let cluster = Cluster::new(1);
    let a = cluster.records(1).await;
    let b = cluster.records(2).await;
    a.add_writer(&key(2), AddWriterOptions::default()).await.unwrap();
    b.update().await.unwrap();

    a.put(&"color".to_string(), json!("red"), Some("prefs")).await.unwrap();
    b.put(&"color".to_string(), json!("blue"), Some("prefs")).await.unwrap();
    b.put(&"name".to_string(), json!("ada"), None).await.unwrap();
    a.del(&"name".to_string(), Some("prefs")).await.unwrap();

    a.update().await.unwrap();
    b.update().await.unwrap();

    for sub in [None, Some("prefs"), Some("missing")] {
        assert_eq!(a.entries(sub).await.unwrap(), b.entries(sub).await.unwrap());
    }
    assert_eq!(
        a.get(&"color".to_string(), Some("prefs")).await.unwrap(),
        Some(json!("blue"))
    );
    assert_eq!(a.get(&"color".to_string(), None).await.unwrap(), None);
    assert_eq!(a.get(&"name".to_string(), None).await.unwrap(), Some(json!("ada")));
}

#[tokio::test]
async fn delete_then_get_is_none() {
    let cluster = Cluster::new(1);
    let kv = cluster.records(1).await;
    let k = "k".to_string();
    kv.put(&k, json!({"v": 1}), None).await.unwrap();
    kv.del(&k, None).await.unwrap();
    kv.del(&k, None).await.unwrap();
    kv.update().await.unwrap();

    assert_eq!(kv.get(&k, None).await.unwrap(), None);
    assert!(kv.entries(None).await.unwrap().is_empty());
    assert_eq!(kv.applied().await.unwrap(), 3);
}
