//! Replay determinism specs
//!
//! Two replicas that fold the same node order must reach identical state,
//! however their reads are batched or interleaved with appends.

use crate::prelude::*;
use braid_core::{
    op, Encoding, EntryEncoding, Json, Membership, Payload, PayloadEncoding, Tagged, TaggedEntry,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Put { writer: u8, key: String, value: i64, sub: Option<String> },
    Del { writer: u8, key: String, sub: Option<String> },
    Add { writer: u8, target: u8, indexer: bool },
    Remove { writer: u8, target: u8 },
    Unknown { writer: u8 },
}

fn writer() -> impl Strategy<Value = u8> {
    1u8..5
}

fn sub() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![Just("a".to_string()), Just("b".to_string())])
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (writer(), "[a-d]", any::<i64>(), sub())
            .prop_map(|(writer, key, value, sub)| Step::Put { writer, key, value, sub }),
        2 => (writer(), "[a-d]", sub()).prop_map(|(writer, key, sub)| Step::Del { writer, key, sub }),
        2 => (writer(), writer(), any::<bool>())
            .prop_map(|(writer, target, indexer)| Step::Add { writer, target, indexer }),
        1 => (writer(), writer()).prop_map(|(writer, target)| Step::Remove { writer, target }),
        1 => writer().prop_map(|writer| Step::Unknown { writer }),
    ]
}

fn encode(step: &Step) -> (u8, Vec<u8>) {
    let codec: EntryEncoding<Json> = Tagged(PayloadEncoding(Json::default()));
    let (writer, tag, payload) = match step {
        Step::Put { writer, key, value, sub } => (
            *writer,
            op::PUT,
            Payload::with_key(key.clone()).value(json!(value)).sub(sub.clone()),
        ),
        Step::Del { writer, key, sub } => {
            (*writer, op::DEL, Payload::with_key(key.clone()).sub(sub.clone()))
        }
        Step::Add { writer, target, indexer } => (
            *writer,
            Membership::add_tag(*indexer),
            Payload::with_key(key(*target).to_hex()),
        ),
        Step::Remove { writer, target } => {
            (*writer, op::REMOVE, Payload::with_key(key(*target).to_hex()))
        }
        Step::Unknown { writer } => (*writer, "noop", Payload::<Value>::default()),
    };
    (writer, codec.encode(&TaggedEntry::new(tag, payload)).unwrap())
}

#[derive(Debug, PartialEq)]
struct Snapshot {
    writers: Vec<(WriterKey, Role)>,
    applied: u64,
    unknown_ops: u64,
    namespaces: Vec<Vec<(String, Value)>>,
}

async fn snapshot(replica: &RecordStringJson<MemoryLog>) -> Snapshot {
    let mut namespaces = Vec::new();
    for sub in [None, Some("a"), Some("b")] {
        namespaces.push(replica.entries(sub).await.unwrap());
    }
    Snapshot {
        writers: writer_keys(&replica.writers().await.unwrap()),
        applied: replica.applied().await.unwrap(),
        unknown_ops: replica.unknown_ops().await.unwrap(),
        namespaces,
    }
}

async fn run(steps: Vec<Step>, split: usize) -> (Snapshot, Snapshot) {
    let cluster = Cluster::new(1);

    let mut small = BraidConfig::default();
    small.log.max_batch = 2;
    let early = RecordStringJson::open(cluster.log.replica(), key(1), None, small)
        .await
        .unwrap();

    for (i, step) in steps.iter().enumerate() {
        let (writer, bytes) = encode(step);
        cluster.log.append(&key(writer), bytes).await.unwrap();
        if i == split {
            early.update().await.unwrap();
        }
    }
    early.update().await.unwrap();

    let late = cluster.records(2).await;
    (snapshot(&early).await, snapshot(&late).await)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn replicas_fold_to_identical_state(
        steps in proptest::collection::vec(step(), 0..40),
        split in 0usize..40,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (early, late) = runtime.block_on(run(steps.clone(), split));
        prop_assert_eq!(&early, &late);
        prop_assert_eq!(early.applied, steps.len() as u64);
    }
}
