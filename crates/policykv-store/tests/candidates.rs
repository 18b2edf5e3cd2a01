//! Candidate resolution: indexed and full-scan.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod support;

use bytes::Bytes;

use policykv_core::Policy;
use policykv_store::{CandidateStrategy, KvBackend, PolicyStore};

use support::{ids, memory_store, policy};

fn fixtures() -> Vec<Policy> {
    vec![
        policy("p-alice-docs", &["alice", "bob"], &["docs:1", "docs:2"]),
        policy("p-bob-only", &["bob"], &["images:1"]),
        policy("p-docs-any", &["carol"], &["docs:1"]),
        policy("p-alice-images", &["alice"], &["images:1", "images:2"]),
        policy("p-nobody", &[], &["audit"]),
        policy("p-dup-literals", &["dave", "dave"], &["docs:2", "docs:2"]),
    ]
}

/// Reference: every policy naming the subject or the resource.
fn expected(all: &[Policy], subject: &str, resource: &str) -> Vec<String> {
    let hits: Vec<Policy> = all
        .iter()
        .filter(|p| {
            p.subjects.iter().any(|s| s == subject) || p.resources.iter().any(|r| r == resource)
        })
        .cloned()
        .collect();
    ids(&hits)
}

#[tokio::test]
async fn indexed_candidates_have_no_false_negatives() {
    let (_, store) = memory_store(CandidateStrategy::Indexed);
    let all = fixtures();
    for p in &all {
        store.create(p).await.unwrap();
    }
    let scanned = store.list_all(usize::MAX, 0).await.unwrap();
    assert_eq!(scanned.len(), all.len());

    let subjects = ["alice", "bob", "carol", "dave", "eve"];
    let resources = ["docs:1", "docs:2", "images:1", "images:2", "audit", "nothing"];
    for s in subjects {
        for r in resources {
            let got = ids(&store.find_candidates(s, r).await.unwrap());
            let want = expected(&scanned, s, r);
            for id in &want {
                assert!(got.contains(id), "subject={s} resource={r} missing {id}");
            }
            // Duplicates collapse to one candidate per policy.
            let mut dedup = got.clone();
            dedup.dedup();
            assert_eq!(dedup, got, "subject={s} resource={r}");
        }
    }
}

#[tokio::test]
async fn single_literal_projections() {
    let (_, store) = memory_store(CandidateStrategy::Indexed);
    for p in fixtures() {
        store.create(&p).await.unwrap();
    }

    assert_eq!(
        ids(&store.find_policies_for_subject("bob").await.unwrap()),
        vec!["p-alice-docs", "p-bob-only"]
    );
    assert_eq!(
        ids(&store.find_policies_for_resource("docs:1").await.unwrap()),
        vec!["p-alice-docs", "p-docs-any"]
    );
    assert!(store.find_policies_for_subject("eve").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_moves_subject_memberships() {
    let (_, store) = memory_store(CandidateStrategy::Indexed);
    store.create(&policy("p", &["1", "2"], &["r"])).await.unwrap();

    store.update(&policy("p", &["2", "3", "4"], &["r"])).await.unwrap();

    assert_eq!(ids(&store.find_policies_for_subject("4").await.unwrap()), vec!["p"]);
    assert_eq!(ids(&store.find_policies_for_subject("2").await.unwrap()), vec!["p"]);
    assert!(store.find_policies_for_subject("1").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_moves_resource_memberships() {
    let (backend, store) = memory_store(CandidateStrategy::Indexed);
    store.create(&policy("p", &["s"], &["old"])).await.unwrap();
    store.update(&policy("p", &["s"], &["new"])).await.unwrap();

    assert!(store.find_policies_for_resource("old").await.unwrap().is_empty());
    assert_eq!(ids(&store.find_policies_for_resource("new").await.unwrap()), vec!["p"]);
    // Emptied index hashes disappear.
    assert!(backend.list_keys_by_prefix("test_resource_old").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_drops_candidates() {
    let (_, store) = memory_store(CandidateStrategy::Indexed);
    store.create(&policy("a", &["alice"], &["docs:1"])).await.unwrap();
    store.create(&policy("b", &["alice"], &["docs:2"])).await.unwrap();

    store.delete("a").await.unwrap();
    assert_eq!(ids(&store.find_candidates("alice", "docs:1").await.unwrap()), vec!["b"]);
}

#[tokio::test]
async fn orphaned_index_entry_is_skipped() {
    let (backend, store) = memory_store(CandidateStrategy::Indexed);
    store.create(&policy("live", &["alice"], &["docs:1"])).await.unwrap();
    backend
        .hash_field_set("test_subject_alice", "ghost", Bytes::new())
        .await
        .unwrap();

    let got = store.find_candidates("alice", "docs:1").await.unwrap();
    assert_eq!(ids(&got), vec!["live"]);
}

#[tokio::test]
async fn corrupt_candidate_fails_the_query() {
    let (backend, store) = memory_store(CandidateStrategy::Indexed);
    store.create(&policy("p", &["alice"], &["docs:1"])).await.unwrap();
    backend.set("test_policy_p", Bytes::from_static(b"garbage")).await.unwrap();

    let err = store.find_candidates("alice", "docs:1").await.unwrap_err();
    assert_eq!(err.code().as_str(), "CORRUPT");
}

#[tokio::test]
async fn full_scan_returns_everything_and_writes_no_index() {
    let (backend, store) = memory_store(CandidateStrategy::FullScan);
    let all = fixtures();
    for p in &all {
        store.create(p).await.unwrap();
    }
    assert_eq!(backend.len(), all.len());

    let got = store.find_candidates("eve", "nothing").await.unwrap();
    assert_eq!(got.len(), all.len());
    assert_eq!(store.find_policies_for_subject("alice").await.unwrap().len(), all.len());
    assert_eq!(store.find_policies_for_resource("audit").await.unwrap().len(), all.len());
}

#[tokio::test]
async fn full_scan_update_and_delete() {
    let (backend, store) = memory_store(CandidateStrategy::FullScan);
    store.create(&policy("p", &["1", "2"], &["r"])).await.unwrap();
    store.update(&policy("p", &["2", "3", "4"], &["r"])).await.unwrap();

    let for_four = store.find_policies_for_subject("4").await.unwrap();
    assert_eq!(for_four[0].subjects, vec!["2", "3", "4"]);

    // Without indices, a corrupt record can still be replaced.
    backend.set("test_policy_p", Bytes::from_static(b"garbage")).await.unwrap();
    store.update(&policy("p", &["5"], &["r"])).await.unwrap();
    assert_eq!(store.get("p").await.unwrap().subjects, vec!["5"]);

    store.delete("p").await.unwrap();
    assert!(backend.is_empty());
    assert_eq!(store.delete("p").await.unwrap_err().code().as_str(), "NOT_FOUND");
}
