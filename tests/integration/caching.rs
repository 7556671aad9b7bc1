//! Fetch-at-most-once guarantees: memoized payloads and single-flight
//! deduplication, asserted through the portal's call counters.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jportal_cli::test_utils::MockPortal;

use super::session;

#[tokio::test]
async fn switching_back_to_a_cached_semester_does_not_refetch() {
    let store = session(
        MockPortal::new().with_grade_cards(vec![MockPortal::sem(2), MockPortal::sem(1)]),
    );

    store.grade_card_view().await;
    store.select_grade_card("REG1").await.unwrap();
    let calls = &store.client().calls;
    assert_eq!(calls.grade_card.load(Ordering::SeqCst), 2);

    // Back to the already-loaded semester: served from cache.
    store.select_grade_card("REG2").await.unwrap();
    assert_eq!(calls.grade_card.load(Ordering::SeqCst), 2);

    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG2");
    assert_eq!(calls.grade_card.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn semester_list_is_fetched_once_per_session() {
    let store = session(
        MockPortal::new().with_grade_cards(vec![MockPortal::sem(2), MockPortal::sem(1)]),
    );

    store.grade_card_semesters().await.unwrap();
    store.grade_card_view().await;
    store.grade_card_semesters().await.unwrap();

    assert_eq!(
        store.client().calls.grade_card_semesters.load(Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn marks_document_is_fetched_and_extracted_once_per_semester() {
    let sem = MockPortal::sem(1);
    let raw = br#"{ "courses": [] }"#.to_vec();
    let store = session(MockPortal::new().with_marks_document(&sem, raw));

    store.marks_view().await;
    store.marks_view().await;
    store.select_marks_semester("REG1").await.unwrap();

    assert_eq!(store.client().calls.marks_document.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_requests_for_the_same_payload_collapse() {
    let portal = MockPortal::new()
        .with_grade_cards(vec![MockPortal::sem(1)])
        .with_latency(Duration::from_millis(30));
    let store = Arc::new(session(portal));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.grade_card_view().await }));
    }
    // A caller whose load was superseded by a sibling may observe Loading,
    // so only the settled view is asserted.
    for handle in handles {
        handle.await.unwrap();
    }
    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG1");

    assert_eq!(store.client().calls.grade_card.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.client().calls.grade_card_semesters.load(Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn profile_is_memoized_until_logout() {
    let store = session(MockPortal::new());

    store.profile().await.unwrap();
    store.profile().await.unwrap();
    assert_eq!(store.client().calls.personal_info.load(Ordering::SeqCst), 1);

    // Logout drops every cached payload.
    store.logout().await;
    store.profile().await.unwrap();
    assert_eq!(store.client().calls.personal_info.load(Ordering::SeqCst), 2);
}
