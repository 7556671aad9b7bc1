//! Failure behavior: failed fetches are retryable, empty domains are not
//! errors, and one failing domain never poisons another.

use std::sync::atomic::Ordering;

use jportal_cli::store::DomainView;
use jportal_cli::test_utils::MockPortal;

use super::session;

#[tokio::test]
async fn failed_detail_fetch_is_retryable() {
    let portal = MockPortal::new()
        .with_grade_cards(vec![MockPortal::sem(1)])
        .fail_times("grade_card", 1);
    let store = session(portal);

    let view = store.grade_card_view().await;
    assert!(matches!(view, DomainView::Failed(_)));

    // The failure left no cache entry, so the next request goes out again
    // and succeeds.
    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG1");
    assert_eq!(store.client().calls.grade_card.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_semester_list_is_a_failed_view_not_a_panic() {
    let portal = MockPortal::new()
        .with_grade_cards(vec![MockPortal::sem(1)])
        .fail_times("grade_card_semesters", 1);
    let store = session(portal);

    let view = store.grade_card_view().await;
    match view {
        DomainView::Failed(message) => assert!(message.contains("injected failure")),
        other => panic!("expected failed view, got {other:?}"),
    }

    // List retry succeeds and the default selection resolves normally.
    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG1");
}

#[tokio::test]
async fn one_failing_domain_leaves_the_others_untouched() {
    let portal = MockPortal::new()
        .with_grade_cards(vec![MockPortal::sem(1)])
        .fail_times("marks_semesters", usize::MAX);
    let store = session(portal);

    assert!(matches!(store.marks_view().await, DomainView::Failed(_)));

    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG1");
    assert!(store.profile().await.is_ok());
}

#[tokio::test]
async fn empty_grade_overview_is_unavailable_and_not_cached() {
    let store = session(MockPortal::new());

    assert!(matches!(
        store.grade_overview().await,
        DomainView::Unavailable
    ));
    assert!(matches!(
        store.grade_overview().await,
        DomainView::Unavailable
    ));

    // Emptiness is re-checked each time so data appearing later on the
    // portal is picked up within a session.
    assert_eq!(store.client().calls.sgpa_cgpa.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_marks_document_fails_only_the_marks_view() {
    let sem = MockPortal::sem(1);
    let portal = MockPortal::new()
        .with_marks_document(&sem, b"%PDF-1.4 not json".to_vec())
        .with_grade_cards(vec![MockPortal::sem(1)]);
    let store = session(portal);

    match store.marks_view().await {
        DomainView::Failed(message) => assert!(message.contains("marks report")),
        other => panic!("expected failed view, got {other:?}"),
    }
    assert!(store.grade_card_view().await.ready().is_some());
}
