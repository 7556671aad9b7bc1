//! Default selection and explicit selection behavior.

use jportal_cli::core::PortalError;
use jportal_cli::models::{ExamEvent, ExamScheduleEntry};
use jportal_cli::store::DomainView;
use jportal_cli::test_utils::MockPortal;

use super::session;

fn event(id: &str) -> ExamEvent {
    ExamEvent {
        exam_event_id: id.to_string(),
        exam_event_desc: format!("Event {id}"),
    }
}

fn schedule_entry(subject: &str) -> ExamScheduleEntry {
    ExamScheduleEntry {
        subjectcode: subject.to_string(),
        subjectdesc: format!("{subject} description"),
        datetime: "17/02/2025".to_string(),
        datetimeupto: "12:00".to_string(),
        roomcode: None,
        seatno: None,
    }
}

#[tokio::test]
async fn default_selection_picks_the_first_semester() {
    // The portal serves semesters newest first; index 0 is the default.
    let store = session(
        MockPortal::new().with_grade_cards(vec![MockPortal::sem(4), MockPortal::sem(3)]),
    );

    let view = store.grade_card_view().await;
    match view {
        DomainView::Ready(card) => assert_eq!(card.semester_id, "REG4"),
        other => panic!("expected ready view, got {other:?}"),
    }
    assert_eq!(
        store
            .selected_grade_card_semester()
            .await
            .unwrap()
            .registration_id,
        "REG4"
    );
}

#[tokio::test]
async fn empty_semester_list_is_unavailable_not_an_error() {
    let store = session(MockPortal::new());

    let view = store.grade_card_view().await;
    assert!(matches!(view, DomainView::Unavailable));
    assert!(store.selected_grade_card_semester().await.is_none());
}

#[tokio::test]
async fn selecting_an_unknown_semester_is_key_not_found() {
    let store = session(MockPortal::new().with_grade_cards(vec![MockPortal::sem(1)]));
    store.grade_card_view().await;

    let err = store.select_grade_card("REG99").await.unwrap_err();
    match err {
        PortalError::KeyNotFound { key, .. } => assert_eq!(key, "REG99"),
        other => panic!("expected KeyNotFound, got {other:?}"),
    }

    // The previous selection and view are untouched.
    assert_eq!(
        store
            .selected_grade_card_semester()
            .await
            .unwrap()
            .registration_id,
        "REG1"
    );
    assert!(store.grade_card_view().await.ready().is_some());
}

#[tokio::test]
async fn exam_semester_change_resets_the_event_selection() {
    let sem1 = MockPortal::sem(1);
    let sem2 = MockPortal::sem(2);
    let store = session(
        MockPortal::new()
            .with_exam_semesters(vec![sem1.clone(), sem2.clone()])
            .with_exam_events(&sem1, vec![event("T1"), event("T2")])
            .with_exam_events(&sem2, vec![event("T3")])
            .with_exam_schedule(&event("T1"), vec![schedule_entry("CS101")])
            .with_exam_schedule(&event("T2"), vec![schedule_entry("CS102")])
            .with_exam_schedule(&event("T3"), vec![schedule_entry("CS201")]),
    );

    store.exam_schedule_view().await;
    store.select_exam_event("T2").await.unwrap();
    assert_eq!(store.selected_exam_event().await.unwrap().exam_event_id, "T2");

    // Switching semesters drops T2 and re-resolves to the new default.
    store.select_exam_semester("REG2").await.unwrap();
    assert_eq!(store.selected_exam_event().await.unwrap().exam_event_id, "T3");

    let view = store.exam_schedule_view().await;
    let schedule = view.ready().unwrap();
    assert_eq!(schedule[0].subjectcode, "CS201");
}

#[tokio::test]
async fn exam_event_selection_requires_a_known_event() {
    let sem = MockPortal::sem(1);
    let store = session(
        MockPortal::new()
            .with_exam_semesters(vec![sem.clone()])
            .with_exam_events(&sem, vec![event("T1")])
            .with_exam_schedule(&event("T1"), vec![schedule_entry("CS101")]),
    );
    store.exam_schedule_view().await;

    let err = store.select_exam_event("T9").await.unwrap_err();
    assert!(matches!(err, PortalError::KeyNotFound { .. }));
    assert_eq!(store.selected_exam_event().await.unwrap().exam_event_id, "T1");
}
