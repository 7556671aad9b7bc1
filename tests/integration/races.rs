//! Selection races: a superseded fetch must never overwrite the view for
//! the most recent selection.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jportal_cli::test_utils::MockPortal;
use tokio::time::sleep;

use super::session;

#[tokio::test]
async fn late_result_for_a_superseded_selection_is_discarded() {
    let portal = MockPortal::new()
        .with_grade_cards(vec![MockPortal::sem(1), MockPortal::sem(2)])
        .with_latency(Duration::from_millis(40));
    let store = Arc::new(session(portal));

    // Warm the semester list so both selections race only on the detail
    // fetch.
    store.grade_card_semesters().await.unwrap();

    let slow = {
        let store = store.clone();
        tokio::spawn(async move { store.select_grade_card("REG1").await })
    };
    sleep(Duration::from_millis(5)).await;
    store.select_grade_card("REG2").await.unwrap();
    slow.await.unwrap().unwrap();

    // Whichever fetch finished last, the view belongs to the most recent
    // selection.
    assert_eq!(
        store
            .selected_grade_card_semester()
            .await
            .unwrap()
            .registration_id,
        "REG2"
    );
    let view = store.grade_card_view().await;
    assert_eq!(view.ready().unwrap().semester_id, "REG2");

    // The superseded result still landed in the cache.
    store.select_grade_card("REG1").await.unwrap();
    assert_eq!(store.client().calls.grade_card.load(Ordering::SeqCst), 2);
    assert_eq!(
        store.grade_card_view().await.ready().unwrap().semester_id,
        "REG1"
    );
}

#[tokio::test]
async fn rapid_exam_semester_flips_settle_on_the_last_one() {
    let sem1 = MockPortal::sem(1);
    let sem2 = MockPortal::sem(2);
    let event1 = jportal_cli::models::ExamEvent {
        exam_event_id: "T1".to_string(),
        exam_event_desc: "Event T1".to_string(),
    };
    let event2 = jportal_cli::models::ExamEvent {
        exam_event_id: "T2".to_string(),
        exam_event_desc: "Event T2".to_string(),
    };
    let schedule = |subject: &str| {
        vec![jportal_cli::models::ExamScheduleEntry {
            subjectcode: subject.to_string(),
            subjectdesc: String::new(),
            datetime: "17/02/2025".to_string(),
            datetimeupto: "12:00".to_string(),
            roomcode: None,
            seatno: None,
        }]
    };

    let portal = MockPortal::new()
        .with_exam_semesters(vec![sem1.clone(), sem2.clone()])
        .with_exam_events(&sem1, vec![event1.clone()])
        .with_exam_events(&sem2, vec![event2.clone()])
        .with_exam_schedule(&event1, schedule("CS101"))
        .with_exam_schedule(&event2, schedule("CS201"))
        .with_latency(Duration::from_millis(30));
    let store = Arc::new(session(portal));

    store.exam_semesters().await.unwrap();

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.select_exam_semester("REG1").await })
    };
    sleep(Duration::from_millis(5)).await;
    store.select_exam_semester("REG2").await.unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(
        store
            .selected_exam_semester()
            .await
            .unwrap()
            .registration_id,
        "REG2"
    );
    assert_eq!(store.selected_exam_event().await.unwrap().exam_event_id, "T2");
    let view = store.exam_schedule_view().await;
    assert_eq!(view.ready().unwrap()[0].subjectcode, "CS201");
}
