//! Exam schedule command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::client::PortalClient;
use crate::derive::format_exam_date;
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

use super::common::unwrap_view;

/// Show the exam schedule for a semester and exam event.
///
/// Without flags, shows the first event of the most recent semester. Pass
/// `--semester` and `--event` to narrow down; `--event` requires the
/// semester to be resolved first, so it can be combined with `--semester`
/// or used alone against the default semester.
///
/// # Examples
///
/// ```bash
/// jportal exams
/// jportal exams --semester REG2024ODD
/// jportal exams --semester REG2024ODD --event T2
/// ```
#[derive(Parser, Debug)]
#[command(name = "exams")]
pub struct ExamsCommand {
    /// Registration id of the semester to show.
    #[arg(short, long)]
    semester: Option<String>,

    /// Exam event id within the semester.
    #[arg(short, long)]
    event: Option<String>,
}

impl ExamsCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        match &self.semester {
            Some(id) => {
                // Selection resolves against the fetched semester list.
                session.exam_semesters().await?;
                session.select_exam_semester(id).await?;
            }
            // Resolve the default cascade so --event has an event list to
            // select from.
            None => {
                session.exam_schedule_view().await;
            }
        }
        if let Some(id) = &self.event {
            session.select_exam_event(id).await?;
        }

        let Some(schedule) = unwrap_view(session.exam_schedule_view().await, "exam schedule")?
        else {
            return Ok(());
        };

        if let (Some(sem), Some(event)) = (
            session.selected_exam_semester().await,
            session.selected_exam_event().await,
        ) {
            println!(
                "Exam schedule for {} / {}\n",
                sem.registration_code.bold(),
                event.exam_event_desc.bold()
            );
        }

        for entry in schedule.iter() {
            let seat = match (&entry.roomcode, &entry.seatno) {
                (Some(room), Some(seat)) => format!("  room {room}, seat {seat}"),
                (Some(room), None) => format!("  room {room}"),
                _ => String::new(),
            };
            println!(
                "{:<12} {:<40} {}  {} - {}{}",
                entry.subjectcode,
                entry.subjectdesc,
                format_exam_date(&entry.datetime).cyan(),
                entry.datetime,
                entry.datetimeupto,
                seat.dimmed(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::JsonReportExtractor;
    use crate::models::{ExamEvent, ExamScheduleEntry};
    use crate::test_utils::MockPortal;

    fn event(id: &str) -> ExamEvent {
        ExamEvent {
            exam_event_id: id.to_string(),
            exam_event_desc: format!("Test {id}"),
        }
    }

    fn entry() -> ExamScheduleEntry {
        ExamScheduleEntry {
            subjectcode: "CS101".to_string(),
            subjectdesc: "Data Structures".to_string(),
            datetime: "17/02/2025".to_string(),
            datetimeupto: "12:00".to_string(),
            roomcode: Some("FF4".to_string()),
            seatno: Some("21".to_string()),
        }
    }

    #[tokio::test]
    async fn default_cascade_renders_first_event() {
        let sem = MockPortal::sem(1);
        let portal = MockPortal::new()
            .with_exam_semesters(vec![sem.clone()])
            .with_exam_events(&sem, vec![event("T1"), event("T2")])
            .with_exam_schedule(&event("T1"), vec![entry()]);
        let session = SessionStore::new(portal, JsonReportExtractor);

        let cmd = ExamsCommand {
            semester: None,
            event: None,
        };
        cmd.execute(&session).await.unwrap();
        assert_eq!(
            session.selected_exam_event().await.unwrap().exam_event_id,
            "T1"
        );
    }

    #[tokio::test]
    async fn explicit_event_selection() {
        let sem = MockPortal::sem(1);
        let portal = MockPortal::new()
            .with_exam_semesters(vec![sem.clone()])
            .with_exam_events(&sem, vec![event("T1"), event("T2")])
            .with_exam_schedule(&event("T1"), vec![entry()])
            .with_exam_schedule(&event("T2"), vec![entry()]);
        let session = SessionStore::new(portal, JsonReportExtractor);

        let cmd = ExamsCommand {
            semester: Some("REG1".to_string()),
            event: Some("T2".to_string()),
        };
        cmd.execute(&session).await.unwrap();
        assert_eq!(
            session.selected_exam_event().await.unwrap().exam_event_id,
            "T2"
        );
    }

    #[tokio::test]
    async fn unknown_event_is_an_error() {
        let sem = MockPortal::sem(1);
        let portal = MockPortal::new()
            .with_exam_semesters(vec![sem.clone()])
            .with_exam_events(&sem, vec![event("T1")])
            .with_exam_schedule(&event("T1"), vec![entry()]);
        let session = SessionStore::new(portal, JsonReportExtractor);

        let cmd = ExamsCommand {
            semester: None,
            event: Some("T9".to_string()),
        };
        assert!(cmd.execute(&session).await.is_err());
    }
}
