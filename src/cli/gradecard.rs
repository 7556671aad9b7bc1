//! Grade card command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::client::PortalClient;
use crate::derive::grade_points_possible;
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

use super::common::{grade_color, unwrap_view};

/// Show the grade card for a semester.
///
/// Without `--semester`, shows the most recent semester.
///
/// # Examples
///
/// ```bash
/// jportal gradecard
/// jportal gradecard --semester REG2024ODD
/// ```
#[derive(Parser, Debug)]
#[command(name = "gradecard")]
pub struct GradecardCommand {
    /// Registration id of the semester to show.
    #[arg(short, long)]
    semester: Option<String>,
}

impl GradecardCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        let view = match &self.semester {
            Some(id) => {
                // Selection resolves against the fetched semester list.
                session.grade_card_semesters().await?;
                session.select_grade_card(id).await?;
                session.grade_card_view().await
            }
            None => session.grade_card_view().await,
        };
        let Some(card) = unwrap_view(view, "grade card")? else {
            return Ok(());
        };

        if let Some(sem) = session.selected_grade_card_semester().await {
            println!("Grade card for {}\n", sem.registration_code.bold());
        }

        println!("{:<12} {:<40} {:>7} {:>8}", "Code", "Subject", "Credits", "Grade");
        for entry in &card.subjects {
            println!(
                "{:<12} {:<40} {:>7.1} {:>8}",
                entry.subjectcode,
                entry.subjectdesc,
                entry.coursecreditpoint,
                entry.grade.color(grade_color(&entry.grade)).bold(),
            );
        }

        let credits: f64 = card.subjects.iter().map(|s| s.coursecreditpoint).sum();
        println!(
            "\n{} subjects, {:.1} credits, {:.0} grade points possible",
            card.subjects.len(),
            credits,
            grade_points_possible(credits),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::JsonReportExtractor;
    use crate::test_utils::MockPortal;

    #[tokio::test]
    async fn defaults_to_first_semester() {
        let portal =
            MockPortal::new().with_grade_cards(vec![MockPortal::sem(4), MockPortal::sem(3)]);
        let session = SessionStore::new(portal, JsonReportExtractor);
        let cmd = GradecardCommand { semester: None };
        cmd.execute(&session).await.unwrap();
        assert_eq!(
            session
                .selected_grade_card_semester()
                .await
                .unwrap()
                .registration_id,
            "REG4"
        );
    }

    #[tokio::test]
    async fn unknown_semester_is_an_error() {
        let portal = MockPortal::new().with_grade_cards(vec![MockPortal::sem(1)]);
        let session = SessionStore::new(portal, JsonReportExtractor);
        let cmd = GradecardCommand {
            semester: Some("REG99".to_string()),
        };
        assert!(cmd.execute(&session).await.is_err());
    }
}
