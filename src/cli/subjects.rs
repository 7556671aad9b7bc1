//! Registered subjects command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::client::PortalClient;
use crate::derive::group_subjects;
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

use super::common::unwrap_view;

/// Show registered subjects and faculties for a semester, grouped by
/// course with the Lecture/Tutorial/Practical components under it.
///
/// # Examples
///
/// ```bash
/// jportal subjects
/// jportal subjects --semester REG2024ODD
/// ```
#[derive(Parser, Debug)]
#[command(name = "subjects")]
pub struct SubjectsCommand {
    /// Registration id of the semester to show.
    #[arg(short, long)]
    semester: Option<String>,
}

impl SubjectsCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        let view = match &self.semester {
            Some(id) => {
                session.registered_semesters().await?;
                session.select_subjects_semester(id).await?;
                session.subjects_view().await
            }
            None => session.subjects_view().await,
        };
        let Some(registered) = unwrap_view(view, "registered subjects")? else {
            return Ok(());
        };

        if let Some(sem) = session.selected_subjects_semester().await {
            println!("Registered subjects for {}\n", sem.registration_code.bold());
        }

        for subject in group_subjects(&registered.subjects) {
            let audit = if subject.is_audit {
                " [audit]".yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "{} {} ({:.1} credits){}",
                subject.code.bold(),
                subject.name,
                subject.credits,
                audit,
            );
            for component in &subject.components {
                println!("    {:<10} {}", component.kind_name(), component.teacher.dimmed());
            }
        }

        println!("\nTotal credits: {:.1}", registered.total_credits);
        Ok(())
    }
}
