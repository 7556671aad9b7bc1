//! Exam marks command.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::client::PortalClient;
use crate::derive::{MarksTier, marks_percentage};
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

use super::common::{tier_color, unwrap_view};

/// Show exam marks for a semester.
///
/// Marks come from the portal's report document, parsed through the
/// session's extractor. `--download` additionally saves the raw document
/// into a directory of your choice.
///
/// # Examples
///
/// ```bash
/// jportal marks
/// jportal marks --semester REG2024ODD
/// jportal marks --download ./reports
/// ```
#[derive(Parser, Debug)]
#[command(name = "marks")]
pub struct MarksCommand {
    /// Registration id of the semester to show.
    #[arg(short, long)]
    semester: Option<String>,

    /// Directory to save the raw marks report into.
    #[arg(short, long, value_name = "DIR")]
    download: Option<PathBuf>,
}

impl MarksCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        let view = match &self.semester {
            Some(id) => {
                session.marks_semesters().await?;
                session.select_marks_semester(id).await?;
                session.marks_view().await
            }
            None => session.marks_view().await,
        };
        let Some(report) = unwrap_view(view, "marks")? else {
            return Ok(());
        };

        let selected = session.selected_marks_semester().await;
        if let Some(sem) = &selected {
            println!("Marks for {}\n", sem.registration_code.bold());
        }

        for course in &report.courses {
            println!("{} {}", course.code.bold(), course.name);
            for (exam, value) in &course.exams {
                match marks_percentage(value.obtained, value.full) {
                    Ok(pct) => {
                        let line = format!(
                            "    {:<12} {:>6.1} / {:<6.1} ({pct:>5.1}%)",
                            exam, value.obtained, value.full
                        );
                        println!("{}", line.color(tier_color(MarksTier::classify(pct))));
                    }
                    // Full marks of zero; show the raw value without a band.
                    Err(_) => println!("    {:<12} {:>6.1} / {:<6.1}", exam, value.obtained, value.full),
                }
            }
        }

        if let Some(dir) = &self.download {
            let sem = selected.ok_or_else(|| anyhow!("no semester selected for download"))?;
            let path = session.download_marks(&sem.registration_id, dir).await?;
            println!("\nSaved marks report to {}", path.display().to_string().green());
        }

        Ok(())
    }
}
