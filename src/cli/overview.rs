//! Grade overview: SGPA/CGPA per semester and the required-SGPA calculator.

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;

use crate::client::PortalClient;
use crate::derive::{SgpaOutcome, grade_progression, required_sgpa};
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

use super::common::unwrap_view;

/// Show SGPA/CGPA per semester and the grade progression.
///
/// With `--target`, also computes the SGPA needed next semester to reach
/// that CGPA.
///
/// # Examples
///
/// ```bash
/// jportal overview
/// jportal overview --target 9.0 --next-credits 22
/// ```
#[derive(Parser, Debug)]
#[command(name = "overview")]
pub struct OverviewCommand {
    /// Target CGPA for the required-SGPA calculator (0 to 10).
    #[arg(long, requires = "next_credits")]
    target: Option<f64>,

    /// Credits registered for the upcoming semester.
    #[arg(long, requires = "target")]
    next_credits: Option<f64>,
}

impl OverviewCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        let Some(summaries) = unwrap_view(session.grade_overview().await, "grade data")? else {
            return Ok(());
        };

        println!("{:<10} {:>8} {:>8}", "Semester", "SGPA", "CGPA");
        for point in grade_progression(&summaries) {
            println!(
                "{:<10} {:>8.2} {:>8.2}",
                format!("Sem {}", point.semester),
                point.sgpa,
                point.cgpa
            );
        }

        if let Some(latest) = summaries.last() {
            println!(
                "\nCurrent CGPA: {} ({:.1} grade points over {:.1} credits)",
                format!("{:.2}", latest.cgpa).bold(),
                latest.earnedgradepoints,
                latest.totalcoursecredit,
            );

            if let (Some(target), Some(next_credits)) = (self.target, self.next_credits) {
                self.print_required_sgpa(target, latest.cgpa, latest.totalcoursecredit, next_credits)?;
            }
        }

        Ok(())
    }

    fn print_required_sgpa(
        &self,
        target: f64,
        current_cgpa: f64,
        total_credits: f64,
        next_credits: f64,
    ) -> Result<()> {
        let Some(outcome) = required_sgpa(target, current_cgpa, total_credits, next_credits)
        else {
            bail!("target CGPA must be a number between 0 and 10");
        };

        match outcome {
            SgpaOutcome::Achievable(sgpa) => println!(
                "\nTo reach a {target:.2} CGPA you need an SGPA of {} over the next {next_credits:.0} credits.",
                format!("{sgpa:.2}").green().bold()
            ),
            SgpaOutcome::NotAchievable => println!(
                "\n{}",
                format!("A {target:.2} CGPA is not achievable next semester, even with a perfect 10.").red()
            ),
            SgpaOutcome::AlreadyAchieved => println!(
                "\n{}",
                format!("Your CGPA already meets the {target:.2} target.").green()
            ),
        }
        Ok(())
    }
}
