//! Command-line interface for jportal.
//!
//! Each command is implemented as a separate module with its own argument
//! structure and execution logic. All commands share one authenticated
//! session, so payloads fetched by one step of a command are served from
//! the cache for the rest of it.
//!
//! # Available Commands
//!
//! - `overview` - SGPA/CGPA per semester, grade progression, and the
//!   required-SGPA calculator
//! - `gradecard` - subject grades for a semester
//! - `exams` - exam schedule for a semester and exam event
//! - `subjects` - registered subjects and faculties, grouped by course
//! - `marks` - exam marks for a semester, with optional report download
//! - `profile` - personal information on record
//!
//! # Examples
//!
//! ```bash
//! # Latest semester grade card
//! jportal gradecard
//!
//! # A specific semester
//! jportal gradecard --semester REG2024ODD
//!
//! # What SGPA do I need next semester for a 9.0 CGPA?
//! jportal overview --target 9.0 --next-credits 22
//!
//! # Download the marks report
//! jportal marks --download ./reports
//! ```
//!
//! Credentials come from `--username`/`--password`, the `JPORTAL_USERNAME`
//! and `JPORTAL_PASSWORD` environment variables, or the config file, in
//! that order.

mod common;
mod exams;
mod gradecard;
mod marks;
mod overview;
mod profile;
mod subjects;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level CLI for the student portal viewer.
#[derive(Parser)]
#[command(
    name = "jportal",
    about = "Terminal viewer for the JIIT student web portal",
    version,
    long_about = "jportal logs into the JIIT student web portal and shows grades, exam \
                  schedules, registered subjects, and marks. Every payload is fetched at \
                  most once per run; repeated lookups are served from the session cache."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (default: `~/.jportal/config.toml`).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Portal username (enrollment number).
    #[arg(long, global = true, env = "JPORTAL_USERNAME")]
    username: Option<String>,

    /// Portal password.
    #[arg(long, global = true, env = "JPORTAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show SGPA/CGPA per semester and the grade progression.
    Overview(overview::OverviewCommand),

    /// Show the grade card for a semester.
    Gradecard(gradecard::GradecardCommand),

    /// Show the exam schedule for a semester and exam event.
    Exams(exams::ExamsCommand),

    /// Show registered subjects and faculties for a semester.
    Subjects(subjects::SubjectsCommand),

    /// Show exam marks for a semester.
    Marks(marks::MarksCommand),

    /// Show personal information on record.
    Profile(profile::ProfileCommand),
}

impl Cli {
    /// Install the tracing subscriber according to the verbosity flags.
    /// `RUST_LOG` takes precedence when set.
    fn init_logging(&self) {
        let default_filter = if self.verbose {
            "jportal_cli=debug"
        } else if self.quiet {
            "error"
        } else {
            "jportal_cli=info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Log in and run the selected command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let session = common::establish_session(
            self.config.as_deref(),
            self.username.clone(),
            self.password.clone(),
        )
        .await?;

        match self.command {
            Commands::Overview(cmd) => cmd.execute(&session).await,
            Commands::Gradecard(cmd) => cmd.execute(&session).await,
            Commands::Exams(cmd) => cmd.execute(&session).await,
            Commands::Subjects(cmd) => cmd.execute(&session).await,
            Commands::Marks(cmd) => cmd.execute(&session).await,
            Commands::Profile(cmd) => cmd.execute(&session).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overview_with_target() {
        let cli = Cli::parse_from([
            "jportal",
            "overview",
            "--target",
            "9.0",
            "--next-credits",
            "22",
        ]);
        assert!(matches!(cli.command, Commands::Overview(_)));
    }

    #[test]
    fn target_requires_next_credits() {
        let result = Cli::try_parse_from(["jportal", "overview", "--target", "9.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["jportal", "--verbose", "--quiet", "profile"]);
        assert!(result.is_err());
    }
}
