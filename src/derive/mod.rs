//! Pure derivations over cached records.
//!
//! Everything in this module is a plain function over the typed models: no
//! IO, no store access, no panics for well-typed input. Out-of-range input
//! is rejected by validation (returning `None`), not by erroring, so callers
//! can keep showing the previous result.

use crate::core::PortalError;
use crate::models::{GradeSummary, SubjectRegistrationRow};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Outcome of the required-SGPA solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SgpaOutcome {
    /// The target needs more than a perfect semester
    NotAchievable,
    /// The target is already met or exceeded
    AlreadyAchieved,
    /// Achievable; the value is rounded to two decimals
    Achievable(f64),
}

/// Solve for the SGPA needed next semester to hit a target CGPA.
///
/// `required = (target * (total + next) - current * total) / next`, rounded
/// half-up at the second decimal. Returns `None` when the target is not a
/// finite number in `[0, 10]`; the caller keeps whatever result it was
/// already displaying.
pub fn required_sgpa(
    target_cgpa: f64,
    current_cgpa: f64,
    total_credits: f64,
    next_semester_credits: f64,
) -> Option<SgpaOutcome> {
    if !target_cgpa.is_finite() || !(0.0..=10.0).contains(&target_cgpa) {
        return None;
    }

    let required_grade_points =
        target_cgpa * (total_credits + next_semester_credits) - current_cgpa * total_credits;
    let required = required_grade_points / next_semester_credits;
    let rounded = (required * 100.0).round() / 100.0;

    Some(if rounded > 10.0 {
        SgpaOutcome::NotAchievable
    } else if rounded < 0.0 {
        SgpaOutcome::AlreadyAchieved
    } else {
        SgpaOutcome::Achievable(rounded)
    })
}

/// One component of a grouped subject: the component kind plus who teaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectComponent {
    /// "L", "T" or "P" as served
    pub kind: String,
    pub teacher: String,
}

impl SubjectComponent {
    /// Human-readable name for the component code.
    pub fn kind_name(&self) -> &'static str {
        match self.kind.as_str() {
            "L" => "Lecture",
            "T" => "Tutorial",
            "P" => "Practical",
            _ => "Component",
        }
    }
}

/// A subject with its per-component teachers collapsed into one record.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSubject {
    pub code: String,
    pub name: String,
    pub credits: f64,
    pub is_audit: bool,
    /// Components in encounter order across the raw rows
    pub components: Vec<SubjectComponent>,
}

/// Collapse raw registration rows into one record per distinct subject code.
///
/// The first row seen for a code supplies the name, credits and audit flag;
/// every row (including the first) contributes a component. Output order is
/// the order of first appearance, matching the portal's row order.
pub fn group_subjects(rows: &[SubjectRegistrationRow]) -> Vec<GroupedSubject> {
    let mut grouped: Vec<GroupedSubject> = Vec::new();
    let mut index_by_code: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let idx = match index_by_code.get(row.subject_code.as_str()) {
            Some(&idx) => idx,
            None => {
                grouped.push(GroupedSubject {
                    code: row.subject_code.clone(),
                    name: row.subject_desc.clone(),
                    credits: row.credits,
                    is_audit: row.is_audit(),
                    components: Vec::new(),
                });
                index_by_code.insert(row.subject_code.as_str(), grouped.len() - 1);
                grouped.len() - 1
            }
        };
        grouped[idx].components.push(SubjectComponent {
            kind: row.subject_component_code.clone(),
            teacher: row.employee_name.clone(),
        });
    }

    grouped
}

/// One point of the SGPA/CGPA progression chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradePoint {
    /// Semester ordinal (x axis)
    pub semester: u32,
    pub sgpa: f64,
    pub cgpa: f64,
}

/// Project grade summaries onto chart points, preserving input order.
///
/// No sorting happens here: the summaries arrive in chronological order and
/// the chart relies on that.
pub fn grade_progression(summaries: &[GradeSummary]) -> Vec<GradePoint> {
    summaries
        .iter()
        .map(|sem| GradePoint {
            semester: sem.stynumber,
            sgpa: sem.sgpa,
            cgpa: sem.cgpa,
        })
        .collect()
}

/// Maximum grade points obtainable for a semester's credits.
pub fn grade_points_possible(course_credits: f64) -> f64 {
    course_credits * 10.0
}

/// Tier for a marks percentage, used for progress-bar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksTier {
    /// >= 80
    High,
    /// >= 60
    Mid,
    /// >= 40
    Low,
    /// everything below 40
    Poor,
}

impl MarksTier {
    /// Classify a percentage into its display tier.
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::High
        } else if percentage >= 60.0 {
            Self::Mid
        } else if percentage >= 40.0 {
            Self::Low
        } else {
            Self::Poor
        }
    }
}

/// Percentage of obtained over full marks.
///
/// A component with zero full marks is degenerate input; it yields an error
/// instead of a silently rendered NaN.
pub fn marks_percentage(obtained: f64, full: f64) -> Result<f64, PortalError> {
    if full == 0.0 {
        return Err(PortalError::DegenerateInput {
            reason: "full marks is zero".to_string(),
        });
    }
    Ok(obtained / full * 100.0)
}

/// Display tier for a letter grade. Each known letter maps to a distinct
/// tier; anything unknown renders neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeTier {
    BrightGreen,
    Green,
    BrightYellow,
    Yellow,
    DeepYellow,
    Orange,
    DeepOrange,
    Red,
    Neutral,
}

/// Map a letter grade to its display tier.
pub fn grade_tier(grade: &str) -> GradeTier {
    match grade {
        "A+" => GradeTier::BrightGreen,
        "A" => GradeTier::Green,
        "B+" => GradeTier::BrightYellow,
        "B" => GradeTier::Yellow,
        "C+" => GradeTier::DeepYellow,
        "C" => GradeTier::Orange,
        "D" => GradeTier::DeepOrange,
        "F" => GradeTier::Red,
        _ => GradeTier::Neutral,
    }
}

/// Format a "DD/MM/YYYY" exam date as a long date ("Monday, 17 February 2025").
///
/// Falls back to the raw string when the portal serves something that does
/// not parse.
pub fn format_exam_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        Ok(date) => date.format("%A, %-d %B %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
