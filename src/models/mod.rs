//! Typed models for the portal's academic records.
//!
//! The portal serves loosely-typed JSON with inconsistent field naming;
//! these types pin the shapes down once, at the client boundary. Everything
//! downstream (the session store, the derivations, the CLI) works with these
//! types only - raw `serde_json::Value` never leaves the client module.
//!
//! Field names follow the wire format rather than Rust convention where the
//! portal invented them (`stynumber`, `audtsubject`, ...), so a serde rename
//! table is not needed for every field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One semester enrollment record.
///
/// `registration_id` is the unique key every semester-scoped cache uses;
/// `registration_code` is the human-readable label the UI shows. Lists of
/// these arrive most-recent first and are never reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterRef {
    /// Unique key for this enrollment record
    pub registration_id: String,
    /// Display label, e.g. "2024ODDSEM"
    pub registration_code: String,
    /// Ordinal position of the semester in the student's program
    #[serde(default)]
    pub stynumber: u32,
}

/// Per-semester grade-point summary, one element per completed semester.
///
/// The sequence is chronological by array order; callers must not reorder it
/// (the progression chart and the credit totals both depend on it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Semester ordinal
    pub stynumber: u32,
    /// Semester grade-point average
    pub sgpa: f64,
    /// Cumulative grade-point average up to this semester
    pub cgpa: f64,
    /// Grade points earned this semester
    pub earnedgradepoints: f64,
    /// Credits this semester counted toward the GPA
    pub totalcoursecredit: f64,
}

/// One subject row on a grade card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCardEntry {
    pub subjectcode: String,
    pub subjectdesc: String,
    /// Letter grade: A+, A, B+, B, C+, C, D, F, ...
    pub grade: String,
    pub coursecreditpoint: f64,
}

/// Grade card for one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCard {
    /// The `registration_id` this card belongs to
    pub semester_id: String,
    /// Per-subject grades
    pub subjects: Vec<GradeCardEntry>,
}

/// A named examination session scoped to a semester (midterm, endterm, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEvent {
    /// Unique event key
    pub exam_event_id: String,
    /// Display label, e.g. "T2 2024 EVEN"
    pub exam_event_desc: String,
}

/// One row of an exam schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamScheduleEntry {
    pub subjectcode: String,
    pub subjectdesc: String,
    /// Exam date in "DD/MM/YYYY" form, as served
    pub datetime: String,
    /// Time window text, e.g. "10:00 AM - 11:30 AM"
    pub datetimeupto: String,
    #[serde(default)]
    pub roomcode: Option<String>,
    #[serde(default)]
    pub seatno: Option<String>,
}

/// Raw per-component registration row. One subject usually produces several
/// of these (lecture, tutorial, practical), each with its own teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRegistrationRow {
    pub subject_code: String,
    pub subject_desc: String,
    /// Component code: "L", "T" or "P"
    pub subject_component_code: String,
    pub employee_name: String,
    pub credits: f64,
    /// "Y" when the subject is audited and does not count toward credits
    #[serde(default)]
    pub audtsubject: String,
}

/// Registered subjects for one semester plus the credit total the portal
/// computes server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredSubjects {
    pub subjects: Vec<SubjectRegistrationRow>,
    pub total_credits: f64,
}

/// Marks for one exam component: obtained out of full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarksValue {
    /// Obtained marks
    #[serde(rename = "OM")]
    pub obtained: f64,
    /// Full (maximum) marks
    #[serde(rename = "FM")]
    pub full: f64,
}

/// Marks for one course across its exam components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksCourse {
    pub code: String,
    pub name: String,
    /// Exam name ("T1", "T2", "Assignment", ...) to marks
    pub exams: BTreeMap<String, MarksValue>,
}

/// Structured marks report for one semester, produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksReport {
    pub courses: Vec<MarksCourse>,
}

/// General information block of the student profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(default)]
    pub studentname: String,
    #[serde(default)]
    pub registrationno: String,
    #[serde(default)]
    pub programcode: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub sectioncode: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub institutecode: String,
    #[serde(default)]
    pub academicyear: String,
    #[serde(default)]
    pub admissionyear: String,
    #[serde(default)]
    pub dateofbirth: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub bloodgroup: String,
    #[serde(default)]
    pub studentemailid: String,
    #[serde(default)]
    pub studentcellno: String,
}

/// One prior educational qualification on the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    #[serde(default)]
    pub qualificationcode: String,
    #[serde(default)]
    pub boardname: String,
    #[serde(default)]
    pub yearofpassing: String,
    #[serde(default)]
    pub obtainedmarks: f64,
    #[serde(default)]
    pub fullmarks: f64,
    #[serde(default)]
    pub percentagemarks: f64,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub grade: Option<String>,
}

/// Student profile record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub generalinformation: GeneralInfo,
    #[serde(default)]
    pub qualification: Vec<Qualification>,
}

impl SubjectRegistrationRow {
    /// Whether this row belongs to an audit subject.
    pub fn is_audit(&self) -> bool {
        self.audtsubject == "Y"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semester_ref_parses_wire_shape() {
        let json = r#"{
            "registration_id": "JUREG2401",
            "registration_code": "2024ODDSEM",
            "stynumber": 5
        }"#;
        let sem: SemesterRef = serde_json::from_str(json).unwrap();
        assert_eq!(sem.registration_id, "JUREG2401");
        assert_eq!(sem.stynumber, 5);
    }

    #[test]
    fn schedule_entry_tolerates_missing_room_and_seat() {
        let json = r#"{
            "subjectcode": "15B11CI411",
            "subjectdesc": "ALGORITHMS AND PROBLEM SOLVING (CORE)",
            "datetime": "17/02/2025",
            "datetimeupto": "10:00 AM - 11:30 AM"
        }"#;
        let entry: ExamScheduleEntry = serde_json::from_str(json).unwrap();
        assert!(entry.roomcode.is_none());
        assert!(entry.seatno.is_none());
    }

    #[test]
    fn marks_value_uses_om_fm_wire_names() {
        let value: MarksValue = serde_json::from_str(r#"{"OM": 45.0, "FM": 50.0}"#).unwrap();
        assert_eq!(value.obtained, 45.0);
        assert_eq!(value.full, 50.0);
    }

    #[test]
    fn audit_flag_is_only_literal_y() {
        let mut row = SubjectRegistrationRow {
            subject_code: "HS101".into(),
            subject_desc: "SOCIOLOGY".into(),
            subject_component_code: "L".into(),
            employee_name: "A. Teacher".into(),
            credits: 0.0,
            audtsubject: "Y".into(),
        };
        assert!(row.is_audit());
        row.audtsubject = "N".into();
        assert!(!row.is_audit());
        row.audtsubject = String::new();
        assert!(!row.is_audit());
    }
}
