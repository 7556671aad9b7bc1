//! Portal client interface and its HTTP implementation.
//!
//! [`PortalClient`] is the async seam between the session store and the
//! remote student portal. The store never constructs requests itself; it
//! calls these operations and caches what they return. The production
//! implementation is [`WebPortalClient`]; tests substitute a scripted mock.
//!
//! All list-valued operations return semesters/events in the portal's own
//! order - most recent first - and that order is meaningful: default
//! selection always picks index 0.

use crate::core::Result;
use crate::models::{
    ExamEvent, ExamScheduleEntry, GradeCard, GradeSummary, PersonalInfo, RegisteredSubjects,
    SemesterRef,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod http;
pub use http::WebPortalClient;

/// Async interface to the student portal.
///
/// Every method may fail with a categorized [`crate::core::PortalError`];
/// none of them retries internally.
#[async_trait]
pub trait PortalClient: Send + Sync {
    /// Authenticate and establish a session. Must be called before any data
    /// operation. Failures distinguish bad credentials, a down portal
    /// server, and an unreachable network.
    async fn student_login(&self, username: &str, password: &str) -> Result<()>;

    /// Per-semester SGPA/CGPA summaries, chronological order.
    async fn get_sgpa_cgpa(&self) -> Result<Vec<GradeSummary>>;

    /// Semesters that have a grade card, most recent first.
    async fn get_semesters_for_grade_card(&self) -> Result<Vec<SemesterRef>>;

    /// Grade card for one semester.
    async fn get_grade_card(&self, semester: &SemesterRef) -> Result<GradeCard>;

    /// Semesters that have exam events, most recent first.
    async fn get_semesters_for_exam_events(&self) -> Result<Vec<SemesterRef>>;

    /// Exam events scoped to one semester.
    async fn get_exam_events(&self, semester: &SemesterRef) -> Result<Vec<ExamEvent>>;

    /// Schedule rows for one exam event.
    async fn get_exam_schedule(&self, event: &ExamEvent) -> Result<Vec<ExamScheduleEntry>>;

    /// Semesters with subject registrations, most recent first.
    async fn get_registered_semesters(&self) -> Result<Vec<SemesterRef>>;

    /// Registered subjects and their faculties for one semester.
    async fn get_registered_subjects_and_faculties(
        &self,
        semester: &SemesterRef,
    ) -> Result<RegisteredSubjects>;

    /// Semesters that have a marks report, most recent first.
    async fn get_semesters_for_marks(&self) -> Result<Vec<SemesterRef>>;

    /// Raw marks report document for one semester, for the extractor.
    async fn fetch_marks_document(&self, semester: &SemesterRef) -> Result<Vec<u8>>;

    /// Save the marks report document to `dest` and return the written path.
    async fn download_marks(&self, semester: &SemesterRef, dest: &Path) -> Result<PathBuf>;

    /// Student profile record.
    async fn get_personal_info(&self) -> Result<PersonalInfo>;
}
