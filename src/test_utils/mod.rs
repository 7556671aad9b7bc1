//! Test support: a scriptable in-memory portal and logging setup.
//!
//! Compiled for unit tests and, via the `test-utils` feature (enabled by
//! the crate's dev-dependency on itself), for the integration suite.

use crate::core::{PortalError, Result};
use crate::models::{
    ExamEvent, ExamScheduleEntry, GradeCard, GradeCardEntry, GradeSummary, PersonalInfo,
    RegisteredSubjects, SemesterRef,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::PortalClient;

static INIT_LOGGING: std::sync::Once = std::sync::Once::new();

/// Initialize tracing for tests. Safe to call from every test; only the
/// first call installs the subscriber. Honors `RUST_LOG`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Per-endpoint call counters, for asserting cache behavior.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub sgpa_cgpa: AtomicUsize,
    pub grade_card_semesters: AtomicUsize,
    pub grade_card: AtomicUsize,
    pub exam_semesters: AtomicUsize,
    pub exam_events: AtomicUsize,
    pub exam_schedule: AtomicUsize,
    pub registered_semesters: AtomicUsize,
    pub registered_subjects: AtomicUsize,
    pub marks_semesters: AtomicUsize,
    pub marks_document: AtomicUsize,
    pub personal_info: AtomicUsize,
}

/// In-memory portal with scripted payloads.
///
/// Every endpoint counts its calls, an optional latency is injected before
/// answering, and individual endpoints can be armed to fail a number of
/// times before recovering.
#[derive(Default)]
pub struct MockPortal {
    pub calls: CallCounts,
    latency: Option<Duration>,
    grade_summaries: Vec<GradeSummary>,
    grade_card_semesters: Vec<SemesterRef>,
    grade_cards: HashMap<String, GradeCard>,
    exam_semesters: Vec<SemesterRef>,
    exam_events: HashMap<String, Vec<ExamEvent>>,
    exam_schedules: HashMap<String, Vec<ExamScheduleEntry>>,
    subject_semesters: Vec<SemesterRef>,
    subjects: HashMap<String, RegisteredSubjects>,
    marks_semesters: Vec<SemesterRef>,
    marks_documents: HashMap<String, Vec<u8>>,
    personal_info: PersonalInfo,
    failures: Mutex<HashMap<&'static str, usize>>,
}

impl MockPortal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A semester reference named after its 1-based number, e.g. `sem(3)`
    /// yields registration id `REG3` and code `SEM3`.
    pub fn sem(n: u32) -> SemesterRef {
        SemesterRef {
            registration_id: format!("REG{n}"),
            registration_code: format!("SEM{n}"),
            stynumber: n,
        }
    }

    /// A minimal grade card for a semester.
    pub fn grade_card_for(sem: &SemesterRef) -> GradeCard {
        GradeCard {
            semester_id: sem.registration_id.clone(),
            subjects: vec![GradeCardEntry {
                subjectcode: format!("CS{}01", sem.stynumber),
                subjectdesc: "Data Structures".to_string(),
                grade: "A".to_string(),
                coursecreditpoint: 4.0,
            }],
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_grade_summaries(mut self, summaries: Vec<GradeSummary>) -> Self {
        self.grade_summaries = summaries;
        self
    }

    /// Script the grade card domain: the semester list plus one card per
    /// listed semester.
    pub fn with_grade_cards(mut self, semesters: Vec<SemesterRef>) -> Self {
        for sem in &semesters {
            self.grade_cards
                .insert(sem.registration_id.clone(), Self::grade_card_for(sem));
        }
        self.grade_card_semesters = semesters;
        self
    }

    pub fn with_grade_card(mut self, sem: &SemesterRef, card: GradeCard) -> Self {
        self.grade_cards.insert(sem.registration_id.clone(), card);
        self
    }

    pub fn with_exam_semesters(mut self, semesters: Vec<SemesterRef>) -> Self {
        self.exam_semesters = semesters;
        self
    }

    pub fn with_exam_events(mut self, sem: &SemesterRef, events: Vec<ExamEvent>) -> Self {
        self.exam_events
            .insert(sem.registration_id.clone(), events);
        self
    }

    pub fn with_exam_schedule(
        mut self,
        event: &ExamEvent,
        schedule: Vec<ExamScheduleEntry>,
    ) -> Self {
        self.exam_schedules
            .insert(event.exam_event_id.clone(), schedule);
        self
    }

    pub fn with_subjects(mut self, sem: &SemesterRef, subjects: RegisteredSubjects) -> Self {
        if !self.subject_semesters.contains(sem) {
            self.subject_semesters.push(sem.clone());
        }
        self.subjects.insert(sem.registration_id.clone(), subjects);
        self
    }

    pub fn with_marks_document(mut self, sem: &SemesterRef, raw: Vec<u8>) -> Self {
        if !self.marks_semesters.contains(sem) {
            self.marks_semesters.push(sem.clone());
        }
        self.marks_documents
            .insert(sem.registration_id.clone(), raw);
        self
    }

    pub fn with_personal_info(mut self, info: PersonalInfo) -> Self {
        self.personal_info = info;
        self
    }

    /// Arm an endpoint to fail `times` times before recovering. Endpoint
    /// names match the [`CallCounts`] field names.
    pub fn fail_times(self, endpoint: &'static str, times: usize) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(endpoint, times);
        self
    }

    async fn answer(&self, endpoint: &'static str, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(endpoint) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(PortalError::Api {
                    endpoint: endpoint.to_string(),
                    status: 500,
                    message: "injected failure".to_string(),
                });
            }
        }
        Ok(())
    }

    fn lookup<T: Clone>(
        map: &HashMap<String, T>,
        key: &str,
        endpoint: &'static str,
    ) -> Result<T> {
        map.get(key)
            .cloned()
            .ok_or_else(|| PortalError::Api {
                endpoint: endpoint.to_string(),
                status: 404,
                message: format!("no scripted payload for '{key}'"),
            })
    }
}

#[async_trait]
impl PortalClient for MockPortal {
    async fn student_login(&self, _username: &str, _password: &str) -> Result<()> {
        Ok(())
    }

    async fn get_sgpa_cgpa(&self) -> Result<Vec<GradeSummary>> {
        self.answer("sgpa_cgpa", &self.calls.sgpa_cgpa).await?;
        Ok(self.grade_summaries.clone())
    }

    async fn get_semesters_for_grade_card(&self) -> Result<Vec<SemesterRef>> {
        self.answer("grade_card_semesters", &self.calls.grade_card_semesters)
            .await?;
        Ok(self.grade_card_semesters.clone())
    }

    async fn get_grade_card(&self, semester: &SemesterRef) -> Result<GradeCard> {
        self.answer("grade_card", &self.calls.grade_card).await?;
        Self::lookup(&self.grade_cards, &semester.registration_id, "grade_card")
    }

    async fn get_semesters_for_exam_events(&self) -> Result<Vec<SemesterRef>> {
        self.answer("exam_semesters", &self.calls.exam_semesters)
            .await?;
        Ok(self.exam_semesters.clone())
    }

    async fn get_exam_events(&self, semester: &SemesterRef) -> Result<Vec<ExamEvent>> {
        self.answer("exam_events", &self.calls.exam_events).await?;
        Self::lookup(&self.exam_events, &semester.registration_id, "exam_events")
    }

    async fn get_exam_schedule(&self, event: &ExamEvent) -> Result<Vec<ExamScheduleEntry>> {
        self.answer("exam_schedule", &self.calls.exam_schedule)
            .await?;
        Self::lookup(&self.exam_schedules, &event.exam_event_id, "exam_schedule")
    }

    async fn get_registered_semesters(&self) -> Result<Vec<SemesterRef>> {
        self.answer("registered_semesters", &self.calls.registered_semesters)
            .await?;
        Ok(self.subject_semesters.clone())
    }

    async fn get_registered_subjects_and_faculties(
        &self,
        semester: &SemesterRef,
    ) -> Result<RegisteredSubjects> {
        self.answer("registered_subjects", &self.calls.registered_subjects)
            .await?;
        Self::lookup(
            &self.subjects,
            &semester.registration_id,
            "registered_subjects",
        )
    }

    async fn get_semesters_for_marks(&self) -> Result<Vec<SemesterRef>> {
        self.answer("marks_semesters", &self.calls.marks_semesters)
            .await?;
        Ok(self.marks_semesters.clone())
    }

    async fn fetch_marks_document(&self, semester: &SemesterRef) -> Result<Vec<u8>> {
        self.answer("marks_document", &self.calls.marks_document)
            .await?;
        Self::lookup(
            &self.marks_documents,
            &semester.registration_id,
            "marks_document",
        )
    }

    async fn download_marks(&self, semester: &SemesterRef, dest: &Path) -> Result<PathBuf> {
        let raw = self.fetch_marks_document(semester).await?;
        let path = dest.join(format!("marks-{}.pdf", semester.registration_code));
        tokio::fs::write(&path, &raw).await?;
        Ok(path)
    }

    async fn get_personal_info(&self) -> Result<PersonalInfo> {
        self.answer("personal_info", &self.calls.personal_info)
            .await?;
        Ok(self.personal_info.clone())
    }
}
