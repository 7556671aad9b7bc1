//! Exam-schedule domain: the one domain with two dependent levels.
//!
//! A semester owns a list of exam events; an event owns a schedule. Changing
//! the semester discards the event selection and re-runs the event-level
//! default resolver scoped to the new semester, all under a single epoch
//! token so a quick second change invalidates the whole cascade. Event lists
//! are cached per semester id and schedules per event id; event ids are
//! globally unique, so schedules cached under a previous semester stay valid
//! and are reused without a refetch.

use super::{DomainView, MemoCache, SEMESTER_LIST_KEY, SessionStore, ViewSlot};
use crate::client::PortalClient;
use crate::core::{PortalError, Result};
use crate::extract::MarksExtractor;
use crate::models::{ExamEvent, ExamScheduleEntry, SemesterRef};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State for the two-level exam domain.
pub struct ExamsDomain {
    semesters: MemoCache<Vec<SemesterRef>>,
    selected_sem: RwLock<Option<SemesterRef>>,
    /// Event lists keyed by semester registration id
    events: MemoCache<Vec<ExamEvent>>,
    selected_event: RwLock<Option<ExamEvent>>,
    /// Schedules keyed by exam event id
    schedules: MemoCache<Vec<ExamScheduleEntry>>,
    view: ViewSlot<Vec<ExamScheduleEntry>>,
}

impl Default for ExamsDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamsDomain {
    pub(crate) fn new() -> Self {
        Self {
            semesters: MemoCache::new(),
            selected_sem: RwLock::new(None),
            events: MemoCache::new(),
            selected_event: RwLock::new(None),
            schedules: MemoCache::new(),
            view: ViewSlot::new(),
        }
    }

    pub(crate) async fn clear(&self) {
        self.semesters.clear();
        self.events.clear();
        self.schedules.clear();
        *self.selected_sem.write().await = None;
        *self.selected_event.write().await = None;
        self.view.reset().await;
    }
}

impl<C, X> SessionStore<C, X>
where
    C: PortalClient,
    X: MarksExtractor,
{
    /// Semesters that have exam events, fetching the list if needed.
    pub async fn exam_semesters(&self) -> Result<Arc<Vec<SemesterRef>>> {
        self.exams
            .semesters
            .get_or_fetch(SEMESTER_LIST_KEY, || {
                self.client.get_semesters_for_exam_events()
            })
            .await
    }

    /// Exam events for the current semester, resolving the semester default
    /// first when nothing is selected yet.
    pub async fn exam_events(&self) -> Result<Arc<Vec<ExamEvent>>> {
        let semester = match self.exams.selected_sem.read().await.clone() {
            Some(sem) => sem,
            None => {
                let list = self.exam_semesters().await?;
                let first = list.first().cloned().ok_or_else(|| PortalError::EmptyData {
                    domain: "exam semesters".to_string(),
                })?;
                *self.exams.selected_sem.write().await = Some(first.clone());
                first
            }
        };

        let client = &self.client;
        let sem = semester.clone();
        self.exams
            .events
            .get_or_fetch(&semester.registration_id, || async move {
                client.get_exam_events(&sem).await
            })
            .await
    }

    /// Schedule for the current selection, running the full default cascade
    /// (semester -> event -> schedule) on first access.
    pub async fn exam_schedule_view(&self) -> DomainView<Vec<ExamScheduleEntry>> {
        let list = match self
            .exams
            .semesters
            .get_or_fetch(SEMESTER_LIST_KEY, || {
                self.client.get_semesters_for_exam_events()
            })
            .await
        {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(domain = "exams", error = %err, "semester list fetch failed");
                return DomainView::Failed(err.to_string());
            }
        };
        if list.is_empty() {
            return DomainView::Unavailable;
        }

        let semester = {
            let mut guard = self.exams.selected_sem.write().await;
            match guard.as_ref() {
                Some(sem) => sem.clone(),
                None => {
                    let first = list[0].clone();
                    *guard = Some(first.clone());
                    first
                }
            }
        };

        let token = self.exams.view.begin();
        self.resolve_exam_event_default(token, &semester).await;
        self.exams.view.get().await
    }

    /// Switch the exam semester. Clears the event selection, then re-runs
    /// the event-level default resolver for the new semester.
    pub async fn select_exam_semester(&self, registration_id: &str) -> Result<()> {
        let semester = self
            .exams
            .semesters
            .get(SEMESTER_LIST_KEY)
            .and_then(|list| {
                list.iter()
                    .find(|sem| sem.registration_id == registration_id)
                    .cloned()
            })
            .ok_or_else(|| PortalError::KeyNotFound {
                domain: "exam semesters".to_string(),
                key: registration_id.to_string(),
            })?;

        *self.exams.selected_sem.write().await = Some(semester.clone());
        *self.exams.selected_event.write().await = None;

        let token = self.exams.view.begin();
        self.resolve_exam_event_default(token, &semester).await;
        Ok(())
    }

    /// Switch the exam event within the current semester.
    pub async fn select_exam_event(&self, exam_event_id: &str) -> Result<()> {
        let not_found = || PortalError::KeyNotFound {
            domain: "exam events".to_string(),
            key: exam_event_id.to_string(),
        };

        let semester = self
            .exams
            .selected_sem
            .read()
            .await
            .clone()
            .ok_or_else(not_found)?;
        let event = self
            .exams
            .events
            .get(&semester.registration_id)
            .and_then(|events| {
                events
                    .iter()
                    .find(|ev| ev.exam_event_id == exam_event_id)
                    .cloned()
            })
            .ok_or_else(not_found)?;

        *self.exams.selected_event.write().await = Some(event.clone());

        let token = self.exams.view.begin();
        self.load_exam_schedule(token, &event).await;
        Ok(())
    }

    /// Currently selected exam semester.
    pub async fn selected_exam_semester(&self) -> Option<SemesterRef> {
        self.exams.selected_sem.read().await.clone()
    }

    /// Currently selected exam event.
    pub async fn selected_exam_event(&self) -> Option<ExamEvent> {
        self.exams.selected_event.read().await.clone()
    }

    /// Event-level default resolver for `semester`, under one epoch token:
    /// fetch the event list, keep the selected event if it belongs to this
    /// semester (otherwise pick the first), then load that event's schedule.
    async fn resolve_exam_event_default(&self, token: u64, semester: &SemesterRef) {
        self.exams.view.publish(token, DomainView::Loading).await;

        let client = &self.client;
        let sem = semester.clone();
        let events = match self
            .exams
            .events
            .get_or_fetch(&semester.registration_id, || async move {
                client.get_exam_events(&sem).await
            })
            .await
        {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(
                    domain = "exams",
                    key = %semester.registration_id,
                    error = %err,
                    "exam event fetch failed"
                );
                self.exams
                    .view
                    .publish(token, DomainView::Failed(err.to_string()))
                    .await;
                return;
            }
        };

        let Some(first) = events.first().cloned() else {
            self.exams.view.publish(token, DomainView::Unavailable).await;
            return;
        };

        let event = {
            let mut guard = self.exams.selected_event.write().await;
            // A newer selection may have landed while the event list was in
            // flight; a stale resolver must not overwrite its choice.
            if !self.exams.view.is_current(token) {
                return;
            }
            let still_valid = guard
                .as_ref()
                .filter(|ev| events.iter().any(|e| e.exam_event_id == ev.exam_event_id))
                .cloned();
            match still_valid {
                Some(ev) => ev,
                None => {
                    *guard = Some(first.clone());
                    first
                }
            }
        };

        self.load_exam_schedule(token, &event).await;
    }

    /// Load one event's schedule under an existing epoch token.
    async fn load_exam_schedule(&self, token: u64, event: &ExamEvent) {
        if let Some(cached) = self.exams.schedules.get(&event.exam_event_id) {
            self.exams.view.publish(token, DomainView::Ready(cached)).await;
            return;
        }

        self.exams.view.publish(token, DomainView::Loading).await;

        let client = &self.client;
        let ev = event.clone();
        match self
            .exams
            .schedules
            .get_or_fetch(&event.exam_event_id, || async move {
                client.get_exam_schedule(&ev).await
            })
            .await
        {
            Ok(rows) => {
                self.exams.view.publish(token, DomainView::Ready(rows)).await;
            }
            Err(err) => {
                tracing::warn!(
                    domain = "exams",
                    key = %event.exam_event_id,
                    error = %err,
                    "exam schedule fetch failed"
                );
                self.exams
                    .view
                    .publish(token, DomainView::Failed(err.to_string()))
                    .await;
            }
        }
    }
}
