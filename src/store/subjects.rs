//! Registered-subjects domain: per-semester subject/faculty registrations.

use super::{DomainView, SessionStore};
use crate::client::PortalClient;
use crate::core::Result;
use crate::extract::MarksExtractor;
use crate::models::{RegisteredSubjects, SemesterRef};
use std::sync::Arc;

impl<C, X> SessionStore<C, X>
where
    C: PortalClient,
    X: MarksExtractor,
{
    /// Semesters with subject registrations, fetching the list if needed.
    pub async fn registered_semesters(&self) -> Result<Arc<Vec<SemesterRef>>> {
        self.subjects
            .semester_list(|| self.client.get_registered_semesters())
            .await
    }

    /// Registered subjects for the current selection, defaulting to the most
    /// recent semester on first access.
    pub async fn subjects_view(&self) -> DomainView<RegisteredSubjects> {
        let client = &self.client;
        self.subjects
            .view_with_default(
                || client.get_registered_semesters(),
                |sem| async move { client.get_registered_subjects_and_faculties(&sem).await },
            )
            .await
    }

    /// Switch the subjects selection to `registration_id`.
    pub async fn select_subjects_semester(&self, registration_id: &str) -> Result<()> {
        let client = &self.client;
        self.subjects
            .select(registration_id, |sem| async move {
                client.get_registered_subjects_and_faculties(&sem).await
            })
            .await
    }

    /// Currently selected subjects semester.
    pub async fn selected_subjects_semester(&self) -> Option<SemesterRef> {
        self.subjects.selected().await
    }
}
