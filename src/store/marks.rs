//! Marks domain: per-semester marks reports.
//!
//! The detail producer is a two-step pipeline - fetch the raw report
//! document from the portal, then hand it to the extractor. The structured
//! report is cached per semester like any other payload, so the extractor
//! runs at most once per newly selected semester.

use super::{DomainView, SEMESTER_LIST_KEY, SessionStore};
use crate::client::PortalClient;
use crate::core::{PortalError, Result};
use crate::extract::MarksExtractor;
use crate::models::{MarksReport, SemesterRef};
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl<C, X> SessionStore<C, X>
where
    C: PortalClient,
    X: MarksExtractor,
{
    /// Semesters that have a marks report, fetching the list if needed.
    pub async fn marks_semesters(&self) -> Result<Arc<Vec<SemesterRef>>> {
        self.marks
            .semester_list(|| self.client.get_semesters_for_marks())
            .await
    }

    /// Marks report for the current selection, defaulting to the most recent
    /// semester on first access.
    pub async fn marks_view(&self) -> DomainView<MarksReport> {
        let client = &self.client;
        let extractor = &self.extractor;
        self.marks
            .view_with_default(
                || client.get_semesters_for_marks(),
                |sem| async move {
                    let raw = client.fetch_marks_document(&sem).await?;
                    extractor.extract(&raw).await
                },
            )
            .await
    }

    /// Switch the marks selection to `registration_id`.
    pub async fn select_marks_semester(&self, registration_id: &str) -> Result<()> {
        let client = &self.client;
        let extractor = &self.extractor;
        self.marks
            .select(registration_id, |sem| async move {
                let raw = client.fetch_marks_document(&sem).await?;
                extractor.extract(&raw).await
            })
            .await
    }

    /// Currently selected marks semester.
    pub async fn selected_marks_semester(&self) -> Option<SemesterRef> {
        self.marks.selected().await
    }

    /// Save the raw marks document for `registration_id` under `dest`.
    ///
    /// Out-of-band with respect to the cache: the written file is the
    /// portal's document as served, not the extracted report.
    pub async fn download_marks(&self, registration_id: &str, dest: &Path) -> Result<PathBuf> {
        let semester = self
            .marks
            .semesters
            .get(SEMESTER_LIST_KEY)
            .and_then(|list| {
                list.iter()
                    .find(|sem| sem.registration_id == registration_id)
                    .cloned()
            })
            .ok_or_else(|| PortalError::KeyNotFound {
                domain: "marks".to_string(),
                key: registration_id.to_string(),
            })?;
        self.client.download_marks(&semester, dest).await
    }
}
