//! Grade overview and grade-card domains.
//!
//! The overview is a one-shot fetch of every semester's SGPA/CGPA summary;
//! an empty grade sheet reads as `Unavailable` and is not cached, so the
//! next access retries. Grade cards are the standard semester-keyed domain:
//! list, default to the most recent semester, cache one card per
//! registration id.

use super::{DomainView, SINGLETON_KEY, SessionStore};
use crate::client::PortalClient;
use crate::core::{PortalError, Result};
use crate::extract::MarksExtractor;
use crate::models::{GradeCard, GradeSummary, SemesterRef};
use std::sync::Arc;

impl<C, X> SessionStore<C, X>
where
    C: PortalClient,
    X: MarksExtractor,
{
    /// SGPA/CGPA summaries for all semesters, fetched once per session.
    pub async fn grade_overview(&self) -> DomainView<Vec<GradeSummary>> {
        if let Some(cached) = self.overview_cache.get(SINGLETON_KEY) {
            return DomainView::Ready(cached);
        }

        let token = self.overview_view.begin();
        self.overview_view.publish(token, DomainView::Loading).await;

        let client = &self.client;
        let result = self
            .overview_cache
            .get_or_fetch(SINGLETON_KEY, || async move {
                let summaries = client.get_sgpa_cgpa().await?;
                if summaries.is_empty() {
                    return Err(PortalError::EmptyData {
                        domain: "grade sheet".to_string(),
                    });
                }
                Ok(summaries)
            })
            .await;

        match result {
            Ok(summaries) => {
                self.overview_view
                    .publish(token, DomainView::Ready(summaries))
                    .await;
            }
            Err(PortalError::EmptyData { .. }) => {
                self.overview_view
                    .publish(token, DomainView::Unavailable)
                    .await;
            }
            Err(err) => {
                tracing::warn!(domain = "overview", error = %err, "grade overview fetch failed");
                self.overview_view
                    .publish(token, DomainView::Failed(err.to_string()))
                    .await;
            }
        }

        self.overview_view.get().await
    }

    /// Semesters that have a grade card, fetching the list if needed.
    pub async fn grade_card_semesters(&self) -> Result<Arc<Vec<SemesterRef>>> {
        self.grade_cards
            .semester_list(|| self.client.get_semesters_for_grade_card())
            .await
    }

    /// Grade card for the current selection, defaulting to the most recent
    /// semester on first access.
    pub async fn grade_card_view(&self) -> DomainView<GradeCard> {
        let client = &self.client;
        self.grade_cards
            .view_with_default(
                || client.get_semesters_for_grade_card(),
                |sem| async move { client.get_grade_card(&sem).await },
            )
            .await
    }

    /// Switch the grade-card selection to `registration_id`.
    pub async fn select_grade_card(&self, registration_id: &str) -> Result<()> {
        let client = &self.client;
        self.grade_cards
            .select(registration_id, |sem| async move {
                client.get_grade_card(&sem).await
            })
            .await
    }

    /// Currently selected grade-card semester.
    pub async fn selected_grade_card_semester(&self) -> Option<SemesterRef> {
        self.grade_cards.selected().await
    }
}
