//! Session store: per-domain caching, fetch orchestration and selection.
//!
//! The store sits between the [`PortalClient`](crate::client::PortalClient)
//! and whatever renders the data. It owns, per domain (grade cards, exam
//! schedules, registered subjects, marks reports):
//!
//! - a [`MemoCache`] keyed by semester/event id - write-once per key, never
//!   evicted, single-flight fetches,
//! - the current selection,
//! - an epoch-guarded [`ViewSlot`] holding what the display should show.
//!
//! First access to a domain runs its default-selection resolver: fetch the
//! list of available semesters, pick the first (most recent), and chain the
//! detail fetch. Explicit selection changes resolve the key against the
//! fetched list (`KeyNotFound` if absent), then fetch-if-absent. Fetch
//! failures are logged and published as a `Failed` view; they never escape
//! the store, so a broken domain cannot disturb the others. `KeyNotFound`
//! is the one error callers do see - it means the caller and the list are
//! out of sync, which is the caller's bug to surface.
//!
//! Everything here is single-writer per cache entry: only the fetch path
//! inserts, and readers get `Arc` snapshots.

use crate::client::PortalClient;
use crate::core::{PortalError, Result};
use crate::extract::MarksExtractor;
use crate::models::{GradeCard, GradeSummary, MarksReport, PersonalInfo, RegisteredSubjects, SemesterRef};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod cache;
pub mod view;

mod exams;
mod grades;
mod marks;
mod subjects;

pub use cache::MemoCache;
pub use exams::ExamsDomain;
pub use view::{DomainView, ViewSlot};

/// Cache key for a domain's semester list. Lists get the same single-flight
/// and write-once guarantees as keyed payloads by living in a `MemoCache`
/// under this fixed key.
const SEMESTER_LIST_KEY: &str = "semesters";

/// Cache key for one-shot domains (overview, profile).
const SINGLETON_KEY: &str = "singleton";

/// State for one semester-keyed data domain.
pub(crate) struct Domain<T> {
    /// Domain name for log lines and `KeyNotFound` messages
    name: &'static str,
    semesters: MemoCache<Vec<SemesterRef>>,
    selected: RwLock<Option<SemesterRef>>,
    details: MemoCache<T>,
    view: ViewSlot<T>,
}

impl<T: Send + Sync> Domain<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            semesters: MemoCache::new(),
            selected: RwLock::new(None),
            details: MemoCache::new(),
            view: ViewSlot::new(),
        }
    }

    /// Currently selected semester, if any.
    pub(crate) async fn selected(&self) -> Option<SemesterRef> {
        self.selected.read().await.clone()
    }

    /// Fetch the semester list if absent, sharing in-flight calls.
    async fn semester_list<F, Fut>(&self, fetch: F) -> Result<Arc<Vec<SemesterRef>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SemesterRef>>>,
    {
        self.semesters.get_or_fetch(SEMESTER_LIST_KEY, fetch).await
    }

    /// Run one detail fetch for `semester` under a fresh epoch token.
    ///
    /// Publishes `Loading` first; on completion publishes `Ready`, `Failed`,
    /// or `Unavailable` (for an empty-payload result) - unless a newer load
    /// started in the meantime, in which case the result is kept in the
    /// cache but not displayed.
    async fn load_detail<F, Fut>(&self, semester: &SemesterRef, producer: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.view.begin();
        self.view.publish(token, DomainView::Loading).await;

        match self.details.get_or_fetch(&semester.registration_id, producer).await {
            Ok(value) => {
                self.view.publish(token, DomainView::Ready(value)).await;
            }
            Err(PortalError::EmptyData { .. }) => {
                self.view.publish(token, DomainView::Unavailable).await;
            }
            Err(err) => {
                tracing::warn!(
                    domain = self.name,
                    key = %semester.registration_id,
                    error = %err,
                    "detail fetch failed"
                );
                self.view.publish(token, DomainView::Failed(err.to_string())).await;
            }
        }
    }

    /// Default-selection resolver plus current-view accessor.
    ///
    /// Idempotent: a present list is never refetched; a present detail is
    /// served from cache; only whatever is missing gets fetched. An empty
    /// semester list leaves the selection empty and reads as `Unavailable`.
    async fn view_with_default<LF, LFut, DF, DFut>(
        &self,
        list_fetch: LF,
        detail_fetch: DF,
    ) -> DomainView<T>
    where
        LF: FnOnce() -> LFut,
        LFut: Future<Output = Result<Vec<SemesterRef>>>,
        DF: FnOnce(SemesterRef) -> DFut,
        DFut: Future<Output = Result<T>>,
    {
        let list = match self.semester_list(list_fetch).await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(domain = self.name, error = %err, "semester list fetch failed");
                return DomainView::Failed(err.to_string());
            }
        };
        if list.is_empty() {
            return DomainView::Unavailable;
        }

        let selected = {
            let mut guard = self.selected.write().await;
            match guard.as_ref() {
                Some(sem) => sem.clone(),
                None => {
                    let first = list[0].clone();
                    *guard = Some(first.clone());
                    first
                }
            }
        };

        if let Some(cached) = self.details.get(&selected.registration_id) {
            return DomainView::Ready(cached);
        }

        let semester = selected.clone();
        self.load_detail(&selected, || detail_fetch(semester)).await;
        self.view.get().await
    }

    /// Selection coordinator: resolve `id` against the fetched list, update
    /// the selection, and fetch the detail if it is not cached yet.
    ///
    /// Fails with `KeyNotFound` when `id` is not in the list (or the list
    /// has not been fetched); fetch failures end up in the view, not here.
    async fn select<DF, DFut>(&self, id: &str, detail_fetch: DF) -> Result<()>
    where
        DF: FnOnce(SemesterRef) -> DFut,
        DFut: Future<Output = Result<T>>,
    {
        let semester = self
            .semesters
            .get(SEMESTER_LIST_KEY)
            .and_then(|list| list.iter().find(|sem| sem.registration_id == id).cloned())
            .ok_or_else(|| PortalError::KeyNotFound {
                domain: self.name.to_string(),
                key: id.to_string(),
            })?;

        *self.selected.write().await = Some(semester.clone());

        if let Some(cached) = self.details.get(id) {
            let token = self.view.begin();
            self.view.publish(token, DomainView::Ready(cached)).await;
            return Ok(());
        }

        let for_fetch = semester.clone();
        self.load_detail(&semester, || detail_fetch(for_fetch)).await;
        Ok(())
    }

    /// Drop all state for logout.
    async fn clear(&self) {
        self.semesters.clear();
        self.details.clear();
        *self.selected.write().await = None;
        self.view.reset().await;
    }
}

/// Session-scoped store over a portal client and a marks extractor.
///
/// Create one per login; all state dies with it. The store is `&self`
/// throughout - wrap it in an `Arc` to share it across tasks or views.
pub struct SessionStore<C, X> {
    client: C,
    extractor: X,
    overview_cache: MemoCache<Vec<GradeSummary>>,
    overview_view: ViewSlot<Vec<GradeSummary>>,
    profile: MemoCache<PersonalInfo>,
    pub(crate) grade_cards: Domain<GradeCard>,
    pub(crate) exams: ExamsDomain,
    pub(crate) subjects: Domain<RegisteredSubjects>,
    pub(crate) marks: Domain<MarksReport>,
}

impl<C, X> SessionStore<C, X>
where
    C: PortalClient,
    X: MarksExtractor,
{
    /// Build an empty store around a client and an extractor.
    pub fn new(client: C, extractor: X) -> Self {
        Self {
            client,
            extractor,
            overview_cache: MemoCache::new(),
            overview_view: ViewSlot::new(),
            profile: MemoCache::new(),
            grade_cards: Domain::new("grade card"),
            exams: ExamsDomain::new(),
            subjects: Domain::new("subjects"),
            marks: Domain::new("marks"),
        }
    }

    /// Authenticate the underlying client.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.client.student_login(username, password).await
    }

    /// The portal client, for operations outside the cached domains.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Student profile, fetched once per session.
    pub async fn profile(&self) -> Result<Arc<PersonalInfo>> {
        self.profile
            .get_or_fetch(SINGLETON_KEY, || self.client.get_personal_info())
            .await
    }

    /// Drop every cache, selection and view. Called on logout; the store is
    /// back to its freshly-created state afterwards.
    pub async fn logout(&self) {
        self.overview_cache.clear();
        self.overview_view.reset().await;
        self.profile.clear();
        self.grade_cards.clear().await;
        self.exams.clear().await;
        self.subjects.clear().await;
        self.marks.clear().await;
        tracing::debug!("session store cleared");
    }
}
