use crate::domain::SortMode;
use crate::feed::controller::{
    collect_matches, FilterOutcome, FilterStart, JobFeedController, LoadOutcome, LoadTicket,
};
use crate::feed::Renderer;
use crate::search::JobSearchClient;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// One session's controller, shared by every request from that browser.
///
/// The lock is held to start a load and to finish it, never across the
/// upstream calls in between. A newer request that starts meanwhile makes
/// the older batch stale and `finish_load` drops it.
#[derive(Clone, Default)]
pub struct SharedFeed(Arc<Mutex<JobFeedController>>);

impl SharedFeed {
    pub fn new(controller: JobFeedController) -> Self {
        Self(Arc::new(Mutex::new(controller)))
    }

    pub fn lock(&self) -> MutexGuard<'_, JobFeedController> {
        self.0.lock()
    }

    /// Fetches up to one display page of new matching jobs and renders them.
    /// A fresh search (`is_load_more == false`) first drops the working set
    /// and clears the list.
    pub fn load_jobs<C, R>(
        &self,
        client: &C,
        renderer: &mut R,
        query: &str,
        is_load_more: bool,
    ) -> LoadOutcome
    where
        C: JobSearchClient + ?Sized,
        R: Renderer + ?Sized,
    {
        let ticket = self.lock().begin_load(query, is_load_more);
        self.complete(client, renderer, ticket)
    }

    /// "Show more" for the active query.
    pub fn load_more<C, R>(&self, client: &C, renderer: &mut R) -> LoadOutcome
    where
        C: JobSearchClient + ?Sized,
        R: Renderer + ?Sized,
    {
        let ticket = self.lock().begin_more();
        self.complete(client, renderer, ticket)
    }

    pub fn apply_filter_and_sort<C, R>(
        &self,
        client: &C,
        renderer: &mut R,
        raw_query: &str,
        selected_type: Option<&str>,
        sort_mode: SortMode,
    ) -> FilterOutcome
    where
        C: JobSearchClient + ?Sized,
        R: Renderer + ?Sized,
    {
        // Bound first so the guard is released before the remote branch.
        let start = self
            .lock()
            .begin_filter(renderer, raw_query, selected_type, sort_mode);

        match start {
            FilterStart::Remote(ticket) => {
                FilterOutcome::Remote(self.complete(client, renderer, ticket))
            }
            FilterStart::Local { rendered } => FilterOutcome::Local { rendered },
        }
    }

    fn complete<C, R>(&self, client: &C, renderer: &mut R, ticket: LoadTicket) -> LoadOutcome
    where
        C: JobSearchClient + ?Sized,
        R: Renderer + ?Sized,
    {
        let batch = collect_matches(client, &ticket);

        let mut feed = self.lock();
        let outcome = feed.finish_load(renderer, batch);
        tracing::debug!(
            rendered = outcome.rendered,
            pages = outcome.pages_fetched,
            failures = outcome.upstream_failures,
            stale = outcome.stale,
            current_page = feed.current_page(),
            working_set = feed.displayed_ids().len(),
            "load finished"
        );
        outcome
    }
}
