use crate::domain::{latest_first, matches_query, Job, SortMode};
use crate::feed::{Renderer, PAGE_SIZE};
use crate::search::JobSearchClient;
use std::collections::{BTreeSet, HashSet};

/// Per-session feed state and the operations that mutate it.
///
/// `displayed_ids` always holds exactly the ids of `displayed_jobs`, and no
/// id appears twice in `displayed_jobs`.
#[derive(Debug)]
pub struct JobFeedController {
    displayed_jobs: Vec<Job>,
    displayed_ids: HashSet<String>,
    search_query: String,
    current_page: u32,
    generation: u64,
    // A fresh search was started but its batch never landed.
    pending_reset: bool,
    page_size: usize,
    max_upstream_pages: Option<u32>,
}

/// Snapshot taken when a load starts. Carries everything the fetch loop
/// needs so it can run without the session lock.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    pub query: String,
    pub reset: bool,
    seen: HashSet<String>,
    page_size: usize,
    max_upstream_pages: Option<u32>,
}

/// Matches gathered for one ticket.
#[derive(Debug)]
pub struct Batch {
    pub generation: u64,
    pub reset: bool,
    pub jobs: Vec<Job>,
    pub pages_fetched: u32,
    pub upstream_failures: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub rendered: usize,
    pub pages_fetched: u32,
    pub upstream_failures: u32,
    /// A newer load or filter superseded this one; nothing was rendered.
    pub stale: bool,
}

/// What `begin_filter` decided.
#[derive(Debug)]
pub enum FilterStart {
    Remote(LoadTicket),
    Local { rendered: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Remote(LoadOutcome),
    Local { rendered: usize },
}

impl FilterOutcome {
    pub fn rendered(&self) -> usize {
        match self {
            FilterOutcome::Remote(o) => o.rendered,
            FilterOutcome::Local { rendered } => *rendered,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FilterOutcome::Remote(o) if o.stale)
    }
}

impl Default for JobFeedController {
    fn default() -> Self {
        Self::new(PAGE_SIZE, None)
    }
}

impl JobFeedController {
    pub fn new(page_size: usize, max_upstream_pages: Option<u32>) -> Self {
        Self {
            displayed_jobs: Vec::new(),
            displayed_ids: HashSet::new(),
            search_query: String::new(),
            current_page: 1,
            generation: 0,
            pending_reset: false,
            page_size: page_size.max(1),
            max_upstream_pages,
        }
    }

    pub fn displayed_jobs(&self) -> &[Job] {
        &self.displayed_jobs
    }

    pub fn displayed_ids(&self) -> &HashSet<String> {
        &self.displayed_ids
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Job types present in the working set, for the type filter.
    pub fn type_options(&self) -> Vec<String> {
        let mut types: BTreeSet<String> = self
            .displayed_jobs
            .iter()
            .map(|j| j.job_type.clone())
            .collect();
        types.insert(crate::domain::DEFAULT_JOB_TYPE.to_string());
        types.into_iter().collect()
    }

    /// First half of a load. `query` becomes the active query. Fresh
    /// searches reset the working set here so later dedup checks run
    /// against the new session state.
    pub fn begin_load(&mut self, query: &str, is_load_more: bool) -> LoadTicket {
        self.generation += 1;
        self.set_search_query(query);

        if !is_load_more {
            self.displayed_jobs.clear();
            self.displayed_ids.clear();
            self.pending_reset = true;
        }

        LoadTicket {
            generation: self.generation,
            query: self.search_query.clone(),
            // The list on screen still shows the pre-reset jobs until a
            // fresh batch lands, so a load-more on top of it must replace.
            reset: self.pending_reset,
            seen: self.displayed_ids.clone(),
            page_size: self.page_size,
            max_upstream_pages: self.max_upstream_pages,
        }
    }

    /// Second half of a load. Drops the batch if a newer load or filter
    /// has started since the ticket was issued.
    pub fn finish_load<R>(&mut self, renderer: &mut R, batch: Batch) -> LoadOutcome
    where
        R: Renderer + ?Sized,
    {
        let mut outcome = LoadOutcome {
            rendered: 0,
            pages_fetched: batch.pages_fetched,
            upstream_failures: batch.upstream_failures,
            stale: false,
        };

        if batch.generation != self.generation {
            tracing::debug!(
                batch = batch.generation,
                current = self.generation,
                "discarding stale load"
            );
            outcome.stale = true;
            return outcome;
        }

        if batch.reset {
            renderer.clear();
            self.pending_reset = false;
        }

        self.current_page = batch.pages_fetched.max(1);
        outcome.rendered = self.display(renderer, batch.jobs);
        outcome
    }

    /// Renders each job and adds it to the working set. Jobs whose id is
    /// already displayed are skipped. Returns how many were rendered.
    pub fn display<R>(&mut self, renderer: &mut R, jobs: Vec<Job>) -> usize
    where
        R: Renderer + ?Sized,
    {
        let mut rendered = 0;
        for job in jobs {
            if !self.displayed_ids.insert(job.id.clone()) {
                continue;
            }
            renderer.render(&job);
            self.displayed_jobs.push(job);
            rendered += 1;
        }
        rendered
    }

    /// Lowercases and stores the active query, returning it.
    pub fn set_search_query(&mut self, raw_query: &str) -> &str {
        self.search_query = raw_query.to_lowercase();
        &self.search_query
    }

    /// Starts the next page for the active query.
    pub fn begin_more(&mut self) -> LoadTicket {
        let query = self.search_query.clone();
        self.begin_load(&query, true)
    }

    /// A non-empty query starts a fresh remote search and hands back its
    /// ticket. An empty one filters and sorts the jobs already loaded,
    /// without touching the network.
    pub fn begin_filter<R>(
        &mut self,
        renderer: &mut R,
        raw_query: &str,
        selected_type: Option<&str>,
        sort_mode: SortMode,
    ) -> FilterStart
    where
        R: Renderer + ?Sized,
    {
        if raw_query.is_empty() {
            self.set_search_query("");
            return FilterStart::Local {
                rendered: self.apply_local_filter(renderer, selected_type, sort_mode),
            };
        }

        FilterStart::Remote(self.begin_load(raw_query, false))
    }

    /// Re-renders the first page of the filtered, sorted working set. The
    /// working set itself is left as is so clearing the filter brings the
    /// other jobs back.
    pub fn apply_local_filter<R>(
        &mut self,
        renderer: &mut R,
        selected_type: Option<&str>,
        sort_mode: SortMode,
    ) -> usize
    where
        R: Renderer + ?Sized,
    {
        // Any load still in flight was started for the previous view.
        self.generation += 1;
        self.pending_reset = false;

        let selected_type = selected_type.filter(|t| !t.is_empty());
        let mut view: Vec<&Job> = self
            .displayed_jobs
            .iter()
            .filter(|job| selected_type.map_or(true, |t| job.job_type == t))
            .collect();

        if sort_mode == SortMode::Latest {
            view.sort_by(|a, b| latest_first(a, b));
        }

        renderer.clear();
        let shown = view.len().min(self.page_size);
        for job in &view[..shown] {
            renderer.render(job);
        }

        tracing::debug!(
            job_type = selected_type.unwrap_or(""),
            sort = ?sort_mode,
            shown,
            "applied local filter"
        );
        shown
    }
}

/// The paging loop. Always starts at upstream page 1 and walks forward
/// until a display page of matches is collected or the upstream runs dry.
/// A failed page counts as an empty one.
pub fn collect_matches<C>(client: &C, ticket: &LoadTicket) -> Batch
where
    C: JobSearchClient + ?Sized,
{
    let mut matches: Vec<Job> = Vec::new();
    let mut batch_ids: HashSet<String> = HashSet::new();
    let mut page: u32 = 1;
    let mut pages_fetched = 0;
    let mut upstream_failures = 0;

    while matches.len() < ticket.page_size {
        if let Some(max) = ticket.max_upstream_pages {
            if pages_fetched >= max {
                tracing::debug!(max, "upstream page cap reached");
                break;
            }
        }

        let jobs = match client.fetch_page(page, &ticket.query) {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::warn!(page, query = %ticket.query, error = %e, "upstream page failed");
                upstream_failures += 1;
                Vec::new()
            }
        };
        pages_fetched += 1;

        if jobs.is_empty() {
            break;
        }

        for job in jobs {
            if ticket.seen.contains(&job.id) || !matches_query(&job, &ticket.query) {
                continue;
            }
            if batch_ids.insert(job.id.clone()) {
                matches.push(job);
            }
        }

        page += 1;
    }

    matches.truncate(ticket.page_size);

    tracing::info!(
        query = %ticket.query,
        pages = pages_fetched,
        matched = matches.len(),
        failures = upstream_failures,
        "collected jobs"
    );

    Batch {
        generation: ticket.generation,
        reset: ticket.reset,
        jobs: matches,
        pages_fetched,
        upstream_failures,
    }
}
