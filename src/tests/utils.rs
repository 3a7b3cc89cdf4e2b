use crate::app::App;
use crate::conf::Settings;
use crate::domain::{parse_posted, Job};
use crate::feed::Renderer;
use crate::geo::locator::{GeoError, GeoLocation};
use crate::geo::GeoLocator;
use crate::search::{JobSearchClient, SearchError};
use astra::Response;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io::Read;
use std::net::IpAddr;
use std::sync::Arc;

pub fn job(id: &str, title: &str, company: &str, location: &str, job_type: &str) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        job_type: job_type.to_string(),
        posted: None,
    }
}

pub fn dated(mut j: Job, created: &str) -> Job {
    j.posted = parse_posted(created);
    j
}

/// `n` generic jobs with ids `{prefix}-0..n`.
pub fn jobs(prefix: &str, n: usize) -> Vec<Job> {
    (0..n)
        .map(|i| {
            job(
                &format!("{prefix}-{i}"),
                &format!("Engineer {i}"),
                "Acme",
                "Denver, CO",
                "Full-time",
            )
        })
        .collect()
}

/// Serves fixed pages, ignoring the query text like a permissive upstream.
/// Pages past the end are empty.
#[derive(Clone, Default)]
pub struct FakeSearch {
    pages: Vec<Vec<Job>>,
    failing: HashSet<u32>,
    calls: Arc<Mutex<Vec<(u32, String)>>>,
    on_fetch: Option<Arc<dyn Fn(u32) + Send + Sync>>,
}

impl FakeSearch {
    pub fn with_pages(pages: Vec<Vec<Job>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }

    /// Runs `hook` inside every fetch, before the page is returned.
    pub fn on_fetch(mut self, hook: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_fetch = Some(Arc::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<(u32, String)> {
        self.calls.lock().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls.lock().iter().map(|(p, _)| *p).collect()
    }
}

impl JobSearchClient for FakeSearch {
    fn fetch_page(&self, page: u32, query: &str) -> Result<Vec<Job>, SearchError> {
        self.calls.lock().push((page, query.to_string()));
        if let Some(hook) = &self.on_fetch {
            hook(page);
        }
        if self.failing.contains(&page) {
            return Err(SearchError::Network("connection refused".into()));
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

pub struct FakeGeo {
    pub result: Option<GeoLocation>,
    pub seen_ip: Arc<Mutex<Option<IpAddr>>>,
}

impl FakeGeo {
    pub fn at(city: &str, region: &str, country: &str) -> Self {
        Self {
            result: Some(GeoLocation {
                city: Some(city.to_string()),
                region: Some(region.to_string()),
                country: Some(country.to_string()),
            }),
            seen_ip: Arc::new(Mutex::new(None)),
        }
    }

    pub fn down() -> Self {
        Self {
            result: None,
            seen_ip: Arc::new(Mutex::new(None)),
        }
    }
}

impl GeoLocator for FakeGeo {
    fn locate(&self, client_ip: Option<IpAddr>) -> Result<GeoLocation, GeoError> {
        *self.seen_ip.lock() = client_ip;
        self.result
            .clone()
            .ok_or_else(|| GeoError::Network("timed out".into()))
    }
}

/// Records what the controller drew.
#[derive(Default)]
pub struct RecordingRenderer {
    pub clears: usize,
    pub visible: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.clears += 1;
        self.visible.clear();
    }

    fn render(&mut self, job: &Job) {
        self.visible.push(job.id.clone());
    }
}

pub fn test_settings() -> Settings {
    Settings {
        adzuna_app_id: "test-id".into(),
        adzuna_app_key: "test-key".into(),
        ..Settings::default()
    }
}

pub fn test_app(search: FakeSearch, geo: FakeGeo) -> App {
    App::new(&test_settings(), Box::new(search), Box::new(geo))
}

pub fn read_body(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .expect("body is utf-8");
    body
}
