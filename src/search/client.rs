// client.rs
use crate::conf::Settings;
use crate::domain::Job;
use crate::search::models::SearchResponse;
use crate::search::{JobSearchClient, SearchError};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("jobfeed/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the Adzuna job search API. Holds the credentials so
/// they never reach the browser.
pub struct AdzunaClient {
    client: Client,
    base_url: String,
    country: String,
    app_id: String,
    app_key: String,
    results_per_page: u32,
}

impl AdzunaClient {
    pub fn new(settings: &Settings) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.search_base_url.trim_end_matches('/').to_string(),
            country: settings.adzuna_country.clone(),
            app_id: settings.adzuna_app_id.clone(),
            app_key: settings.adzuna_app_key.clone(),
            results_per_page: settings.results_per_page,
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/{}/search/{page}", self.base_url, self.country)
    }
}

impl JobSearchClient for AdzunaClient {
    fn fetch_page(&self, page: u32, query: &str) -> Result<Vec<Job>, SearchError> {
        let start = Instant::now();
        let results_per_page = self.results_per_page.to_string();

        let params = [
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
            ("results_per_page", results_per_page.as_str()),
            ("what", query),
            ("content-type", "application/json"),
        ];

        let resp = self
            .client
            .get(self.page_url(page))
            .query(&params)
            .send()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let text = resp
            .text()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let jobs = parse_results(&text)?;

        tracing::debug!(
            page,
            query,
            count = jobs.len(),
            elapsed = ?start.elapsed(),
            "fetched upstream page"
        );

        Ok(jobs)
    }
}

/// Maps a search response body onto jobs.
pub fn parse_results(body: &str) -> Result<Vec<Job>, SearchError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;

    Ok(parsed.results.into_iter().map(Job::from).collect())
}
