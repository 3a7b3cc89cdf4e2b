use crate::errors::ServerError;
use config::{Config, Environment};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub listen_addr: String,
    pub max_workers: usize,
    //upstream search
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,
    pub adzuna_country: String,
    pub search_base_url: String,
    pub results_per_page: u32,
    //feed
    pub page_size: usize,
    pub max_upstream_pages: Option<u32>,
    pub session_idle_secs: i64,
    //geolocation
    pub geo_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            adzuna_app_id: String::new(),
            adzuna_app_key: String::new(),
            adzuna_country: "us".to_string(),
            search_base_url: "https://api.adzuna.com/v1/api/jobs".to_string(),
            results_per_page: 50,
            page_size: crate::feed::PAGE_SIZE,
            max_upstream_pages: None,
            session_idle_secs: 60 * 60,
            geo_base_url: "https://ipapi.co".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Reads `JOBFEED_*` environment variables on top of the defaults.
    /// Upstream credentials have no default and must be supplied.
    pub fn new() -> Result<Self, ServerError> {
        let d = Settings::default();
        let conf = Config::builder()
            .set_default("listen_addr", d.listen_addr)?
            .set_default("max_workers", d.max_workers as u64)?
            .set_default("adzuna_app_id", d.adzuna_app_id)?
            .set_default("adzuna_app_key", d.adzuna_app_key)?
            .set_default("adzuna_country", d.adzuna_country)?
            .set_default("search_base_url", d.search_base_url)?
            .set_default("results_per_page", d.results_per_page as u64)?
            .set_default("page_size", d.page_size as u64)?
            .set_default("session_idle_secs", d.session_idle_secs)?
            .set_default("geo_base_url", d.geo_base_url)?
            .set_default("request_timeout_secs", d.request_timeout_secs)?
            .add_source(Environment::with_prefix("JOBFEED"))
            .build()?;
        let s: Settings = conf.try_deserialize()?;
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.adzuna_app_id.trim().is_empty() || self.adzuna_app_key.trim().is_empty() {
            return Err(ServerError::Config(
                "JOBFEED_ADZUNA_APP_ID and JOBFEED_ADZUNA_APP_KEY must be set".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(ServerError::Config("page_size must be at least 1".into()));
        }
        if self.results_per_page == 0 {
            return Err(ServerError::Config(
                "results_per_page must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
