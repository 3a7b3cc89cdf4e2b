use crate::conf::Settings;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";
pub const LOCATION_FAILED: &str = "Unable to retrieve location";

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response shape: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

pub trait GeoLocator: Send + Sync {
    fn locate(&self, client_ip: Option<IpAddr>) -> Result<GeoLocation, GeoError>;
}

pub struct IpApiLocator {
    client: Client,
    base_url: String,
}

impl IpApiLocator {
    pub fn new(settings: &Settings) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.geo_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Private and loopback peers can't be looked up, so those fall back to
    /// the endpoint that locates the caller, i.e. this server.
    fn lookup_url(&self, client_ip: Option<IpAddr>) -> String {
        match client_ip.filter(is_public) {
            Some(ip) => format!("{}/{ip}/json/", self.base_url),
            None => format!("{}/json/", self.base_url),
        }
    }
}

impl GeoLocator for IpApiLocator {
    fn locate(&self, client_ip: Option<IpAddr>) -> Result<GeoLocation, GeoError> {
        let resp = self
            .client
            .get(self.lookup_url(client_ip))
            .send()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeoError::Network(format!("HTTP {}", resp.status())));
        }

        resp.json::<GeoLocation>()
            .map_err(|e| GeoError::Parse(e.to_string()))
    }
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}

/// Text for the location label.
pub fn location_label(result: &Result<GeoLocation, GeoError>) -> String {
    let loc = match result {
        Ok(loc) => loc,
        Err(_) => return LOCATION_FAILED.to_string(),
    };

    match (present(&loc.city), present(&loc.country)) {
        (Some(_), Some(country)) => match present(&loc.region) {
            Some(region) => format!("{region}, {country}"),
            None => country.to_string(),
        },
        _ => LOCATION_UNAVAILABLE.to_string(),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
