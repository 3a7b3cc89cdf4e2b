use crate::conf::Settings;
use crate::errors::ServerError;
use crate::geo::{GeoLocator, IpApiLocator};
use crate::search::{AdzunaClient, JobSearchClient};
use crate::sessions::SessionStore;
use std::net::SocketAddr;

/// Everything a request handler needs, shared across astra workers.
pub struct App {
    pub search: Box<dyn JobSearchClient>,
    pub geo: Box<dyn GeoLocator>,
    pub sessions: SessionStore,
}

/// Remote address of the connection, stored in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct PeerAddr(pub SocketAddr);

impl App {
    pub fn new(
        settings: &Settings,
        search: Box<dyn JobSearchClient>,
        geo: Box<dyn GeoLocator>,
    ) -> Self {
        let sessions = SessionStore::new(
            settings.session_idle_secs,
            settings.page_size,
            settings.max_upstream_pages,
        );

        Self {
            search,
            geo,
            sessions,
        }
    }

    /// Wires up the real upstream clients.
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let search = AdzunaClient::new(&settings)
            .map_err(|e| ServerError::Config(format!("search client: {e}")))?;
        let geo = IpApiLocator::new(&settings)
            .map_err(|e| ServerError::Config(format!("geo client: {e}")))?;

        Ok(Self::new(&settings, Box::new(search), Box::new(geo)))
    }
}
