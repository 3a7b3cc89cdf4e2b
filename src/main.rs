use crate::app::{App, PeerAddr};
use crate::conf::Settings;
use crate::router::handle;
use astra::{ConnectionInfo, Request, Server};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

mod app;
mod conf;
mod domain;
mod errors;
mod feed;
mod geo;
mod responses;
mod router;
mod search;
mod sessions;
mod templates;


fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(addr = %settings.listen_addr, error = %e, "invalid listen address");
            std::process::exit(1);
        }
    };
    let max_workers = settings.max_workers;

    let app = match App::from_settings(settings) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(max_workers);

    let result = server.serve(move |mut req: Request, info: ConnectionInfo| {
        if let Some(peer) = info.peer_addr() {
            req.extensions_mut().insert(PeerAddr(peer));
        }
        match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => responses::html_error_response(err),
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}
