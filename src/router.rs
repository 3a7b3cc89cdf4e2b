use crate::app::{App, PeerAddr};
use crate::domain::SortMode;
use crate::errors::{ResultResp, ServerError};
use crate::feed::Renderer;
use crate::geo::location_label;
use crate::responses::{fragment_response, html_response, text_response, Swap};
use crate::sessions::{SessionLookup, SESSION_COOKIE};
use crate::templates::pages::{home_page, HomeVm};
use crate::templates::CardBuffer;
use astra::{Request, Response};
use maud::html;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => home(&req, app),
        ("GET", "/jobs") => filter_jobs(&req, app),
        ("GET", "/jobs/more") => more_jobs(&req, app),
        ("GET", "/location") => location(&req, app),
        ("GET", "/healthz") => text_response("ok"),
        _ => Err(ServerError::NotFound),
    }
}

/// Full page. Like a reload of the original page, this starts a fresh
/// search, unfiltered unless the URL carries `q`.
fn home(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    let raw_query = params.get("q").map(String::as_str).unwrap_or("");

    let session = session_for(req, app);
    let mut cards = CardBuffer::new();
    let outcome = session
        .feed
        .load_jobs(app.search.as_ref(), &mut cards, raw_query, false);

    let vm = {
        let feed = session.feed.lock();

        // Another tab on the same session got in first; show what it loaded.
        if outcome.stale {
            cards.clear();
            for job in feed.displayed_jobs().iter().take(feed.page_size()) {
                cards.render(job);
            }
        }

        HomeVm {
            query: feed.search_query().to_string(),
            type_options: feed.type_options(),
            listings: cards.into_markup(),
        }
    };

    let resp = html_response(home_page(&vm))?;
    with_session_cookie(resp, &session)
}

/// Search box, type filter and sort select all land here.
fn filter_jobs(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    let raw_query = params.get("q").map(String::as_str).unwrap_or("");
    let selected_type = params
        .get("type")
        .map(String::as_str)
        .filter(|t| !t.is_empty());
    let raw_sort = params.get("sort").map(String::as_str).unwrap_or("");
    let sort_mode = SortMode::from_param(raw_sort)
        .ok_or_else(|| ServerError::BadRequest(format!("unknown sort `{raw_sort}`")))?;

    let session = session_for(req, app);
    let mut cards = CardBuffer::new();

    let outcome = session.feed.apply_filter_and_sort(
        app.search.as_ref(),
        &mut cards,
        raw_query,
        selected_type,
        sort_mode,
    );
    tracing::debug!(rendered = outcome.rendered(), stale = outcome.is_stale(), "filter applied");

    cards_response(cards, outcome.is_stale(), &session)
}

fn more_jobs(req: &Request, app: &App) -> ResultResp {
    let session = session_for(req, app);
    let mut cards = CardBuffer::new();

    let outcome = session.feed.load_more(app.search.as_ref(), &mut cards);
    cards_response(cards, outcome.stale, &session)
}

fn location(req: &Request, app: &App) -> ResultResp {
    let result = app.geo.locate(client_ip(req));
    if let Err(e) = &result {
        tracing::warn!(error = %e, "geolocation failed");
    }

    fragment_response(html! { (location_label(&result)) }, Swap::Replace)
}

/// A superseded load tells htmx to leave the list alone.
fn cards_response(cards: CardBuffer, stale: bool, session: &SessionLookup) -> ResultResp {
    let resp = if stale {
        fragment_response(html! {}, Swap::Nothing)?
    } else if cards.cleared() {
        fragment_response(cards.into_markup(), Swap::Replace)?
    } else {
        fragment_response(cards.into_markup(), Swap::Append)?
    };

    with_session_cookie(resp, session)
}

fn session_for(req: &Request, app: &App) -> SessionLookup {
    let token = cookie_value(req, SESSION_COOKIE);
    let lookup = app.sessions.get_or_create(token.as_deref(), now_unix());
    if lookup.new_token.is_some() {
        tracing::debug!(sessions = app.sessions.len(), "started feed session");
    }
    lookup
}

fn with_session_cookie(mut resp: Response, session: &SessionLookup) -> ResultResp {
    if let Some(token) = &session.new_token {
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        resp.headers_mut().insert(
            "Set-Cookie",
            cookie.parse().map_err(|_| ServerError::InternalError)?,
        );
    }
    Ok(resp)
}

fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

/// First `X-Forwarded-For` hop when behind a proxy, else the peer address.
fn client_ip(req: &Request) -> Option<IpAddr> {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    forwarded.or_else(|| req.extensions().get::<PeerAddr>().map(|p| p.0.ip()))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
