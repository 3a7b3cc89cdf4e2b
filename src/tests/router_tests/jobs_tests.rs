use crate::domain::SortMode;
use crate::errors::ServerError;
use crate::feed::SharedFeed;
use crate::router::handle;
use crate::sessions::SESSION_COOKIE;
use crate::tests::utils::{job, jobs, read_body, test_app, FakeGeo, FakeSearch, RecordingRenderer};
use astra::{Body, Request, Response};
use http::Method;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn get(uri: &str, session: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("theme=dark; {SESSION_COOKIE}={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn session_token(resp: &Response) -> String {
    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .expect("session cookie set")
        .to_str()
        .unwrap();
    cookie
        .split(';')
        .next()
        .and_then(|kv| kv.strip_prefix(&format!("{SESSION_COOKIE}=")))
        .expect("cookie starts with the session token")
        .to_string()
}

/// Lets a test reach into a session from inside an upstream fetch, the way
/// a second tab on the same session would. The hook fires once per arming.
#[derive(Clone, Default)]
struct Interloper {
    feed: Arc<Mutex<Option<SharedFeed>>>,
    armed: Arc<AtomicBool>,
}

impl Interloper {
    fn attach(&self, app: &crate::app::App, token: &str) {
        *self.feed.lock() = app.sessions.get(token, chrono::Utc::now().timestamp());
        assert!(self.feed.lock().is_some(), "session exists");
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn fire(&self, action: impl FnOnce(&SharedFeed)) {
        if self.armed.swap(false, Ordering::SeqCst) {
            if let Some(feed) = self.feed.lock().as_ref() {
                action(feed);
            }
        }
    }
}

fn reswap(resp: &Response) -> &str {
    resp.headers()
        .get("HX-Reswap")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[test]
fn home_page_renders_first_page_and_sets_session() {
    let app = test_app(FakeSearch::with_pages(vec![jobs("a", 50)]), FakeGeo::down());

    let resp = handle(get("/", None), &app).expect("handler failed");

    assert_eq!(resp.status(), 200);
    let token = session_token(&resp);
    assert_eq!(token.len(), 43);

    let body = read_body(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert_eq!(body.matches("class=\"job-card\"").count(), 10);
    assert!(body.contains("id=\"show-more\""));
    assert!(body.contains("hx-get=\"/location\""));
    assert_eq!(app.sessions.len(), 1);
}

#[test]
fn known_session_is_reused() {
    let app = test_app(FakeSearch::with_pages(vec![jobs("a", 50)]), FakeGeo::down());

    let first = handle(get("/", None), &app).unwrap();
    let token = session_token(&first);

    let second = handle(get("/jobs/more", Some(&token)), &app).unwrap();

    assert!(second.headers().get("Set-Cookie").is_none());
    assert_eq!(app.sessions.len(), 1);
    assert_eq!(reswap(&second), "beforeend");
    let body = read_body(second);
    assert_eq!(body.matches("class=\"job-card\"").count(), 10);
    assert!(body.contains("data-job-id=\"a-10\""));
    assert!(!body.contains("data-job-id=\"a-0\""));
}

#[test]
fn unknown_session_token_gets_a_new_session() {
    let app = test_app(FakeSearch::with_pages(vec![jobs("a", 5)]), FakeGeo::down());

    let resp = handle(get("/jobs/more", Some("forged")), &app).unwrap();

    assert!(resp.headers().get("Set-Cookie").is_some());
}

#[test]
fn search_query_replaces_the_list() {
    let search = FakeSearch::with_pages(vec![vec![
        job("1", "Rust Engineer", "Acme", "Austin, TX", "Full-time"),
        job("2", "Chef", "Bistro", "Austin, TX", "Part-time"),
    ]]);
    let app = test_app(search.clone(), FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());

    let resp = handle(get("/jobs?q=RUST&type=&sort=", Some(&token)), &app).unwrap();

    assert_eq!(reswap(&resp), "innerHTML");
    let body = read_body(resp);
    assert!(body.contains("Rust Engineer"));
    assert!(!body.contains("Chef"));
    assert!(!body.contains("<html"));
    assert_eq!(search.calls().last().map(|c| c.1.clone()), Some("rust".to_string()));
}

#[test]
fn empty_query_filters_locally() {
    let search = FakeSearch::with_pages(vec![vec![
        job("1", "Rust Engineer", "Acme", "Austin, TX", "Full-time"),
        job("2", "Chef", "Bistro", "Austin, TX", "Part-time"),
    ]]);
    let app = test_app(search.clone(), FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());
    let calls_before = search.calls().len();

    let resp = handle(get("/jobs?q=&type=Part-time&sort=latest", Some(&token)), &app).unwrap();

    assert_eq!(reswap(&resp), "innerHTML");
    let body = read_body(resp);
    assert!(body.contains("Chef"));
    assert!(!body.contains("Rust Engineer"));
    assert_eq!(search.calls().len(), calls_before);
}

#[test]
fn no_matches_shows_empty_state() {
    let app = test_app(FakeSearch::with_pages(vec![jobs("a", 3)]), FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());

    let resp = handle(get("/jobs?q=astronaut", Some(&token)), &app).unwrap();

    assert!(read_body(resp).contains("No jobs found"));
}

#[test]
fn upstream_outage_renders_empty_page_not_error() {
    let app = test_app(FakeSearch::default().failing_on(1), FakeGeo::down());

    let resp = handle(get("/", None), &app).unwrap();

    assert_eq!(resp.status(), 200);
    let body = read_body(resp);
    assert!(body.contains("No jobs found"));
    assert!(!body.contains("class=\"job-card\""));
}

#[test]
fn card_escapes_upstream_text() {
    let search = FakeSearch::with_pages(vec![vec![job(
        "x",
        "<script>alert(1)</script>",
        "Acme & Sons",
        "Remote",
        "Full-time",
    )]]);
    let app = test_app(search, FakeGeo::down());

    let body = read_body(handle(get("/", None), &app).unwrap());

    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
    assert!(body.contains("Acme &amp; Sons"));
}

#[test]
fn healthz_is_ok() {
    let app = test_app(FakeSearch::default(), FakeGeo::down());
    let resp = handle(get("/healthz", None), &app).unwrap();
    assert_eq!(read_body(resp), "ok");
}

#[test]
fn unknown_route_is_not_found() {
    let app = test_app(FakeSearch::default(), FakeGeo::down());
    let err = match handle(get("/admin", None), &app) {
        Ok(_) => panic!("expected an error"),
        Err(e) => e,
    };
    assert!(matches!(err, crate::errors::ServerError::NotFound));

    let resp = crate::responses::html_error_response(err);
    assert_eq!(resp.status(), 404);
}

#[test]
fn home_honours_query_param() {
    let search = FakeSearch::with_pages(vec![vec![
        job("1", "Rust Engineer", "Acme", "Austin, TX", "Full-time"),
        job("2", "Chef", "Bistro", "Austin, TX", "Part-time"),
    ]]);
    let app = test_app(search.clone(), FakeGeo::down());

    let body = read_body(handle(get("/?q=Rust", None), &app).unwrap());

    assert!(body.contains("Rust Engineer"));
    assert!(!body.contains("Chef"));
    assert!(body.contains("value=\"rust\""));
    assert_eq!(search.calls()[0], (1, "rust".to_string()));
}

#[test]
fn controls_form_handles_submit() {
    let app = test_app(FakeSearch::default(), FakeGeo::down());

    let body = read_body(handle(get("/", None), &app).unwrap());

    assert!(body.contains("hx-trigger=\"submit, "));
}

#[test]
fn unknown_sort_is_a_bad_request() {
    let app = test_app(FakeSearch::with_pages(vec![jobs("a", 3)]), FakeGeo::down());

    let err = match handle(get("/jobs?q=&sort=oldest", None), &app) {
        Ok(_) => panic!("expected an error"),
        Err(e) => e,
    };
    assert!(matches!(err, ServerError::BadRequest(_)));

    let resp = crate::responses::html_error_response(err);
    assert_eq!(resp.status(), 400);
}

#[test]
fn superseded_load_more_leaves_the_list_alone() {
    let interloper = Interloper::default();
    let search = {
        let interloper = interloper.clone();
        FakeSearch::with_pages(vec![jobs("a", 30)]).on_fetch(move |_| {
            interloper.fire(|feed| {
                feed.lock()
                    .apply_local_filter(&mut RecordingRenderer::default(), None, SortMode::None);
            });
        })
    };
    let app = test_app(search, FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());
    interloper.attach(&app, &token);

    interloper.arm();
    let resp = handle(get("/jobs/more", Some(&token)), &app).unwrap();

    assert_eq!(reswap(&resp), "none");
    assert!(!read_body(resp).contains("job-card"));
    let feed = app.sessions.get(&token, chrono::Utc::now().timestamp()).unwrap();
    assert_eq!(feed.lock().displayed_jobs().len(), 10);
}

#[test]
fn superseded_search_leaves_the_list_alone() {
    let interloper = Interloper::default();
    let search = {
        let interloper = interloper.clone();
        FakeSearch::with_pages(vec![jobs("a", 30)]).on_fetch(move |_| {
            interloper.fire(|feed| {
                feed.lock()
                    .apply_local_filter(&mut RecordingRenderer::default(), None, SortMode::None);
            });
        })
    };
    let app = test_app(search, FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());
    interloper.attach(&app, &token);

    interloper.arm();
    let resp = handle(get("/jobs?q=engineer", Some(&token)), &app).unwrap();

    assert_eq!(reswap(&resp), "none");
    assert!(read_body(resp).is_empty());
}

#[test]
fn superseded_home_shows_what_the_newer_load_displayed() {
    let interloper = Interloper::default();
    let search = {
        let interloper = interloper.clone();
        FakeSearch::with_pages(vec![jobs("a", 30)]).on_fetch(move |_| {
            interloper.fire(|feed| {
                let other_tab = FakeSearch::with_pages(vec![jobs("b", 3)]);
                feed.load_jobs(&other_tab, &mut RecordingRenderer::default(), "", false);
            });
        })
    };
    let app = test_app(search, FakeGeo::down());
    let token = session_token(&handle(get("/", None), &app).unwrap());
    interloper.attach(&app, &token);

    interloper.arm();
    let resp = handle(get("/", Some(&token)), &app).unwrap();

    assert_eq!(resp.status(), 200);
    let body = read_body(resp);
    assert_eq!(body.matches("class=\"job-card\"").count(), 3);
    assert!(body.contains("data-job-id=\"b-0\""));
    assert!(!body.contains("data-job-id=\"a-0\""));
}
