// src/sessions/store.rs
use crate::feed::{JobFeedController, SharedFeed};
use crate::sessions::token::{generate_token_default, hash_token};
use parking_lot::Mutex;
use std::collections::HashMap;

pub const SESSION_COOKIE: &str = "jobfeed_session";

struct Entry {
    feed: SharedFeed,
    last_seen: i64,
}

/// In-memory feed sessions, one per browser. Nothing survives a restart.
pub struct SessionStore {
    sessions: Mutex<HashMap<[u8; 32], Entry>>,
    idle_secs: i64,
    page_size: usize,
    max_upstream_pages: Option<u32>,
}

/// The feed for a request, plus the token to hand back when a new session
/// had to be created.
pub struct SessionLookup {
    pub feed: SharedFeed,
    pub new_token: Option<String>,
}

impl SessionStore {
    pub fn new(idle_secs: i64, page_size: usize, max_upstream_pages: Option<u32>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_secs,
            page_size,
            max_upstream_pages,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn get(&self, token: &str, now: i64) -> Option<SharedFeed> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(&hash_token(token))?;
        if now - entry.last_seen > self.idle_secs {
            return None;
        }
        entry.last_seen = now;
        Some(entry.feed.clone())
    }

    /// Starts a new session, evicting idle ones first.
    pub fn create(&self, now: i64) -> (String, SharedFeed) {
        let token = generate_token_default();
        let feed = SharedFeed::new(JobFeedController::new(
            self.page_size,
            self.max_upstream_pages,
        ));

        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, e| now - e.last_seen <= self.idle_secs);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle sessions");
        }

        sessions.insert(
            hash_token(&token),
            Entry {
                feed: feed.clone(),
                last_seen: now,
            },
        );

        (token, feed)
    }

    pub fn get_or_create(&self, token: Option<&str>, now: i64) -> SessionLookup {
        if let Some(feed) = token.and_then(|t| self.get(t, now)) {
            return SessionLookup {
                feed,
                new_token: None,
            };
        }

        let (token, feed) = self.create(now);
        SessionLookup {
            feed,
            new_token: Some(token),
        }
    }
}
