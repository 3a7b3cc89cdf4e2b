// src/domain/logic.rs

use crate::domain::Job;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;

/// Case-insensitive substring match against title, company, location or
/// type. `query` must already be lowercase; an empty query matches all.
pub fn matches_query(job: &Job, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    [&job.title, &job.company, &job.location, &job.job_type]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

/// Parses the upstream `created` field. Accepts RFC 3339 and the zone-less
/// `2024-01-15T10:23:45` form, which is taken as UTC.
pub fn parse_posted(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Newest first. Undated jobs go last and keep their relative order.
pub fn latest_first(a: &Job, b: &Job) -> Ordering {
    match (a.posted, b.posted) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
