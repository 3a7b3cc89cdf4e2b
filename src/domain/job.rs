// src/domain/job.rs

use chrono::{DateTime, Utc};

/// Shown when the upstream listing carries no contract type.
pub const DEFAULT_JOB_TYPE: &str = "Full-time";

/// A single listing as the feed sees it, already flattened from the
/// upstream schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Opaque upstream id. Unique within one feed session.
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    /// `None` when the upstream date could not be parsed.
    pub posted: Option<DateTime<Utc>>,
}

/// How the local (no-query) view orders jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    None,
    Latest,
}

impl SortMode {
    /// Form value from the sort select. Empty keeps the display order;
    /// values the select never sends are `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim() {
            "" => Some(SortMode::None),
            "latest" => Some(SortMode::Latest),
            _ => None,
        }
    }
}
