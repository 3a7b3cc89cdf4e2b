use crate::domain::{parse_posted, Job, DEFAULT_JOB_TYPE};
use serde::Deserialize;

// response
//  └── results[]
//       ├── id
//       ├── title
//       ├── company
//       │    └── display_name
//       ├── location
//       │    └── display_name
//       ├── contract_type   (optional)
//       └── created

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<RawJob>,
}

#[derive(Debug, Deserialize)]
pub struct RawJob {
    pub id: RawId,
    pub title: String,
    pub company: DisplayName,
    pub location: DisplayName,
    pub contract_type: Option<String>,
    pub created: Option<String>,
}

/// Listing ids arrive as strings, but some endpoints send bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
pub struct DisplayName {
    pub display_name: String,
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

impl From<RawJob> for Job {
    fn from(raw: RawJob) -> Self {
        let job_type = raw
            .contract_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string());

        Job {
            id: raw.id.into_string(),
            title: raw.title,
            company: raw.company.display_name,
            location: raw.location.display_name,
            job_type,
            posted: raw.created.as_deref().and_then(parse_posted),
        }
    }
}
