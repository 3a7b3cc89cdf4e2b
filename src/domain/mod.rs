pub mod job;
pub mod logic;

pub use job::{Job, SortMode, DEFAULT_JOB_TYPE};
pub use logic::{latest_first, matches_query, parse_posted};
