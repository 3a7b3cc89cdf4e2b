pub mod card;
pub mod error;
pub mod job_list;

pub use card::job_card;
pub use error::error_page;
pub use job_list::CardBuffer;
