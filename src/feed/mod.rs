pub mod controller;
mod shared;

pub use controller::JobFeedController;
pub use shared::SharedFeed;

use crate::domain::Job;

/// Jobs shown per display page.
pub const PAGE_SIZE: usize = 10;

/// The list view the controller draws into.
pub trait Renderer {
    /// Removes every card from the list.
    fn clear(&mut self);
    /// Appends one card.
    fn render(&mut self, job: &Job);
}
