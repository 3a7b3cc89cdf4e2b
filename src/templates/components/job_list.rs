use crate::domain::Job;
use crate::feed::Renderer;
use crate::templates::components::job_card;
use maud::{html, Markup};

/// Collects the cards one request produces. `cleared` tells the handler
/// whether the fragment replaces the list or is appended to it.
#[derive(Default)]
pub struct CardBuffer {
    cleared: bool,
    cards: Vec<Markup>,
}

impl CardBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleared(&self) -> bool {
        self.cleared
    }

    /// The cards as one fragment. A cleared, empty list gets the empty
    /// state notice instead.
    pub fn into_markup(self) -> Markup {
        html! {
            @if self.cleared && self.cards.is_empty() {
                p class="empty-state" { "No jobs found" }
            }
            @for card in &self.cards {
                (card)
            }
        }
    }
}

impl Renderer for CardBuffer {
    fn clear(&mut self) {
        self.cleared = true;
        self.cards.clear();
    }

    fn render(&mut self, job: &Job) {
        self.cards.push(job_card(job));
    }
}
