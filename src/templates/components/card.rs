use crate::domain::Job;
use maud::{html, Markup};
use rand::seq::SliceRandom;

pub const LIGHT_COLORS: [&str; 7] = [
    "#D0D4FF", "#FFD0D0", "#FFE0D0", "#FBFFD0", "#D0FFD8", "#D0FDFF", "#DBD0FF",
];

/// Decorative card background, picked uniformly at random.
pub fn random_light_color() -> &'static str {
    LIGHT_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(LIGHT_COLORS[0])
}

/// `M/D/YYYY`, empty when the upstream date was unusable.
pub fn posted_date(job: &Job) -> String {
    job.posted
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

pub fn job_card(job: &Job) -> Markup {
    html! {
        div class="job-card" data-job-id=(job.id) {
            div class="inner-job-tag" style=(format!("background-color: {};", random_light_color())) {
                div class="save-button" { i class="fa fa-bookmark-o" {} }
                p class="posted-date" { (posted_date(job)) }
                p class="company" { (job.company) }
                h3 { (job.title) }
                p class="job-type" { (job.job_type) }
            }
            p class="job-location" { (job.location) }
        }
    }
}
