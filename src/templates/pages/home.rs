// templates/pages/home.rs

use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct HomeVm {
    pub query: String,
    pub type_options: Vec<String>,
    /// Cards from the initial load.
    pub listings: Markup,
}

pub fn home_page(vm: &HomeVm) -> Markup {
    desktop_layout(
        "Jobs",
        html! {
            main class="container" {
                form
                    id="controls"
                    class="controls"
                    hx-get="/jobs"
                    hx-target="#job-listings"
                    hx-trigger="submit, input delay:300ms from:#search, change from:select"
                {
                    input
                        type="search"
                        id="search"
                        name="q"
                        placeholder="Search title, company, location…"
                        value=(vm.query)
                        autocomplete="off";

                    (filter_select(&vm.type_options))

                    select id="sort" name="sort" {
                        option value="" { "Sort: default" }
                        option value="latest" { "Sort: latest" }
                    }
                }

                div id="job-listings" class="job-listings" {
                    (vm.listings)
                }

                button
                    id="show-more"
                    type="button"
                    hx-get="/jobs/more"
                    hx-target="#job-listings"
                    hx-swap="beforeend"
                { "Show more" }
            }
        },
    )
}

pub fn filter_select(type_options: &[String]) -> Markup {
    html! {
        select id="filter-type" name="type" {
            option value="" { "All types" }
            @for t in type_options {
                option value=(t) { (t) }
            }
        }
    }
}
