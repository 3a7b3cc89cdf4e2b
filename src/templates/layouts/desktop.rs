use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {}
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  h3 { a href="/" { "Job Feed" } }
                  span
                      id="location"
                      class="location"
                      hx-get="/location"
                      hx-trigger="load"
                      hx-swap="innerHTML"
                  { "Locating…" }
              }
                (content)
            }
        }
    }
}
