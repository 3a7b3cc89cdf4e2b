pub mod errors;
pub mod html;

pub use errors::html_error_response;
pub use html::{fragment_response, html_response, text_response, Swap};
