use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use maud::Markup;

/// How htmx should place a fragment, sent as `HX-Reswap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swap {
    Replace,
    Append,
    Nothing,
}

impl Swap {
    pub fn as_header(self) -> &'static str {
        match self {
            Swap::Replace => "innerHTML",
            Swap::Append => "beforeend",
            Swap::Nothing => "none",
        }
    }
}

pub fn html_response(markup: Markup) -> ResultResp {
    html_builder(200)
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

pub fn fragment_response(markup: Markup, swap: Swap) -> ResultResp {
    html_builder(200)
        .header("HX-Reswap", swap.as_header())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

pub fn text_response(text: &'static str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_PLAIN_UTF_8.as_ref())
        .body(Body::from(text))
        .map_err(|_| ServerError::InternalError)
}

pub(crate) fn html_builder(status: u16) -> astra::ResponseBuilder {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
}
