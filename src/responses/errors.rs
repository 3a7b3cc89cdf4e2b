use crate::errors::ServerError;
use crate::responses::html::html_builder;
use crate::templates::error_page;
use astra::{Body, Response};

/// Convert a ServerError into a proper HTML response page
pub fn html_error_response(err: ServerError) -> Response {
    let status = match &err {
        ServerError::NotFound => 404,
        ServerError::BadRequest(_) => 400,
        ServerError::Config(_) | ServerError::InternalError => 500,
    };

    if status == 500 {
        tracing::error!(error = %err, "request failed");
    }

    let message = match &err {
        ServerError::BadRequest(msg) => msg.clone(),
        other => other.to_string(),
    };

    html_builder(status)
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
