use std::error::Error as StdError;

use serde::Serialize;
use tracing::error;

use crate::response::Response;
use crate::status::{self, Status};

/// Logs `err` and answers with a generic `500`.
pub fn server_error(err: impl StdError) -> Response {
    error!(error = %err, "server error");
    client_error(Status::InternalServerError)
}

/// A plain-text response carrying the status' reason phrase.
pub fn client_error(status: Status) -> Response {
    Response::builder().status(status).text(status::reason(status.code()))
}

pub fn not_found() -> Response {
    client_error(Status::NotFound)
}

/// Serializes `value` as the JSON body of a `status` response.
pub fn render<T: Serialize>(status: Status, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder().status(status).json(body),
        Err(e) => server_error(e),
    }
}
