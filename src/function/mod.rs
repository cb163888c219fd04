//! The `HttpExample` function
//!
//! Greets the caller by name and echoes back what the request reveals about the
//! client: IP heuristics, browser / OS classification and the raw headers.

pub mod client_ip;
pub mod context;
pub mod error;
pub mod payload;
pub mod request;
pub mod response;
pub mod user_agent;

pub use context::ExecutionContext;
pub use error::FunctionError;
pub use request::HttpRequestMessage;
pub use response::HttpResponseMessage;

use chrono::{DateTime, Local};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::StatusCode;
use serde::Serialize;

use payload::{ErrorPayload, Greeting, Timestamps};

pub const MISSING_NAME_ERROR: &str =
    "Please pass a name on the query string or in the request body";

pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Function entry point, invoked once per HTTP trigger request
pub fn run(request: &HttpRequestMessage, context: &ExecutionContext) -> HttpResponseMessage {
    context.logger().info("HTTP trigger processed a request.");
    finish(respond(request, Local::now()), context)
}

/// Name supplied by the caller; a present body (even empty) wins over the query string
pub fn resolve_name(request: &HttpRequestMessage) -> Option<&str> {
    request.body().or_else(|| request.query_parameter("name"))
}

fn respond(
    request: &HttpRequestMessage,
    now: DateTime<Local>,
) -> Result<HttpResponseMessage, FunctionError> {
    let timestamps = Timestamps::from(now);

    match resolve_name(request) {
        None => json_response(
            StatusCode::BAD_REQUEST,
            &ErrorPayload {
                error: MISSING_NAME_ERROR.to_string(),
                timestamp: timestamps.timestamp,
            },
        ),
        Some(name) => json_response(StatusCode::OK, &Greeting::new(request, name, timestamps)),
    }
}

fn finish(
    result: Result<HttpResponseMessage, FunctionError>,
    context: &ExecutionContext,
) -> HttpResponseMessage {
    result.unwrap_or_else(|e| {
        context.logger().severe(&e.to_string());
        HttpResponseMessage::builder(StatusCode::INTERNAL_SERVER_ERROR)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
            .body(INTERNAL_ERROR_BODY)
            .build()
    })
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<HttpResponseMessage, FunctionError> {
    let json = serde_json::to_string(body)?;
    Ok(HttpResponseMessage::builder(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(json)
        .build())
}
