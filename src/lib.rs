//! Azure Functions custom handler serving the `HttpExample` HTTP trigger.
//!
//! The Functions host starts this process, passes the port to bind in
//! `FUNCTIONS_CUSTOMHANDLER_PORT` and forwards trigger requests to
//! `/{route_prefix}/{function_name}`.

pub mod config;
pub mod function;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
