//! Request handler module
//!
//! Dispatches requests forwarded by the Functions host to the function or to a
//! canned protocol response.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
