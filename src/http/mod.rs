//! HTTP protocol layer module
//!
//! Canned protocol-level responses, decoupled from the function itself.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_health_response, build_options_response, FUNCTION_METHODS,
};
