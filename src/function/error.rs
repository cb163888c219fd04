use thiserror::Error;

/// Failures inside the function body that map to a 500 response
#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("Error serializing response to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
