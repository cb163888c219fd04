//! Per-invocation execution context

use crate::logger;
use uuid::Uuid;

/// Identity and logging sink for one function invocation
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    invocation_id: String,
    function_name: String,
    logger: FunctionLogger,
}

impl ExecutionContext {
    pub fn new(function_name: &str) -> Self {
        let invocation_id = Uuid::new_v4().to_string();
        Self {
            logger: FunctionLogger::new(function_name, &invocation_id),
            function_name: function_name.to_string(),
            invocation_id,
        }
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub const fn logger(&self) -> &FunctionLogger {
        &self.logger
    }
}

/// Function-facing logger with informational and severe levels
#[derive(Debug, Clone)]
pub struct FunctionLogger {
    prefix: String,
}

impl FunctionLogger {
    fn new(function_name: &str, invocation_id: &str) -> Self {
        Self {
            prefix: format!("Functions.{function_name} (Id={invocation_id})"),
        }
    }

    pub fn info(&self, message: &str) {
        logger::log_info(&self.line(message));
    }

    pub fn severe(&self, message: &str) {
        logger::log_error(&self.line(message));
    }

    fn line(&self, message: &str) -> String {
        format!("{} {message}", self.prefix)
    }
}
