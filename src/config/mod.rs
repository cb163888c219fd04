// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, FunctionConfig, HealthConfig, HttpConfig, LogLevel, LoggingConfig, PerformanceConfig,
    ServerConfig,
};

/// Default config file name (extension resolved by the `config` crate)
const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `GREETER__LOGGING__LEVEL=error`
const ENV_PREFIX: &str = "GREETER";

/// Port assigned by the Functions host to a custom handler
pub const CUSTOM_HANDLER_PORT_ENV: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

impl Config {
    /// Load configuration using the first CLI argument as config path (without extension).
    /// Default config file is "config.toml" when no path specified.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path, environment and the host-assigned port
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(config_path, std::env::var(CUSTOM_HANDLER_PORT_ENV).ok())
    }

    fn build(config_path: &str, port_override: Option<String>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port_override)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
