// Configuration module entry point
// Loads layered configuration and owns the shared application state

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HealthConfig, HttpConfig};

/// Environment variable prefix, e.g. `ELEVATOR_SERVER__PORT=9090`
const ENV_PREFIX: &str = "ELEVATOR";

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Precedence: defaults < config file < `ELEVATOR_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, no file or environment sources
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults()?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "elevator-dispatch")?
        .set_default("http.enable_cors", false)?
        .set_default("http.max_body_size", 65_536) // 64KB
}

/// Resolve the config file path from command-line arguments.
///
/// Accepts `-c <path>`, `--config <path>`, `--config=<path>` or a bare path.
pub fn config_path_from_args<I>(args: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            if let Some(path) = args.next() {
                return path;
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_defaults_bind_all_interfaces_on_8080() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_defaults_fill_every_section() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.http.server_name, "elevator-dispatch");
        assert!(!cfg.http.enable_cors);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_config_path_from_args() {
        assert_eq!(config_path_from_args(args(&[])), DEFAULT_CONFIG_PATH);
        assert_eq!(config_path_from_args(args(&["-c", "prod.toml"])), "prod.toml");
        assert_eq!(config_path_from_args(args(&["--config", "a.toml"])), "a.toml");
        assert_eq!(config_path_from_args(args(&["--config=b.toml"])), "b.toml");
        assert_eq!(config_path_from_args(args(&["local"])), "local");
        // Dangling flag falls back to the default
        assert_eq!(config_path_from_args(args(&["-c"])), DEFAULT_CONFIG_PATH);
    }
}
