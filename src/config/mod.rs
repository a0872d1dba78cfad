//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PRISM_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PRISM_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// CLIP model directory (`model.safetensors` + `tokenizer.json`).
    ///
    /// When unset the server runs the deterministic stub engine.
    pub model_path: Option<PathBuf>,

    /// Max accepted request body in bytes. `None` disables the limit.
    pub max_payload_bytes: Option<usize>,

    /// Max time a request waits for inference. `None` waits forever.
    pub inference_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
            model_path: None,
            max_payload_bytes: None,
            inference_timeout: None,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "PRISM_PORT";
    const ENV_BIND_ADDR: &'static str = "PRISM_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "PRISM_MODEL_PATH";
    const ENV_MAX_PAYLOAD_BYTES: &'static str = "PRISM_MAX_PAYLOAD_BYTES";
    const ENV_INFERENCE_TIMEOUT_MS: &'static str = "PRISM_INFERENCE_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let max_payload_bytes = Self::parse_optional_positive_from_env(Self::ENV_MAX_PAYLOAD_BYTES)?
            .map(|v| v as usize);
        let inference_timeout =
            Self::parse_optional_positive_from_env(Self::ENV_INFERENCE_TIMEOUT_MS)?
                .map(Duration::from_millis);

        Ok(Self {
            port,
            bind_addr,
            model_path,
            max_payload_bytes,
            inference_timeout,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_optional_positive_from_env(
        var_name: &'static str,
    ) -> Result<Option<u64>, ConfigError> {
        let Some(value) = env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };

        let parsed: u64 = value.parse().map_err(|e| ConfigError::InvalidNumber {
            name: var_name,
            value: value.clone(),
            source: e,
        })?;

        if parsed == 0 {
            return Err(ConfigError::ZeroLimit { name: var_name });
        }

        Ok(Some(parsed))
    }
}
