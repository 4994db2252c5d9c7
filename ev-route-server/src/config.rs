//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Secret used when `EV_ROUTE_JWT_SECRET` is unset. Only fit for local use.
pub const DEV_JWT_SECRET: &str = "ev-route-dev-secret";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATA_PATH: &str = "data/stations.json";
const DEFAULT_STATIC_DIR: &str = "static";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to listen on
    pub addr: SocketAddr,

    /// Shared secret for verifying bearer tokens
    pub jwt_secret: String,

    /// Whether `jwt_secret` is the development default
    pub using_dev_secret: bool,

    /// Catalog file
    pub data_path: PathBuf,

    /// OSRM server base URL (`None` for the public demo server)
    pub osrm_url: Option<String>,

    /// Route fixture file; when set, used instead of OSRM
    pub fixtures_path: Option<PathBuf>,

    /// Static assets directory
    pub static_dir: PathBuf,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a lookup function.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr_text = get("EV_ROUTE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_text.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            name: "EV_ROUTE_ADDR",
            message: format!("{addr_text:?}: {e}"),
        })?;

        let (jwt_secret, using_dev_secret) = match get("EV_ROUTE_JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        Ok(Self {
            addr,
            jwt_secret,
            using_dev_secret,
            data_path: get("EV_ROUTE_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            osrm_url: get("OSRM_URL"),
            fixtures_path: get("EV_ROUTE_FIXTURES").map(PathBuf::from),
            static_dir: get("EV_ROUTE_STATIC")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}
