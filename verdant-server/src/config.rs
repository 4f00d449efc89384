//! Environment-driven server configuration

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub store: StoreKind,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub client_url: String,
    pub fcm_server_key: Option<String>,
    pub sweep_interval_secs: u64,
    pub environment: String,
}

/// Which repository backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    /// In-memory store, for local development and tests
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mongo" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store kind: {other}")),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "5000"),
            mongo_uri: try_load("MONGO_URI", "mongodb://127.0.0.1:27017"),
            mongo_db: try_load("MONGO_DB", "verdant"),
            store: try_load("VERDANT_STORE", "mongo"),
            jwt_secret: require("JWT_SECRET"),
            token_ttl_days: try_load("TOKEN_TTL_DAYS", "30"),
            client_url: try_load("CLIENT_URL", "http://localhost:3000"),
            fcm_server_key: optional("FCM_SERVER_KEY"),
            sweep_interval_secs: try_load("SWEEP_INTERVAL_SECS", "3600"),
            environment: try_load("VERDANT_ENV", "development"),
        }
    }

    /// Internal error detail goes into 500 bodies outside production.
    pub fn expose_errors(&self) -> bool {
        self.environment != "production"
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    var(key)
        .map_err(|_| {
            warn!("{key} must be set");
        })
        .expect("Environment misconfigured!")
}

fn optional(key: &str) -> Option<String> {
    var(key).ok().filter(|v| !v.is_empty())
}
