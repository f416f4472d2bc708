use crate::error::CheckoutError;
use dotenvy::dotenv;
use log::{error, info, warn};
use std::{
    env as stdenv,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://rake.red/api/jp/videos";
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 4 * 60;

pub fn load_env_file() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_path = current_dir.join(".env");

    if dotenv().is_err() {
        error!(
            ".env file not found. Expected it at: {}",
            env_path.display()
        );
    } else {
        info!(".env loading at: {}", env_path.display());
    }
}

pub fn load_env_var(key: &str, default: &str) -> String {
    stdenv::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reads `key`, treating an unset or blank value as absent.
pub fn optional_env_var(key: &str) -> Option<String> {
    stdenv::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: String,
    pub stripe_api_base: String,
    pub contact_endpoint: String,
    pub catalog_path: Option<PathBuf>,
    pub keep_alive_every: Duration,
    pub keep_alive_url: String,
    pub public_base_url: Option<String>,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let host = load_env_var("HOST", "127.0.0.1");
        let port = load_env_var("PORT", "8081");
        let keep_alive_secs = match optional_env_var("KEEP_ALIVE_SECS") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|e| {
                warn!("KEEP_ALIVE_SECS={} is not a number ({}), using {}", raw, e, DEFAULT_KEEP_ALIVE_SECS);
                DEFAULT_KEEP_ALIVE_SECS
            }),
            None => DEFAULT_KEEP_ALIVE_SECS,
        };
        let keep_alive_url = optional_env_var("KEEP_ALIVE_URL")
            .unwrap_or_else(|| format!("http://{}:{}/api/keep-alive", host, port));

        Self {
            stripe_api_base: load_env_var("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            contact_endpoint: load_env_var("CONTACT_ENDPOINT", DEFAULT_CONTACT_ENDPOINT),
            catalog_path: optional_env_var("CATALOG_PATH").map(PathBuf::from),
            keep_alive_every: Duration::from_secs(keep_alive_secs.max(1)),
            keep_alive_url,
            public_base_url: optional_env_var("PUBLIC_BASE_URL"),
            host,
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Values a checkout attempt needs. Read per attempt, so a missing value only
/// fails the attempt that needs it.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSettings {
    pub secret_key: Option<String>,
    pub base_url: Option<String>,
    pub api_base: String,
}

/// `CheckoutSettings` after the presence checks passed.
#[derive(Debug, Clone)]
pub struct CheckoutCredentials {
    pub secret_key: String,
    pub base_url: String,
    pub api_base: String,
}

impl CheckoutSettings {
    pub fn from_env(api_base: &str) -> Self {
        Self {
            secret_key: optional_env_var("STRIPE_SECRET_KEY"),
            base_url: optional_env_var("PUBLIC_BASE_URL"),
            api_base: api_base.to_string(),
        }
    }

    pub fn require(&self) -> Result<CheckoutCredentials, CheckoutError> {
        let secret_key = match self.secret_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                error!("STRIPE_SECRET_KEY is not set");
                return Err(CheckoutError::MissingSecretKey);
            }
        };
        let base_url = match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                error!("PUBLIC_BASE_URL is not set");
                return Err(CheckoutError::MissingBaseUrl);
            }
        };

        Ok(CheckoutCredentials {
            secret_key,
            base_url,
            api_base: self.api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl CheckoutCredentials {
    pub fn success_url(&self) -> String {
        format!("{}/success", self.base_url)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.base_url)
    }
}
