//! Environment-driven configuration.
//!
//! Flat key set loaded straight from process env via figment (dotenv files
//! are merged into the environment before this runs). Only the upstream URL
//! and credentials are required; everything else has a default.

use custom_debug_derive::Debug as CustomDebug;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use url::Url;

use crate::analytics::Period;
use crate::social::Credentials;

/// Query limits above this are rejected, whatever the configuration says.
pub const MAX_LIMIT: usize = 100;

#[derive(Clone, CustomDebug, Deserialize)]
pub struct Config {
    /// Port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the upstream social platform API.
    pub upstream_base_url: String,
    /// Client credentials for the upstream token grant.
    pub upstream_client_id: String,
    #[debug(skip)]
    pub upstream_client_secret: String,

    /// Snapshots older than this many milliseconds are refreshed before
    /// serving. Also the background refresh interval.
    #[serde(default = "default_freshness_window_ms")]
    pub freshness_window_ms: u64,

    /// Fallback analysis windows when a request omits `period`.
    #[serde(default = "default_popular_period")]
    pub default_popular_period: String,
    #[serde(default = "default_trending_period")]
    pub default_trending_period: String,
    #[serde(default = "default_comparison_period")]
    pub default_comparison_period: String,

    /// Fallback page size when a request omits `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds to wait for services to drain on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new().merge(Env::raw()).extract()
    }

    /// Reject configurations that would fail at first use.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        Url::parse(&self.upstream_base_url).map_err(|e| {
            anyhow::anyhow!("UPSTREAM_BASE_URL '{}' is not a URL: {e}", self.upstream_base_url)
        })?;

        if self.freshness_window_ms == 0 {
            return Err(anyhow::anyhow!("FRESHNESS_WINDOW_MS must be positive"));
        }

        for (name, value) in [
            ("DEFAULT_POPULAR_PERIOD", &self.default_popular_period),
            ("DEFAULT_TRENDING_PERIOD", &self.default_trending_period),
            ("DEFAULT_COMPARISON_PERIOD", &self.default_comparison_period),
        ] {
            if Period::parse(value).is_none() {
                return Err(anyhow::anyhow!(
                    "{name} '{value}' is not a period. Valid: {}",
                    Period::VALID
                ));
            }
        }

        if self.default_limit == 0 || self.default_limit > MAX_LIMIT {
            return Err(anyhow::anyhow!(
                "DEFAULT_LIMIT must be between 1 and {MAX_LIMIT}"
            ));
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.upstream_client_id.clone(),
            client_secret: self.upstream_client_secret.clone(),
        }
    }

    pub fn popular_period(&self) -> Period {
        Period::parse(&self.default_popular_period).unwrap_or(Period::Week)
    }

    pub fn trending_period(&self) -> Period {
        Period::parse(&self.default_trending_period).unwrap_or(Period::Day)
    }

    pub fn comparison_period(&self) -> Period {
        Period::parse(&self.default_comparison_period).unwrap_or(Period::Month)
    }
}

fn default_port() -> u16 {
    8080
}

fn default_freshness_window_ms() -> u64 {
    10_000
}

fn default_popular_period() -> String {
    "week".to_string()
}

fn default_trending_period() -> String {
    "day".to_string()
}

fn default_comparison_period() -> String {
    "month".to_string()
}

fn default_limit() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout() -> u64 {
    10
}
