//! Application state shared across the web handlers and services.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::analytics::Period;
use crate::cache::ViewCache;
use crate::config::Config;
use crate::social::SocialApi;

/// Health status of a service.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Starting,
    Active,
    Disabled,
    Error,
}

/// A timestamped status entry for a service.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub status: ServiceStatus,
    pub updated_at: Instant,
}

/// Thread-safe registry for services to self-report their health status.
#[derive(Debug, Clone, Default)]
pub struct ServiceStatusRegistry {
    inner: Arc<DashMap<String, StatusEntry>>,
}

impl ServiceStatusRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates the status for a named service.
    pub fn set(&self, name: &str, status: ServiceStatus) {
        self.inner.insert(
            name.to_owned(),
            StatusEntry {
                status,
                updated_at: Instant::now(),
            },
        );
    }

    /// Returns the current status of a named service, if present.
    pub fn get(&self, name: &str) -> Option<ServiceStatus> {
        self.inner.get(name).map(|entry| entry.status.clone())
    }

    /// Returns a snapshot of all service status entries.
    pub fn all(&self) -> Vec<(String, StatusEntry)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

/// Request-time fallbacks resolved once from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct ApiDefaults {
    pub popular_period: Period,
    pub trending_period: Period,
    pub comparison_period: Period,
    pub limit: usize,
}

impl ApiDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            popular_period: config.popular_period(),
            trending_period: config.trending_period(),
            comparison_period: config.comparison_period(),
            limit: config.default_limit,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<SocialApi>,
    pub views: ViewCache,
    pub service_statuses: ServiceStatusRegistry,
    pub defaults: ApiDefaults,
}

impl AppState {
    pub fn new(api: Arc<SocialApi>, views: ViewCache, defaults: ApiDefaults) -> Self {
        Self {
            api,
            views,
            service_statuses: ServiceStatusRegistry::new(),
            defaults,
        }
    }
}
