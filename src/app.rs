use crate::cache::ViewCache;
use crate::config::Config;
use crate::services::manager::ServiceManager;
use crate::services::refresher::RefreshService;
use crate::services::web::WebService;
use crate::social::SocialApi;
use crate::state::{ApiDefaults, AppState};
use anyhow::Context;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
    service_manager: ServiceManager,
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub async fn new() -> Result<Self, anyhow::Error> {
        // Load configuration
        let config = Config::load().context("Failed to load config")?;
        config.validate().context("Invalid configuration")?;

        // Create the upstream client and the snapshot cache over it
        let api = SocialApi::new(&config.upstream_base_url, config.credentials())
            .context("Failed to create upstream client")?;
        let api = Arc::new(api);
        let views = ViewCache::new(api.clone(), config.freshness_window_ms);

        info!(
            upstream = %config.upstream_base_url,
            freshness_window_ms = config.freshness_window_ms,
            "upstream client ready"
        );

        let app_state = AppState::new(api, views, ApiDefaults::from_config(&config));

        // Warm the snapshot before serving traffic. Non-fatal: the refresher
        // retries every tick, and handlers fetch on demand until it lands.
        if let Err(e) = app_state.views.ensure_fresh(true).await {
            warn!(error = ?e, "Failed to fetch initial snapshot on startup (non-fatal)");
        }

        Ok(App {
            config,
            app_state,
            service_manager: ServiceManager::new(),
        })
    }

    /// Setup and register the web server and the background refresher
    pub fn setup_services(&mut self) {
        let web_service = Box::new(WebService::new(self.config.port, self.app_state.clone()));
        self.service_manager.register_service("web", web_service);

        let refresh_service = Box::new(RefreshService::new(
            self.app_state.views.clone(),
            Duration::from_millis(self.config.freshness_window_ms),
            self.app_state.service_statuses.clone(),
        ));
        self.service_manager
            .register_service("refresher", refresh_service);
    }

    /// Start all registered services
    pub fn start_services(&mut self) {
        self.service_manager.spawn_all();
    }

    /// Run the application and handle shutdown signals
    pub async fn run(self) -> ExitCode {
        use crate::services::signals::handle_shutdown_signals;
        handle_shutdown_signals(self.service_manager, self.config.shutdown_timeout).await
    }
}
