use clap::Parser;
use pulse::app::App;
use pulse::cli::Args;
use pulse::config::Config;
use pulse::logging::setup_logging;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load config and setup logging before App::new() so startup logs are never silently dropped
    let early_config = Config::load().expect("Failed to load config for logging setup");
    setup_logging(&early_config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting pulse"
    );

    // Create and initialize the application
    let mut app = App::new().await.expect("Failed to initialize application");

    // Setup services (web, refresher), start them, and run until shutdown
    app.setup_services();
    app.start_services();
    app.run().await
}
