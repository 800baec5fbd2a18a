use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use sso_api::{build_router, AppState};
use sso_core::{CredentialService, SessionService};
use sso_infrastructure::connect_store;
use sso_security::PasswordService;
use sso_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    sso_shared::telemetry::init_telemetry();

    info!("SSO Server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to the key-value store
    let store = connect_store(&config.redis).await?;
    info!("Key-value store ready.");

    // One store, shared by both services
    let credentials = CredentialService::new(
        store.clone(),
        PasswordService::new(config.security.bcrypt_cost),
    );
    let sessions = SessionService::new(store, config.session.ttl());

    let state = AppState {
        credentials: Arc::new(credentials),
        sessions: Arc::new(sessions),
    };

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SSO Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
