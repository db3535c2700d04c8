/// Policy API - HTTP endpoint transforming JSON-LD policies into the domain model
///
/// Serves the health checks and `POST /policies/transform` over a registry
/// built once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ldpolicy::server::{router, AppState};
use ldpolicy::{DefaultHealthCheckService, RegistryHealthCheck, ServiceConfig, TransformerRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = match std::env::var("LDPOLICY_CONFIG") {
        Ok(path) => ServiceConfig::load_from_file(PathBuf::from(path))?,
        Err(_) => ServiceConfig::default(),
    }
    .apply_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    let registry = Arc::new(TransformerRegistry::with_policy_transformers()?);
    tracing::info!("Registered {} transformers", registry.len());

    let mut health = DefaultHealthCheckService::new();
    health.add_startup_provider(RegistryHealthCheck::new(registry.clone()));
    health.add_liveness_provider(RegistryHealthCheck::new(registry.clone()));
    health.add_readiness_provider(RegistryHealthCheck::new(registry.clone()));

    let addr = config.socket_addr()?;
    let app = router(AppState {
        registry,
        health: Arc::new(health),
        config,
    });

    tracing::info!("Policy API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
