use appforge_mock::{
    api::{create_router, RouterOptions},
    config::Config,
    observability::init_tracing,
    services::Services,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize tracing/logging
    init_tracing(&config.observability);

    tracing::info!("Starting AppForge mock backend");
    tracing::info!("Configuration loaded: {:?}", config.server);

    // Seed the in-memory stores
    let services = Services::from_config(&config)?;
    for (entity, count) in services.record_counts().await {
        tracing::info!("Seeded {} store with {} records", entity, count);
    }

    let app = create_router(
        services,
        RouterOptions {
            metrics_enabled: config.observability.metrics_enabled,
            static_dir: config.server.static_dir.clone(),
        },
    );

    let ip: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server host {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
