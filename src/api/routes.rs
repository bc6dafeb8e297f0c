use crate::{
    api::{actions, health, resources},
    domain::{
        App, AuthProvider, BillingPlan, DatabaseFunction, DatabaseTable, Subscription, Webhook,
    },
    observability::HealthChecker,
    services::Services,
};
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub services: Services,
    pub health_checker: Arc<HealthChecker>,
}

/// Router options taken from the server configuration
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub metrics_enabled: bool,
    pub static_dir: Option<String>,
}

pub fn create_router(services: Services, options: RouterOptions) -> Router {
    let health_checker = Arc::new(HealthChecker::new(services.clone()));

    let state = AppState {
        services,
        health_checker,
    };

    // The front end is served from a different origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes());

    if options.metrics_enabled {
        router = router.route("/metrics", get(health::metrics));
    }

    if let Some(dir) = options.static_dir {
        tracing::info!("Serving front end from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/apps", resources::routes::<App>())
        .nest("/database-tables", resources::routes::<DatabaseTable>())
        .nest("/auth-providers", resources::routes::<AuthProvider>())
        .nest("/billing-plans", resources::routes::<BillingPlan>())
        .nest(
            "/webhooks",
            resources::routes::<Webhook>().route("/:key/test", post(actions::test_webhook)),
        )
        .nest(
            "/subscriptions",
            resources::routes::<Subscription>()
                .route("/:key/toggle", post(actions::toggle_subscription)),
        )
        .nest(
            "/database-functions",
            resources::routes::<DatabaseFunction>(),
        )
        .route("/dashboard/summary", get(actions::dashboard_summary))
}
