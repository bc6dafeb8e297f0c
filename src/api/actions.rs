// Entity-specific endpoints layered on the CRUD routes

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    domain::{DashboardSummary, Subscription, WebhookTestResult},
    errors::Result,
    services::Services,
};

/// POST /v1/webhooks/:key/test
pub async fn test_webhook(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<Json<WebhookTestResult>> {
    let result = services.webhooks.test_webhook(&id).await?;
    Ok(Json(result))
}

/// POST /v1/subscriptions/:key/toggle
pub async fn toggle_subscription(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>> {
    let subscription = services.subscriptions.toggle_status(&id).await?;
    tracing::info!(
        "Subscription {} is now {:?}",
        subscription.id,
        subscription.status
    );
    Ok(Json(subscription))
}

/// GET /v1/dashboard/summary
pub async fn dashboard_summary(State(services): State<Services>) -> Json<DashboardSummary> {
    let apps = services.apps.get_all().await;
    Json(DashboardSummary::from_apps(&apps))
}
