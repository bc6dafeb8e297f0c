pub mod record_service;

pub use record_service::RecordService;

use crate::config::Config;
use crate::domain::{
    App, AuthProvider, BillingPlan, DatabaseFunction, DatabaseTable, Subscription, Webhook,
    WebhookService, WebhookSimulator,
};
use crate::errors::Result;
use crate::fixtures::Fixtures;
use crate::observability::MetricsRecorder;
use crate::store::{
    Clock, Delay, FixtureStore, IdGenerator, LatencyProfile, NoDelay, Record, SequentialIds,
    SleepDelay, SystemClock, UuidIds,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Injected delay, id and clock sources shared by every service
#[derive(Clone)]
pub struct ServiceContext {
    pub delay: Arc<dyn Delay>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContext {
    pub fn new(delay: Arc<dyn Delay>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { delay, ids, clock }
    }

    /// Real tokio sleeps scaled by `scale`, UUID ids, system clock
    pub fn simulated(scale: f64) -> Self {
        Self::new(
            Arc::new(SleepDelay::new(scale)),
            Arc::new(UuidIds),
            Arc::new(SystemClock),
        )
    }

    /// No delay and sequential ids, for tests
    pub fn immediate() -> Self {
        Self::new(
            Arc::new(NoDelay),
            Arc::new(SequentialIds::default()),
            Arc::new(SystemClock),
        )
    }
}

/// Every mock service of one application instance
#[derive(Clone)]
pub struct Services {
    pub apps: RecordService<App>,
    pub database_tables: RecordService<DatabaseTable>,
    pub auth_providers: RecordService<AuthProvider>,
    pub billing_plans: RecordService<BillingPlan>,
    pub webhooks: WebhookService,
    pub subscriptions: RecordService<Subscription>,
    pub database_functions: RecordService<DatabaseFunction>,
}

impl Services {
    pub fn new(
        fixtures: Fixtures,
        ctx: ServiceContext,
        webhook_simulator: WebhookSimulator,
    ) -> Result<Self> {
        let latency = LatencyProfile::default();
        // lists of webhooks and subscriptions resolve slightly faster
        let streaming = latency.with_get_all(Duration::from_millis(250));

        Ok(Self {
            apps: service(fixtures.apps, latency, &ctx)?,
            database_tables: service(fixtures.database_tables, latency, &ctx)?,
            auth_providers: service(fixtures.auth_providers, latency, &ctx)?,
            billing_plans: service(fixtures.billing_plans, latency, &ctx)?,
            webhooks: WebhookService::new(
                service(fixtures.webhooks, streaming, &ctx)?,
                Arc::new(webhook_simulator),
            ),
            subscriptions: service(fixtures.subscriptions, streaming, &ctx)?,
            database_functions: service(fixtures.database_functions, latency, &ctx)?,
        })
    }

    /// Wire services the way the running server uses them
    pub fn from_config(config: &Config) -> Result<Self> {
        let fixtures = Fixtures::load(config.fixtures.directory.as_deref().map(Path::new))?;

        let ctx = if config.latency.enabled {
            ServiceContext::simulated(config.latency.scale)
        } else {
            ServiceContext::new(Arc::new(NoDelay), Arc::new(UuidIds), Arc::new(SystemClock))
        };

        let simulator =
            WebhookSimulator::new(config.webhooks.success_probability, config.webhooks.seed);

        let services = Self::new(fixtures, ctx, simulator)?;
        tracing::info!(
            "Mock services ready (latency: {}, scale: {})",
            config.latency.enabled,
            config.latency.scale
        );
        Ok(services)
    }

    /// Bundled fixtures with no delay, for tests
    pub fn immediate() -> Result<Self> {
        Self::new(
            Fixtures::bundled()?,
            ServiceContext::immediate(),
            WebhookSimulator::default(),
        )
    }

    /// Current record count per entity
    pub async fn record_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (App::ENTITY, self.apps.store().len().await),
            (DatabaseTable::ENTITY, self.database_tables.store().len().await),
            (AuthProvider::ENTITY, self.auth_providers.store().len().await),
            (BillingPlan::ENTITY, self.billing_plans.store().len().await),
            (Webhook::ENTITY, self.webhooks.store().len().await),
            (Subscription::ENTITY, self.subscriptions.store().len().await),
            (DatabaseFunction::ENTITY, self.database_functions.store().len().await),
        ]
    }
}

fn service<R: Record>(
    seed: Vec<R>,
    latency: LatencyProfile,
    ctx: &ServiceContext,
) -> Result<RecordService<R>> {
    let count = seed.len();
    let store = FixtureStore::seeded(seed)?;
    MetricsRecorder::set_store_records(R::ENTITY, count);
    Ok(RecordService::new(store, latency, ctx.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AppStatus, CreateApp, CreateWebhook, SubscriptionStatus, TableEvent, UpdateApp,
    };
    use crate::errors::{AppError, StoreError};
    use tokio::time::Instant;

    fn simulated_services() -> Services {
        Services::new(
            Fixtures::bundled().unwrap(),
            ServiceContext::new(
                Arc::new(SleepDelay::default()),
                Arc::new(SequentialIds::new("new-")),
                Arc::new(SystemClock),
            ),
            WebhookSimulator::always(true),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_services_are_isolated_per_instance() {
        let first = Services::immediate().unwrap();
        let second = Services::immediate().unwrap();

        first.apps.delete(&"1".to_string()).await.unwrap();

        assert_eq!(first.apps.get_all().await.len(), 3);
        assert_eq!(second.apps.get_all().await.len(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_fixture_keys_rejected() {
        let mut fixtures = Fixtures::bundled().unwrap();
        let duplicate = fixtures.apps[0].clone();
        fixtures.apps.push(duplicate);

        let result = Services::new(fixtures, ServiceContext::immediate(), WebhookSimulator::default());
        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn test_sequential_ids_skip_fixture_ids() {
        let services = Services::immediate().unwrap();

        // fixture apps occupy ids 1 through 4
        let created = services
            .apps
            .create(CreateApp::new("Fresh", "fresh"))
            .await
            .unwrap();
        assert_eq!(created.id, "5");
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_wait_for_their_latency() {
        let services = simulated_services();

        let start = Instant::now();
        services.apps.get_by_id(&"1".to_string()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));

        let start = Instant::now();
        services.webhooks.get_all().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(300));

        let start = Instant::now();
        let err = services.apps.delete(&"missing".to_string()).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("app", "missing"));
        assert!(start.elapsed() >= Duration::from_millis(250));

        let start = Instant::now();
        services
            .webhooks
            .test_webhook("1")
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_follows_delay_not_call_order() {
        let services = simulated_services();

        // create (400ms) is issued first but lands after get_all (300ms)
        let (created, listed) = tokio::join!(
            services.apps.create(CreateApp::new("Late", "late")),
            services.apps.get_all(),
        );

        let created = created.unwrap();
        assert_eq!(listed.len(), 4);
        assert!(!listed.iter().any(|app| app.id == created.id));
        assert_eq!(services.apps.get_all().await.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_lands_before_slower_create() {
        let services = simulated_services();

        let three = "3".to_string();
        let (_, updated) = tokio::join!(
            services.webhooks.create(CreateWebhook {
                app_id: "1".to_string(),
                name: "Audit".to_string(),
                url: "https://audit.example.com".to_string(),
                table: "tasks".to_string(),
                events: vec![TableEvent::Delete],
                ..Default::default()
            }),
            services.apps.update(
                &three,
                UpdateApp {
                    status: Some(AppStatus::Deployed),
                    ..Default::default()
                }
            ),
        );

        assert_eq!(updated.unwrap().status, AppStatus::Deployed);
        assert_eq!(services.webhooks.get_all().await.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_calls_still_complete() {
        let services = simulated_services();
        let three = "3".to_string();

        let created = tokio::time::timeout(
            Duration::from_millis(100),
            services.apps.create(CreateApp::new("Abandoned", "abandoned")),
        )
        .await;
        assert!(created.is_err());

        let updated = tokio::time::timeout(
            Duration::from_millis(100),
            services.apps.update(
                &three,
                UpdateApp {
                    status: Some(AppStatus::Failed),
                    ..Default::default()
                },
            ),
        )
        .await;
        assert!(updated.is_err());

        let toggled = tokio::time::timeout(
            Duration::from_millis(50),
            services.subscriptions.toggle_status("2"),
        )
        .await;
        assert!(toggled.is_err());

        tokio::time::sleep(Duration::from_secs(1)).await;

        let apps = services.apps.store().all().await;
        assert_eq!(apps.len(), 5);
        assert!(apps.iter().any(|app| app.name == "Abandoned"));
        assert_eq!(
            services.apps.store().find(&three).await.unwrap().status,
            AppStatus::Failed
        );
        assert_eq!(
            services
                .subscriptions
                .store()
                .find(&"2".to_string())
                .await
                .unwrap()
                .status,
            SubscriptionStatus::Active
        );
    }

    #[tokio::test]
    async fn test_record_gauge_seeded_from_fixtures() {
        let _services = Services::immediate().unwrap();

        let exported = MetricsRecorder::export().unwrap();
        assert!(exported.contains("store_records{entity=\"billing plan\"}"));
        assert!(exported.contains("store_records{entity=\"auth provider\"}"));
    }

    #[tokio::test]
    async fn test_record_counts() {
        let services = Services::immediate().unwrap();
        let counts = services.record_counts().await;

        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], ("app", 4));
        assert_eq!(counts[3], ("billing plan", 3));
    }
}
