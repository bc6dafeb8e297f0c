// Seed data bundled into the binary, optionally overridden from disk

use crate::domain::{
    App, AuthProvider, BillingPlan, DatabaseFunction, DatabaseTable, Subscription, Webhook,
};
use crate::errors::{AppError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

const APPS: &str = include_str!("../fixtures/apps.json");
const DATABASE_TABLES: &str = include_str!("../fixtures/databaseTables.json");
const AUTH_PROVIDERS: &str = include_str!("../fixtures/authProviders.json");
const BILLING_PLANS: &str = include_str!("../fixtures/billingPlans.json");
const WEBHOOKS: &str = include_str!("../fixtures/webhooks.json");
const SUBSCRIPTIONS: &str = include_str!("../fixtures/subscriptions.json");
const DATABASE_FUNCTIONS: &str = include_str!("../fixtures/databaseFunctions.json");

/// Seed records for every store
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub apps: Vec<App>,
    pub database_tables: Vec<DatabaseTable>,
    pub auth_providers: Vec<AuthProvider>,
    pub billing_plans: Vec<BillingPlan>,
    pub webhooks: Vec<Webhook>,
    pub subscriptions: Vec<Subscription>,
    pub database_functions: Vec<DatabaseFunction>,
}

impl Fixtures {
    /// The fixtures compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::load(None)
    }

    /// Bundled fixtures, with `<directory>/<name>.json` taking precedence when it exists
    pub fn load(directory: Option<&Path>) -> Result<Self> {
        Ok(Self {
            apps: parse("apps", APPS, directory)?,
            database_tables: parse("databaseTables", DATABASE_TABLES, directory)?,
            auth_providers: parse("authProviders", AUTH_PROVIDERS, directory)?,
            billing_plans: parse("billingPlans", BILLING_PLANS, directory)?,
            webhooks: parse("webhooks", WEBHOOKS, directory)?,
            subscriptions: parse("subscriptions", SUBSCRIPTIONS, directory)?,
            database_functions: parse("databaseFunctions", DATABASE_FUNCTIONS, directory)?,
        })
    }
}

fn parse<T: DeserializeOwned>(name: &str, bundled: &str, directory: Option<&Path>) -> Result<Vec<T>> {
    let fixture_error = |message: String| AppError::Fixture {
        name: name.to_string(),
        message,
    };

    let override_path = directory
        .map(|dir| dir.join(format!("{}.json", name)))
        .filter(|path| path.is_file());

    let records: Vec<T> = match override_path {
        Some(path) => {
            tracing::info!("Loading fixture {} from {}", name, path.display());
            let contents =
                std::fs::read_to_string(&path).map_err(|e| fixture_error(e.to_string()))?;
            serde_json::from_str(&contents).map_err(|e| fixture_error(e.to_string()))?
        }
        None => serde_json::from_str(bundled).map_err(|e| fixture_error(e.to_string()))?,
    };

    tracing::debug!("Fixture {} has {} records", name, records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppStatus, BillingTier, SubscriptionStatus, WebhookStatus};

    #[test]
    fn test_bundled_fixtures_parse() {
        let fixtures = Fixtures::bundled().expect("bundled fixtures must parse");

        assert_eq!(fixtures.apps.len(), 4);
        assert_eq!(fixtures.apps[0].status, AppStatus::Deployed);
        assert_eq!(fixtures.database_tables.len(), 3);
        assert_eq!(fixtures.database_tables[0].fields[0].name, "id");
        assert_eq!(fixtures.auth_providers.len(), 5);
        assert_eq!(fixtures.billing_plans.len(), 3);
        assert_eq!(fixtures.billing_plans[1].tier, BillingTier::Pro);
        assert_eq!(fixtures.webhooks[1].status, WebhookStatus::Inactive);
        assert!(fixtures.webhooks[1].last_triggered.is_none());
        assert_eq!(fixtures.subscriptions[1].status, SubscriptionStatus::Paused);
        assert_eq!(fixtures.database_functions.len(), 2);
    }

    #[test]
    fn test_directory_override() {
        let dir = std::env::temp_dir().join(format!("appforge-fixtures-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("apps.json"),
            r#"[{"id":"x","name":"Only","subdomain":"only","status":"building","billingTier":"starter","createdAt":"2024-05-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let fixtures = Fixtures::load(Some(dir.as_path())).unwrap();
        assert_eq!(fixtures.apps.len(), 1);
        assert_eq!(fixtures.apps[0].id, "x");
        assert_eq!(fixtures.apps[0].monthly_visits, 0);
        // entities without an override fall back to the bundled data
        assert_eq!(fixtures.webhooks.len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_override() {
        let dir = std::env::temp_dir().join(format!("appforge-fixtures-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("webhooks.json"), "{ not json").unwrap();

        let err = Fixtures::load(Some(dir.as_path())).unwrap_err();
        assert!(matches!(err, AppError::Fixture { ref name, .. } if name == "webhooks"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
