use crate::services::Services;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Record count per entity store, present on readiness checks
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stores: BTreeMap<String, usize>,
}

pub struct HealthChecker {
    services: Services,
}

impl HealthChecker {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Liveness check - is the service running?
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stores: BTreeMap::new(),
        }
    }

    /// Readiness check - are the stores seeded and reachable?
    pub async fn readiness(&self) -> HealthStatus {
        let stores = self
            .services
            .record_counts()
            .await
            .into_iter()
            .map(|(entity, count)| (entity.to_string(), count))
            .collect();

        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readiness_reports_store_sizes() {
        let checker = HealthChecker::new(Services::immediate().unwrap());

        let live = checker.liveness().await;
        assert_eq!(live.status, "ok");
        assert!(live.stores.is_empty());

        let ready = checker.readiness().await;
        assert_eq!(ready.stores.get("app"), Some(&4));
        assert_eq!(ready.stores.get("webhook"), Some(&2));
        assert_eq!(ready.stores.len(), 7);
    }
}
