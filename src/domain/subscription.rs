// Realtime subscriptions streaming table events to clients

use crate::domain::{nullable, webhook::TableEvent};
use crate::errors::StoreResult;
use crate::services::RecordService;
use crate::store::{Operation, Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionProtocol {
    Websocket,
    ServerSentEvents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
}

impl SubscriptionStatus {
    pub fn toggled(self) -> Self {
        match self {
            SubscriptionStatus::Active => SubscriptionStatus::Paused,
            SubscriptionStatus::Paused => SubscriptionStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub table: String,
    pub events: Vec<TableEvent>,
    pub protocol: SubscriptionProtocol,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub status: SubscriptionStatus,
    pub connections: u64,
    pub messages_delivered: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscription {
    pub app_id: String,
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub events: Vec<TableEvent>,
    pub protocol: SubscriptionProtocol,
    pub endpoint: String,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscription {
    pub name: Option<String>,
    pub table: Option<String>,
    pub events: Option<Vec<TableEvent>>,
    pub protocol: Option<SubscriptionProtocol>,
    pub endpoint: Option<String>,
    /// `null` removes the filter
    #[serde(default, deserialize_with = "nullable")]
    pub filter: Option<Option<String>>,
    pub status: Option<SubscriptionStatus>,
    pub connections: Option<u64>,
    pub messages_delivered: Option<u64>,
}

impl Record for Subscription {
    type Key = String;
    type Draft = CreateSubscription;
    type Changes = UpdateSubscription;

    const ENTITY: &'static str = "subscription";
    const APP_SCOPED: bool = true;

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateSubscription, stamp: Stamp) -> Self {
        Subscription {
            id: stamp.id,
            app_id: draft.app_id,
            name: draft.name,
            table: draft.table,
            events: draft.events,
            protocol: draft.protocol,
            endpoint: draft.endpoint,
            filter: draft.filter,
            status: SubscriptionStatus::Active,
            connections: 0,
            messages_delivered: 0,
            created_at: stamp.now,
        }
    }

    fn apply(&mut self, changes: UpdateSubscription, _now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(table) = changes.table {
            self.table = table;
        }
        if let Some(events) = changes.events {
            self.events = events;
        }
        if let Some(protocol) = changes.protocol {
            self.protocol = protocol;
        }
        if let Some(endpoint) = changes.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(filter) = changes.filter {
            self.filter = filter;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(connections) = changes.connections {
            self.connections = connections;
        }
        if let Some(delivered) = changes.messages_delivered {
            self.messages_delivered = delivered;
        }
    }

    fn app_id(&self) -> Option<&str> {
        Some(&self.app_id)
    }
}

impl RecordService<Subscription> {
    /// Flip between active and paused
    #[tracing::instrument(skip_all, fields(entity = Subscription::ENTITY, key = %id))]
    pub async fn toggle_status(&self, id: &str) -> StoreResult<Subscription> {
        let id = id.to_string();
        self.run(Operation::ToggleStatus, move |service| async move {
            let toggled = service
                .store()
                .modify(&id, |subscription| {
                    subscription.status = subscription.status.toggled();
                })
                .await;

            if let Ok(subscription) = &toggled {
                tracing::debug!(status = ?subscription.status, "Subscription toggled");
            }
            toggled
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::services::ServiceContext;
    use crate::store::{FixtureStore, LatencyProfile};

    fn service() -> RecordService<Subscription> {
        RecordService::new(
            FixtureStore::empty(),
            LatencyProfile::default(),
            ServiceContext::immediate(),
        )
    }

    fn draft() -> CreateSubscription {
        CreateSubscription {
            app_id: "1".to_string(),
            name: "Order feed".to_string(),
            table: "orders".to_string(),
            events: vec![TableEvent::Insert, TableEvent::Update],
            protocol: SubscriptionProtocol::ServerSentEvents,
            endpoint: "/realtime/orders".to_string(),
            filter: Some("status = 'open'".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let subscriptions = service();
        let created = subscriptions.create(draft()).await.unwrap();

        assert_eq!(created.status, SubscriptionStatus::Active);
        assert_eq!(created.connections, 0);
        assert_eq!(created.messages_delivered, 0);
    }

    #[tokio::test]
    async fn test_toggle_is_involution() {
        let subscriptions = service();
        let created = subscriptions.create(draft()).await.unwrap();

        let paused = subscriptions.toggle_status(&created.id).await.unwrap();
        assert_eq!(paused.status, SubscriptionStatus::Paused);

        let resumed = subscriptions.toggle_status(&created.id).await.unwrap();
        assert_eq!(resumed.status, SubscriptionStatus::Active);
        assert_eq!(resumed, created);
    }

    #[tokio::test]
    async fn test_toggle_unknown() {
        let subscriptions = service();
        let err = subscriptions
            .toggle_status("nope")
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found("subscription", "nope"));
    }

    #[tokio::test]
    async fn test_null_filter_clears_it() {
        let subscriptions = service();
        let created = subscriptions.create(draft()).await.unwrap();

        let untouched: UpdateSubscription =
            serde_json::from_value(serde_json::json!({ "name": "Renamed" })).unwrap();
        let renamed = subscriptions.update(&created.id, untouched).await.unwrap();
        assert_eq!(renamed.filter, created.filter);

        let cleared: UpdateSubscription =
            serde_json::from_value(serde_json::json!({ "filter": null })).unwrap();
        let updated = subscriptions.update(&created.id, cleared).await.unwrap();
        assert_eq!(updated.filter, None);
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn test_protocol_wire_names() {
        assert_eq!(
            serde_json::to_value(SubscriptionProtocol::ServerSentEvents).unwrap(),
            "server-sent-events"
        );
        assert_eq!(
            serde_json::to_value(SubscriptionProtocol::Websocket).unwrap(),
            "websocket"
        );
    }
}
