// Outbound webhooks fired on table events, with a simulated test call

use crate::errors::StoreResult;
use crate::services::RecordService;
use crate::store::{Operation, Record, Stamp};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

const MAX_SUCCESS_RATE: f64 = 100.0;
const SUCCESS_STEP: f64 = 1.0;
const FAILURE_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableEvent {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub url: String,
    pub table: String,
    pub events: Vec<TableEvent>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub secret: String,
    pub status: WebhookStatus,
    pub total_calls: u64,
    /// Running approximation, nudged on every test call
    pub success_rate: f64,
    pub last_triggered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Webhook {
    fn record_test(&mut self, success: bool, now: DateTime<Utc>) {
        self.total_calls += 1;
        self.success_rate = if success {
            (self.success_rate + SUCCESS_STEP).min(MAX_SUCCESS_RATE)
        } else {
            (self.success_rate - FAILURE_STEP).max(0.0)
        };
        self.last_triggered = Some(now);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhook {
    pub app_id: String,
    pub name: String,
    pub url: String,
    pub table: String,
    #[serde(default)]
    pub events: Vec<TableEvent>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhook {
    pub name: Option<String>,
    pub url: Option<String>,
    pub table: Option<String>,
    pub events: Option<Vec<TableEvent>>,
    pub headers: Option<BTreeMap<String, String>>,
    pub secret: Option<String>,
    pub status: Option<WebhookStatus>,
}

impl Record for Webhook {
    type Key = String;
    type Draft = CreateWebhook;
    type Changes = UpdateWebhook;

    const ENTITY: &'static str = "webhook";
    const APP_SCOPED: bool = true;

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateWebhook, stamp: Stamp) -> Self {
        Webhook {
            id: stamp.id,
            app_id: draft.app_id,
            name: draft.name,
            url: draft.url,
            table: draft.table,
            events: draft.events,
            headers: draft.headers,
            secret: draft.secret,
            status: WebhookStatus::Active,
            total_calls: 0,
            success_rate: MAX_SUCCESS_RATE,
            last_triggered: None,
            created_at: stamp.now,
        }
    }

    fn apply(&mut self, changes: UpdateWebhook, _now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(url) = changes.url {
            self.url = url;
        }
        if let Some(table) = changes.table {
            self.table = table;
        }
        if let Some(events) = changes.events {
            self.events = events;
        }
        if let Some(headers) = changes.headers {
            self.headers = headers;
        }
        if let Some(secret) = changes.secret {
            self.secret = secret;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    fn app_id(&self) -> Option<&str> {
        Some(&self.app_id)
    }
}

/// Outcome reported by a simulated webhook call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTestResult {
    pub success: bool,
    pub status_code: u16,
    /// Milliseconds
    pub response_time: u64,
    pub message: String,
}

impl WebhookTestResult {
    fn new(success: bool, response_time: u64) -> Self {
        if success {
            Self {
                success,
                status_code: 200,
                response_time,
                message: "Webhook test successful".to_string(),
            }
        } else {
            Self {
                success,
                status_code: 500,
                response_time,
                message: "Webhook test failed".to_string(),
            }
        }
    }
}

/// Pseudo-random source for simulated webhook calls
pub struct WebhookSimulator {
    rng: Mutex<StdRng>,
    success_probability: f64,
}

impl WebhookSimulator {
    pub fn new(success_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            success_probability: success_probability.clamp(0.0, 1.0),
        }
    }

    /// Simulator whose calls always succeed or always fail
    pub fn always(success: bool) -> Self {
        Self::new(if success { 1.0 } else { 0.0 }, Some(0))
    }

    /// Returns whether the call succeeded and its response time in milliseconds
    fn roll(&self) -> (bool, u64) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let success = rng.gen_bool(self.success_probability);
        let response_time = rng.gen_range(100..600);
        (success, response_time)
    }
}

impl Default for WebhookSimulator {
    fn default() -> Self {
        Self::new(0.8, None)
    }
}

/// Webhook CRUD plus the simulated test call
#[derive(Clone)]
pub struct WebhookService {
    records: RecordService<Webhook>,
    simulator: Arc<WebhookSimulator>,
}

impl WebhookService {
    pub fn new(records: RecordService<Webhook>, simulator: Arc<WebhookSimulator>) -> Self {
        Self { records, simulator }
    }

    /// Simulate an outbound call, updating the webhook's call statistics
    ///
    /// The outcome is only drawn once the webhook is found.
    #[tracing::instrument(skip_all, fields(entity = Webhook::ENTITY, key = %id))]
    pub async fn test_webhook(&self, id: &str) -> StoreResult<WebhookTestResult> {
        let id = id.to_string();
        let simulator = Arc::clone(&self.simulator);

        self.records
            .run(Operation::TestWebhook, move |records| async move {
                let now = records.now();
                let tested = records
                    .store()
                    .modify_with(&id, |webhook| {
                        let (success, response_time) = simulator.roll();
                        webhook.record_test(success, now);
                        WebhookTestResult::new(success, response_time)
                    })
                    .await;

                tested.map(|(webhook, result)| {
                    tracing::info!(
                        success = result.success,
                        response_time = result.response_time,
                        total_calls = webhook.total_calls,
                        success_rate = webhook.success_rate,
                        "Webhook test simulated"
                    );
                    result
                })
            })
            .await
    }
}

impl Deref for WebhookService {
    type Target = RecordService<Webhook>;

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}
