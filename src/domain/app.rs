// Apps shown on the dashboard and edited in the builder

use crate::domain::nullable;
use crate::store::{Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Building,
    Deployed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingTier {
    #[default]
    Starter,
    Pro,
    Enterprise,
}

impl BillingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingTier::Starter => "starter",
            BillingTier::Pro => "pro",
            BillingTier::Enterprise => "enterprise",
        }
    }

    /// Monthly list price in dollars
    pub fn monthly_price(&self) -> u32 {
        match self {
            BillingTier::Starter => 0,
            BillingTier::Pro => 29,
            BillingTier::Enterprise => 99,
        }
    }
}

impl fmt::Display for BillingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub name: String,
    pub subdomain: String,
    pub status: AppStatus,
    pub billing_tier: BillingTier,
    #[serde(default)]
    pub monthly_visits: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
}

/// Fields accepted when creating an app
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApp {
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub billing_tier: BillingTier,
    #[serde(default)]
    pub monthly_visits: u64,
    pub template: Option<String>,
    pub description: Option<String>,
    pub custom_domain: Option<String>,
}

impl CreateApp {
    pub fn new(name: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdomain: subdomain.into(),
            ..Default::default()
        }
    }
}

/// Partial update from the app settings form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApp {
    pub name: Option<String>,
    pub subdomain: Option<String>,
    pub status: Option<AppStatus>,
    pub billing_tier: Option<BillingTier>,
    pub monthly_visits: Option<u64>,
    // `null` clears these three
    #[serde(default, deserialize_with = "nullable")]
    pub template: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_domain: Option<Option<String>>,
}

impl Record for App {
    type Key = String;
    type Draft = CreateApp;
    type Changes = UpdateApp;

    const ENTITY: &'static str = "app";

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateApp, stamp: Stamp) -> Self {
        App {
            id: stamp.id,
            name: draft.name,
            subdomain: draft.subdomain,
            // new apps always start building, whatever the caller sent
            status: AppStatus::Building,
            billing_tier: draft.billing_tier,
            monthly_visits: draft.monthly_visits,
            created_at: stamp.now,
            template: draft.template,
            description: draft.description,
            custom_domain: draft.custom_domain,
        }
    }

    fn apply(&mut self, changes: UpdateApp, _now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(subdomain) = changes.subdomain {
            self.subdomain = subdomain;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(tier) = changes.billing_tier {
            self.billing_tier = tier;
        }
        if let Some(visits) = changes.monthly_visits {
            self.monthly_visits = visits;
        }
        if let Some(template) = changes.template {
            self.template = template;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(custom_domain) = changes.custom_domain {
            self.custom_domain = custom_domain;
        }
    }
}

/// Aggregates shown in the dashboard header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_apps: usize,
    pub deployed_apps: usize,
    pub monthly_visits: u64,
    pub monthly_billing: u32,
}

impl DashboardSummary {
    pub fn from_apps(apps: &[App]) -> Self {
        Self {
            total_apps: apps.len(),
            deployed_apps: apps
                .iter()
                .filter(|app| app.status == AppStatus::Deployed)
                .count(),
            monthly_visits: apps.iter().map(|app| app.monthly_visits).sum(),
            monthly_billing: apps.iter().map(|app| app.billing_tier.monthly_price()).sum(),
        }
    }
}
