pub mod app;
pub mod auth_provider;
pub mod billing_plan;
pub mod database_function;
pub mod database_table;
pub mod subscription;
pub mod webhook;

use serde::{Deserialize, Deserializer};

pub use app::{App, AppStatus, BillingTier, CreateApp, DashboardSummary, UpdateApp};
pub use auth_provider::{AuthProvider, AuthProviderType, CreateAuthProvider, UpdateAuthProvider};
pub use billing_plan::{BillingPlan, CreateBillingPlan, PlanPrice, UpdateBillingPlan};
pub use database_function::{
    CreateDatabaseFunction, DatabaseFunction, FunctionArgument, FunctionLanguage,
    UpdateDatabaseFunction,
};
pub use database_table::{
    CreateDatabaseTable, DatabaseTable, FieldType, Relationship, RelationshipKind, TableField,
    UpdateDatabaseTable,
};
pub use subscription::{
    CreateSubscription, Subscription, SubscriptionProtocol, SubscriptionStatus,
    UpdateSubscription,
};
pub use webhook::{
    CreateWebhook, TableEvent, UpdateWebhook, Webhook, WebhookService, WebhookSimulator,
    WebhookStatus, WebhookTestResult,
};

/// Reads a clearable field of a partial update: an absent field stays `None`,
/// an explicit `null` becomes `Some(None)`
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
