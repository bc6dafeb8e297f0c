// Generic CRUD endpoints, instantiated once per entity

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    api::routes::AppState,
    domain::{
        App, AuthProvider, BillingPlan, DatabaseFunction, DatabaseTable, Subscription, Webhook,
    },
    errors::{AppError, Result},
    services::{RecordService, Services},
    store::Record,
};

/// An entity exposed over HTTP
pub trait Resource: Record + Serialize {
    fn service(services: &Services) -> &RecordService<Self>;
}

impl Resource for App {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.apps
    }
}

impl Resource for DatabaseTable {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.database_tables
    }
}

impl Resource for AuthProvider {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.auth_providers
    }
}

impl Resource for BillingPlan {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.billing_plans
    }
}

impl Resource for Webhook {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.webhooks
    }
}

impl Resource for Subscription {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.subscriptions
    }
}

impl Resource for DatabaseFunction {
    fn service(services: &Services) -> &RecordService<Self> {
        &services.database_functions
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub app_id: Option<String>,
}

/// GET /v1/{resource}
pub async fn list<R: Resource>(
    State(services): State<Services>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<R>>> {
    let service = R::service(&services);
    let records = match params.app_id {
        Some(app_id) if R::APP_SCOPED => service.get_all_for_app(&app_id).await,
        Some(_) => {
            return Err(AppError::Validation(format!(
                "{} records cannot be filtered by appId",
                R::ENTITY
            )))
        }
        None => service.get_all().await,
    };
    Ok(Json(records))
}

/// GET /v1/{resource}/:key
pub async fn get_one<R>(
    State(services): State<Services>,
    Path(key): Path<R::Key>,
) -> Result<Json<R>>
where
    R: Resource,
    R::Key: DeserializeOwned,
{
    let record = R::service(&services).get_by_id(&key).await?;
    Ok(Json(record))
}

/// POST /v1/{resource}
pub async fn create<R>(
    State(services): State<Services>,
    Json(draft): Json<R::Draft>,
) -> Result<(StatusCode, Json<R>)>
where
    R: Resource,
    R::Draft: DeserializeOwned,
{
    let record = R::service(&services).create(draft).await?;
    tracing::info!("Created {} {}", R::ENTITY, record.key());
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /v1/{resource}/:key
pub async fn update<R>(
    State(services): State<Services>,
    Path(key): Path<R::Key>,
    Json(changes): Json<R::Changes>,
) -> Result<Json<R>>
where
    R: Resource,
    R::Key: DeserializeOwned,
    R::Changes: DeserializeOwned,
{
    let record = R::service(&services).update(&key, changes).await?;
    Ok(Json(record))
}

/// DELETE /v1/{resource}/:key
pub async fn remove<R>(
    State(services): State<Services>,
    Path(key): Path<R::Key>,
) -> Result<Json<Value>>
where
    R: Resource,
    R::Key: DeserializeOwned,
{
    let deleted = R::service(&services).delete(&key).await?;
    tracing::info!("Deleted {} {}", R::ENTITY, key);
    Ok(Json(json!({ "deleted": deleted })))
}

/// CRUD routes for one resource, to be nested under its collection path
pub fn routes<R>() -> Router<AppState>
where
    R: Resource,
    R::Key: DeserializeOwned,
    R::Draft: DeserializeOwned,
    R::Changes: DeserializeOwned,
{
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:key",
            get(get_one::<R>).patch(update::<R>).delete(remove::<R>),
        )
}
