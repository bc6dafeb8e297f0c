// Latency-simulating CRUD service over a fixture store

use crate::errors::{StoreError, StoreResult};
use crate::observability::MetricsRecorder;
use crate::services::ServiceContext;
use crate::store::{FixtureStore, LatencyProfile, Operation, Record, Stamp};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

// Upper bound on id redraws when the generator keeps returning taken ids
const MAX_ID_ATTEMPTS: usize = 1024;

/// Asynchronous CRUD facade over one entity's store
///
/// Every operation first waits out its simulated delay and only then touches the
/// store, so concurrent calls take effect in the order their delays expire. The
/// delay and the mutation run on their own task: a caller that stops awaiting
/// does not stop the mutation.
pub struct RecordService<R: Record> {
    store: FixtureStore<R>,
    latency: LatencyProfile,
    ctx: ServiceContext,
}

impl<R: Record> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            latency: self.latency,
            ctx: self.ctx.clone(),
        }
    }
}

impl<R: Record> RecordService<R> {
    pub fn new(store: FixtureStore<R>, latency: LatencyProfile, ctx: ServiceContext) -> Self {
        Self {
            store,
            latency,
            ctx,
        }
    }

    pub fn store(&self) -> &FixtureStore<R> {
        &self.store
    }

    pub fn latency(&self) -> &LatencyProfile {
        &self.latency
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.ctx.clock.now()
    }

    /// Every record, in insertion order
    #[tracing::instrument(skip_all, fields(entity = R::ENTITY))]
    pub async fn get_all(&self) -> Vec<R> {
        let listed = self
            .run(Operation::GetAll, |service| async move {
                let records = service.store.all().await;
                tracing::debug!(count = records.len(), "Listed records");
                Ok(records)
            })
            .await;

        // listing cannot fail; an interrupted task reads as an empty store
        listed.unwrap_or_default()
    }

    /// Records belonging to one app, in insertion order
    pub async fn get_all_for_app(&self, app_id: &str) -> Vec<R> {
        self.get_all()
            .await
            .into_iter()
            .filter(|record| record.app_id() == Some(app_id))
            .collect()
    }

    #[tracing::instrument(skip_all, fields(entity = R::ENTITY, key = %key))]
    pub async fn get_by_id(&self, key: &R::Key) -> StoreResult<R> {
        let key = key.clone();
        self.run(Operation::GetById, move |service| async move {
            service.store.find(&key).await
        })
        .await
    }

    #[tracing::instrument(skip_all, fields(entity = R::ENTITY))]
    pub async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        self.run(Operation::Create, move |service| async move {
            let now = service.now();
            let ids = &service.ctx.ids;

            let result = service
                .store
                .insert_with(move |taken| {
                    let mut id = ids.next_id();
                    for _ in 1..MAX_ID_ATTEMPTS {
                        if !taken(id.as_str()) {
                            break;
                        }
                        id = ids.next_id();
                    }
                    R::build(draft, Stamp { id, now })
                })
                .await;

            if let Ok(record) = &result {
                tracing::debug!(key = %record.key(), "Record created");
                MetricsRecorder::set_store_records(R::ENTITY, service.store.len().await);
            }
            result
        })
        .await
    }

    #[tracing::instrument(skip_all, fields(entity = R::ENTITY, key = %key))]
    pub async fn update(&self, key: &R::Key, changes: R::Changes) -> StoreResult<R> {
        let key = key.clone();
        self.run(Operation::Update, move |service| async move {
            let now = service.now();
            let result = service
                .store
                .modify(&key, move |record| record.apply(changes, now))
                .await;

            if result.is_ok() {
                tracing::debug!("Record updated");
            }
            result
        })
        .await
    }

    #[tracing::instrument(skip_all, fields(entity = R::ENTITY, key = %key))]
    pub async fn delete(&self, key: &R::Key) -> StoreResult<bool> {
        let key = key.clone();
        self.run(Operation::Delete, move |service| async move {
            let removed = service.store.remove(&key).await.map(|_| true);
            if removed.is_ok() {
                tracing::debug!("Record deleted");
                MetricsRecorder::set_store_records(R::ENTITY, service.store.len().await);
            }
            removed
        })
        .await
    }

    /// Wait out the delay for `operation`, then run `body` and record the outcome
    ///
    /// Both happen on a spawned task, so dropping the returned future leaves the
    /// operation to finish on its own.
    pub(crate) async fn run<T, F, Fut>(&self, operation: Operation, body: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let service = self.clone();
        let task = tokio::spawn(
            async move {
                let started = Instant::now();
                service.pause(operation).await;

                let result = body(service.clone()).await;
                service.record_outcome(operation, &result, started);
                result
            }
            .in_current_span(),
        );

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!(error = %e, operation = operation.as_str(), "Store task cancelled");
                Err(StoreError::interrupted(R::ENTITY, operation.as_str()))
            }
        }
    }

    fn record_outcome<T>(&self, operation: Operation, result: &StoreResult<T>, started: Instant) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => {
                tracing::debug!(error = %e, operation = operation.as_str(), "Store operation failed");
                e.kind()
            }
        };
        MetricsRecorder::record_store_operation(R::ENTITY, operation.as_str(), outcome);
        MetricsRecorder::record_store_latency(
            R::ENTITY,
            operation.as_str(),
            started.elapsed().as_secs_f64(),
        );
    }

    async fn pause(&self, operation: Operation) {
        self.ctx.delay.pause(self.latency.delay_for(operation)).await;
    }
}
