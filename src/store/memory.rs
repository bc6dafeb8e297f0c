// In-memory record collection seeded from a fixture

use crate::errors::{StoreError, StoreResult};
use crate::store::record::Record;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ordered, mutex-guarded collection of records
///
/// Cloning the store clones the handle, not the records. Every accessor hands
/// back owned copies.
pub struct FixtureStore<R: Record> {
    records: Arc<Mutex<Vec<R>>>,
}

impl<R: Record> Clone for FixtureStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: Record> FixtureStore<R> {
    /// Create a store from seed records, rejecting duplicate keys
    pub fn seeded(seed: Vec<R>) -> StoreResult<Self> {
        for (idx, record) in seed.iter().enumerate() {
            if seed[..idx].iter().any(|other| other.key() == record.key()) {
                return Err(StoreError::conflict(R::ENTITY, record.key()));
            }
        }

        Ok(Self {
            records: Arc::new(Mutex::new(seed)),
        })
    }

    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn all(&self) -> Vec<R> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn find(&self, key: &R::Key) -> StoreResult<R> {
        self.records
            .lock()
            .await
            .iter()
            .find(|record| record.key() == key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::ENTITY, key))
    }

    /// Append a record built by `make`, which receives a predicate telling it
    /// whether a candidate id is already taken
    pub async fn insert_with<F>(&self, make: F) -> StoreResult<R>
    where
        F: FnOnce(&dyn Fn(&str) -> bool) -> R,
    {
        let mut records = self.records.lock().await;

        let record = {
            let taken = |candidate: &str| {
                records
                    .iter()
                    .any(|record| record.key().to_string() == candidate)
            };
            make(&taken)
        };

        if records.iter().any(|existing| existing.key() == record.key()) {
            return Err(StoreError::conflict(R::ENTITY, record.key()));
        }

        records.push(record.clone());
        Ok(record)
    }

    /// Mutate the record under `key` in place and return a copy of the result
    pub async fn modify<F>(&self, key: &R::Key, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut R),
    {
        self.modify_with(key, f).await.map(|(record, ())| record)
    }

    /// Like `modify`, also handing back what `f` returned
    ///
    /// `f` only runs when the key exists.
    pub async fn modify_with<F, T>(&self, key: &R::Key, f: F) -> StoreResult<(R, T)>
    where
        F: FnOnce(&mut R) -> T,
    {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| record.key() == key)
            .ok_or_else(|| StoreError::not_found(R::ENTITY, key))?;

        let output = f(record);
        Ok((record.clone(), output))
    }

    pub async fn remove(&self, key: &R::Key) -> StoreResult<R> {
        let mut records = self.records.lock().await;
        let idx = records
            .iter()
            .position(|record| record.key() == key)
            .ok_or_else(|| StoreError::not_found(R::ENTITY, key))?;

        Ok(records.remove(idx))
    }
}
