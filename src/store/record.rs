// Record contract shared by every entity kept in a fixture store

use chrono::{DateTime, Utc};
use std::fmt::{Debug, Display};

/// Values the store assigns when a record is created
#[derive(Debug, Clone)]
pub struct Stamp {
    pub id: String,
    pub now: DateTime<Utc>,
}

/// An entity that can live in a [`FixtureStore`](super::FixtureStore)
///
/// `Draft` is what a caller supplies to `create`, `Changes` is the typed partial
/// update merged by `update`. Neither carries the key, so a stored record's key
/// never changes after creation.
pub trait Record: Clone + Send + Sync + 'static {
    type Key: Clone + PartialEq + Debug + Display + Send + Sync + 'static;
    type Draft: Send + 'static;
    type Changes: Send + 'static;

    /// Human readable entity name, used in errors, logs and metric labels
    const ENTITY: &'static str;

    /// Whether records belong to an app and can be filtered by it
    const APP_SCOPED: bool = false;

    fn key(&self) -> &Self::Key;

    /// Build a new record from a draft and the store-assigned stamp
    fn build(draft: Self::Draft, stamp: Stamp) -> Self;

    /// Merge the fields present in `changes` over this record
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);

    /// Owning app, for app-scoped entities (see `APP_SCOPED`)
    fn app_id(&self) -> Option<&str> {
        None
    }
}
