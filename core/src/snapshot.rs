use crate::analytics::Analytics;
use crate::error::Result;
use crate::loader::{load_analytics, load_catalog, DataPaths};
use crate::recommend::{Recommender, SelfExclusion};
use parking_lot::RwLock;
use std::sync::Arc;

/// Everything a request reads, built in one go from a data directory.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub recommender: Recommender,
    pub analytics: Analytics,
}

impl Snapshot {
    pub fn load(paths: &DataPaths, exclusion: SelfExclusion) -> Result<Self> {
        let catalog = load_catalog(&paths.catalog())?;
        let recommender = Recommender::build(catalog)?.with_exclusion(exclusion);
        let analytics = load_analytics(paths)?;
        Ok(Self { recommender, analytics })
    }
}

/// Publish-once, read-many cell.
///
/// Readers take an `Arc` of the current value and keep it for as long as they
/// need; [`SharedSnapshot::publish`] swaps the whole value in a single write.
#[derive(Debug)]
pub struct SharedSnapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SharedSnapshot<T> {
    pub fn new(value: T) -> Self {
        Self { current: RwLock::new(Arc::new(value)) }
    }

    pub fn load(&self) -> Arc<T> {
        self.current.read().clone()
    }

    /// Replace the current value, returning the previous one.
    pub fn publish(&self, value: T) -> Arc<T> {
        let next = Arc::new(value);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
