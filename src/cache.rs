use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::season::SeasonId;

/// Per-season memo of fetch results. Lives as long as its owner; seasons are never mixed.
#[derive(Debug)]
pub struct SeasonCache<T> {
    entries: Mutex<HashMap<SeasonId, T>>,
}

impl<T> Default for SeasonCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> SeasonCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, season: SeasonId) -> Option<T> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(&season).cloned()
    }

    pub fn insert(&self, season: SeasonId, value: T) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(season, value);
    }

    /// Returns the cached value for `season`, or runs `load` and caches a success.
    /// Failures are not cached so the next call retries.
    pub fn get_or_try_insert_with<E, F>(&self, season: SeasonId, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(hit) = self.get(season) {
            tracing::debug!(%season, "season cache hit");
            return Ok(hit);
        }
        // Lock is not held across `load`: concurrent misses both load, last insert wins.
        let value = load()?;
        self.insert(season, value.clone());
        Ok(value)
    }

    pub fn contains(&self, season: SeasonId) -> bool {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.contains_key(&season)
    }

    pub fn len(&self) -> usize {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remove(&self, season: SeasonId) -> Option<T> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(&season)
    }

    pub fn clear(&self) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
    }
}
