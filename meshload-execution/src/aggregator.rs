//! Per-request response aggregation

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use meshload_core::TaskResponse;

/// Lock-guarded accumulator of stressor fragments for one request.
///
/// `merge` appends a fragment's services and execution times in a single
/// critical section, so the two lists of every kind stay index-aligned no
/// matter how many threads merge concurrently.
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    tasks: Mutex<BTreeMap<String, TaskResponse>>,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `fragment` into the results of `kind`
    pub fn merge(&self, kind: &str, fragment: TaskResponse) {
        // The critical section cannot panic, so a poisoned lock still holds aligned data
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        match tasks.get_mut(kind) {
            Some(existing) => existing.extend(fragment),
            None => {
                tasks.insert(kind.to_string(), fragment);
            }
        }
    }

    /// Copy of the merged results
    pub fn snapshot(&self) -> BTreeMap<String, TaskResponse> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take the merged results once every writer has joined
    pub fn into_tasks(self) -> BTreeMap<String, TaskResponse> {
        self.tasks.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
