//! Per-user plan storage.
//!
//! The engine owns the storage contract, not the backend: hosts inject any
//! [`PlanStore`] implementation (the in-memory one here, the JSON file store
//! in the CLI, a database in a server). One record per user; creating a plan
//! replaces the old record wholesale.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::Plan;

/// Backend failure while reading or writing a record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("plan store backend: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A user's active plan plus its completion state.
///
/// Completion is a set of task ids rather than a counter, so marking the
/// same task twice cannot move progress twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub plan: Plan,
    pub completed: HashSet<String>,
}

impl PlanRecord {
    pub fn new(plan: Plan) -> Self {
        Self { plan, completed: HashSet::new() }
    }

    /// Mark a task complete. Returns `false` when the id is not part of the
    /// plan; marking an already-completed task again returns `true` and
    /// changes nothing.
    pub fn complete(&mut self, task_id: &str) -> bool {
        if self.plan.task(task_id).is_none() {
            return false;
        }
        self.completed.insert(task_id.to_string());
        true
    }
}

/// Keyed plan storage.
///
/// Implementations must run each [`PlanStore::update`] closure exclusively
/// per user key. The progress numbers assume completion writes for one user
/// never interleave; cross-user operations are free to run concurrently.
pub trait PlanStore: Send + Sync {
    /// Store (or replace) the user's record.
    fn set(&self, user_id: &str, record: PlanRecord) -> StoreResult<()>;

    /// Fetch a copy of the user's record, if any.
    fn get(&self, user_id: &str) -> StoreResult<Option<PlanRecord>>;

    /// Apply `apply` to the user's record in place. `Ok(false)` when the
    /// user has no record; the closure is not called in that case.
    fn update(&self, user_id: &str, apply: &mut dyn FnMut(&mut PlanRecord)) -> StoreResult<bool>;
}

/// Reference store backed by a mutex-guarded map. The single lock is what
/// provides the per-user exclusivity the trait demands.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    records: Mutex<HashMap<String, PlanRecord>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, PlanRecord>> {
        // A poisoned lock means a panicking closure, not a corrupt map;
        // recover the guard and keep serving.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlanStore for MemoryPlanStore {
    fn set(&self, user_id: &str, record: PlanRecord) -> StoreResult<()> {
        self.records().insert(user_id.to_string(), record);
        Ok(())
    }

    fn get(&self, user_id: &str) -> StoreResult<Option<PlanRecord>> {
        Ok(self.records().get(user_id).cloned())
    }

    fn update(&self, user_id: &str, apply: &mut dyn FnMut(&mut PlanRecord)) -> StoreResult<bool> {
        let mut records = self.records();
        match records.get_mut(user_id) {
            Some(record) => {
                apply(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
