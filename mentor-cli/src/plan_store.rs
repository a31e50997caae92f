//! JSON-file [`PlanStore`] backend: one file per user under
//! `~/.mentor/plans/`.
//!
//! A single process-wide mutex serializes every read-modify-write, which
//! satisfies the store contract's per-user exclusivity. Plenty for a CLI;
//! a server deployment would swap in a database-backed store instead.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use mentor_core::{PlanRecord, PlanStore, StoreError, StoreResult};

pub struct JsonPlanStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonPlanStore {
    pub fn new(dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Backend(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir, lock: Mutex::new(()) })
    }

    /// User ids become file names, so only a conservative character set is
    /// accepted.
    fn path_for(&self, user_id: &str) -> StoreResult<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid || user_id.starts_with('.') {
            return Err(StoreError::Backend(format!("invalid user id: {user_id:?}")));
        }
        Ok(self.dir.join(format!("{user_id}.json")))
    }

    fn read(&self, user_id: &str) -> StoreResult<Option<PlanRecord>> {
        let path = self.path_for(user_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| StoreError::Backend(format!("read {}: {e}", path.display())))?;
        let record = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))?;
        Ok(Some(record))
    }

    fn write(&self, user_id: &str, record: &PlanRecord) -> StoreResult<()> {
        let path = self.path_for(user_id)?;
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Backend(format!("serialize record: {e}")))?;
        fs::write(&path, json)
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", path.display())))
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlanStore for JsonPlanStore {
    fn set(&self, user_id: &str, record: PlanRecord) -> StoreResult<()> {
        let _guard = self.guard();
        self.write(user_id, &record)
    }

    fn get(&self, user_id: &str) -> StoreResult<Option<PlanRecord>> {
        let _guard = self.guard();
        self.read(user_id)
    }

    fn update(&self, user_id: &str, apply: &mut dyn FnMut(&mut PlanRecord)) -> StoreResult<bool> {
        let _guard = self.guard();
        match self.read(user_id)? {
            Some(mut record) => {
                apply(&mut record);
                self.write(user_id, &record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
