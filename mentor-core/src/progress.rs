//! Progress derived from a plan record.
//!
//! Progress is never stored. It is recomputed from the plan and the
//! completed-task set on every read, so it cannot drift from the record it
//! describes.

use serde::{Deserialize, Serialize};

use crate::store::PlanRecord;

/// Snapshot of how far a student is through their plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Rounded percentage of tasks completed, 0..=100.
    pub overall_progress: u8,
    /// 1-based number of the first phase that still has open tasks; the
    /// last phase once everything is done.
    pub current_phase: u32,
    pub completed_tasks: usize,
}

impl Default for Progress {
    /// The "no plan yet" snapshot: zero progress, standing at phase 1.
    fn default() -> Self {
        Self { overall_progress: 0, current_phase: 1, completed_tasks: 0 }
    }
}

impl Progress {
    /// Derive progress from a record.
    ///
    /// Only ids that are actually part of the plan count, so a record whose
    /// completed set drifted (hand-edited file, replaced plan) still yields
    /// sane numbers.
    pub fn of(record: &PlanRecord) -> Self {
        let total = record.plan.total_task_count();
        if total == 0 {
            return Self::default();
        }

        let completed = record
            .plan
            .task_ids()
            .filter(|id| record.completed.contains(*id))
            .count();

        let overall = ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8;

        let current_phase = record
            .plan
            .phases
            .iter()
            .find(|phase| phase.tasks.iter().any(|task| !record.completed.contains(&task.task_id)))
            .or_else(|| record.plan.phases.last())
            .map(|phase| phase.phase_number)
            .unwrap_or(1);

        Self { overall_progress: overall, current_phase, completed_tasks: completed }
    }
}
