//! mentor-core: the goal-to-plan engine of the campus study assistant.
//!
//! Takes a student's free-text goal to a structured analysis, a phased
//! study plan, tracked progress, and a week-by-week workload schedule.
//! Every model-assisted step has a deterministic fallback, so the engine
//! keeps working with no model configured at all.
//!
//! Hosts inject the two effectful seams, [`TextModel`] and [`PlanStore`],
//! and pass "today" explicitly wherever dates matter.

pub mod allocator;
pub mod analyzer;
pub mod builder;
pub mod config;
pub mod drafts;
pub mod engine;
pub mod error;
pub mod goal;
pub mod model;
pub mod plan;
pub mod progress;
pub mod store;

pub use allocator::{
    allocate, Allocation, AllocatorConfig, BusySlot, DayAllocation, Intensity, UrgencyReason,
    UrgentItem, WorkItem, WorkloadAnalysis, WorkloadPlan,
};
pub use analyzer::{analyze, classify, fallback_goal};
pub use builder::{build, fallback_plan};
pub use config::EngineConfig;
pub use drafts::{generate_draft, to_fixed_template, DraftKind};
pub use engine::{AssignmentDigest, PlanOverview, StudyEngine, StudySchedule, TaskCompletion};
pub use error::{EngineError, Result};
pub use goal::{Difficulty, Goal, GoalAnalysis, GoalType};
pub use model::{ModelError, ModelRequest, NullModel, TextModel};
pub use plan::{AutomationPlan, Phase, Plan, Task, TaskPriority};
pub use progress::Progress;
pub use store::{MemoryPlanStore, PlanRecord, PlanStore, StoreError, StoreResult};
