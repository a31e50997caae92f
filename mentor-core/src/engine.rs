//! Engine facade.
//!
//! One struct, one method per operation the host application exposes. The
//! engine owns no I/O: the text model and the plan store are injected, and
//! "today" is a parameter wherever dates matter. Hosts (CLI, server) stay
//! thin; everything with behavior worth testing lives here or below.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocator::{self, Allocation, BusySlot, Intensity, UrgencyReason, UrgentItem, WorkItem, WorkloadAnalysis};
use crate::analyzer;
use crate::builder;
use crate::config::EngineConfig;
use crate::drafts::{self, DraftKind};
use crate::error::Result;
use crate::goal::{Goal, GoalAnalysis};
use crate::model::{self, TextModel};
use crate::plan::Plan;
use crate::progress::Progress;
use crate::store::{PlanRecord, PlanStore};

/// What a user currently has, rendered unconditionally: `has_plan` false
/// means the other two fields are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOverview {
    pub has_plan: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub progress: Option<Progress>,
}

/// Outcome of a completion attempt. `success` false means the task id is
/// not part of the user's plan (or there is no plan); progress is returned
/// either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub success: bool,
    pub progress: Progress,
}

/// The week ahead: allocations clipped to the analysis window, plus
/// deterministic recommendation lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySchedule {
    pub weekly: Vec<Allocation>,
    pub recommendations: Vec<String>,
}

/// Full answer to "how do I handle my assignments": aggregate analysis,
/// urgent list, and the week's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDigest {
    pub workload_analysis: WorkloadAnalysis,
    pub urgent_tasks: Vec<UrgentItem>,
    pub study_schedule: StudySchedule,
}

/// The goal-to-plan engine.
pub struct StudyEngine {
    model: Arc<dyn TextModel>,
    store: Arc<dyn PlanStore>,
    config: EngineConfig,
}

impl StudyEngine {
    pub fn new(model: Arc<dyn TextModel>, store: Arc<dyn PlanStore>, config: EngineConfig) -> Self {
        Self { model, store, config }
    }

    /// Turn free text into a structured goal. `requires_input` tells the
    /// caller whether showing the clarifying questions is worth a round
    /// trip before plan creation.
    pub fn understand_goals(&self, goal_text: &str, context: &[(String, String)]) -> Result<GoalAnalysis> {
        let analysis = analyzer::analyze(self.model.as_ref(), goal_text, context)?;
        let requires_input = !analysis.clarifying_questions.is_empty();
        Ok(GoalAnalysis { analysis, requires_input })
    }

    /// Build a plan for the goal and store it as the user's active plan,
    /// replacing any previous one. Completion state starts empty.
    pub fn create_plan(&self, user_id: &str, goal: &Goal, answers: &[(String, String)]) -> Result<Plan> {
        let plan = builder::build(self.model.as_ref(), goal, answers)?;
        self.store.set(user_id, PlanRecord::new(plan.clone()))?;
        debug!(user_id, tasks = plan.total_task_count(), "stored new plan");
        Ok(plan)
    }

    /// The user's active plan with derived progress, or an empty overview.
    pub fn my_plan(&self, user_id: &str) -> Result<PlanOverview> {
        match self.store.get(user_id)? {
            Some(record) => {
                let progress = Progress::of(&record);
                Ok(PlanOverview { has_plan: true, plan: Some(record.plan), progress: Some(progress) })
            }
            None => Ok(PlanOverview { has_plan: false, plan: None, progress: None }),
        }
    }

    /// Mark a task complete. Idempotent: completing a task twice reports
    /// success twice and moves nothing the second time.
    pub fn complete_task(&self, user_id: &str, task_id: &str) -> Result<TaskCompletion> {
        let mut marked = false;
        let mut progress = Progress::default();
        let found = self.store.update(user_id, &mut |record| {
            marked = record.complete(task_id);
            progress = Progress::of(record);
        })?;
        if !found {
            debug!(user_id, task_id, "completion attempt without an active plan");
        }
        Ok(TaskCompletion { success: found && marked, progress })
    }

    /// Derived progress; the zero snapshot when the user has no plan.
    pub fn get_progress(&self, user_id: &str) -> Result<Progress> {
        Ok(self
            .store
            .get(user_id)?
            .as_ref()
            .map(Progress::of)
            .unwrap_or_default())
    }

    /// Allocate study time for the given assignments and summarize the week
    /// ahead. Pure apart from the injected `today`.
    pub fn manage_assignments(
        &self,
        items: &[WorkItem],
        busy: &[BusySlot],
        today: NaiveDate,
    ) -> AssignmentDigest {
        let plan = allocator::allocate(items, busy, today, &self.config.allocator);
        let study_schedule = self.weekly_schedule(&plan, today);
        debug!(
            items = items.len(),
            urgent = plan.urgent.len(),
            intensity = ?plan.analysis.intensity,
            "allocated study schedule"
        );
        AssignmentDigest {
            workload_analysis: plan.analysis,
            urgent_tasks: plan.urgent,
            study_schedule,
        }
    }

    /// Draft an assignment document. Model text is framed by the fixed
    /// template; without a model the whole draft comes from the template
    /// skeleton.
    pub fn draft_document(
        &self,
        title: &str,
        problem_statement: &str,
        requirements: &[String],
        kind: DraftKind,
    ) -> String {
        let request = model::draft_prompt(title, problem_statement, requirements, kind);
        match self.model.generate(&request) {
            Ok(reply) if !reply.trim().is_empty() => drafts::to_fixed_template(reply.trim(), title),
            Ok(_) => {
                warn!(title, "empty draft reply, using the skeleton");
                drafts::generate_draft(title, problem_statement, requirements, kind)
            }
            Err(error) => {
                warn!(%error, title, "draft model call failed, using the skeleton");
                drafts::generate_draft(title, problem_statement, requirements, kind)
            }
        }
    }

    fn weekly_schedule(&self, plan: &allocator::WorkloadPlan, today: NaiveDate) -> StudySchedule {
        let window_end = today + Duration::days(self.config.allocator.analysis_window_days);
        let weekly: Vec<Allocation> = plan
            .per_item
            .iter()
            .filter_map(|allocation| {
                let entries: Vec<_> = allocation
                    .entries
                    .iter()
                    .filter(|entry| entry.date < window_end)
                    .cloned()
                    .collect();
                if entries.is_empty() {
                    None
                } else {
                    Some(Allocation { entries, ..allocation.clone() })
                }
            })
            .collect();

        StudySchedule { weekly, recommendations: recommendations(plan) }
    }
}

/// Fixed-form recommendation lines: one per urgent item (most pressing
/// first), then one line for the overall load.
fn recommendations(plan: &allocator::WorkloadPlan) -> Vec<String> {
    let mut lines = Vec::new();
    for urgent in &plan.urgent {
        let detail = match urgent.reason {
            UrgencyReason::Overdue => "due today or already past".to_string(),
            UrgencyReason::InsufficientTime => format!(
                "{:.1}h will not fit before the deadline",
                urgent.unallocated_hours
            ),
            UrgencyReason::DueSoon => format!("due in {} day(s)", urgent.days_remaining),
        };
        lines.push(format!("Start '{}' first: {}.", urgent.title, detail));
    }
    match plan.analysis.intensity {
        Intensity::High => lines.push(format!(
            "Heavy week: {:.1}h due within the window. Block study time before anything else.",
            plan.analysis.hours_due_within_week
        )),
        Intensity::Medium => {
            lines.push("Moderate week. Keep the daily sessions and the backlog stays flat.".to_string())
        }
        Intensity::Low => {
            lines.push("Light week. Good window to get ahead of later deadlines.".to_string())
        }
    }
    lines
}
