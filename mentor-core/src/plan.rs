//! Plan, phase, and task model.
//!
//! A [`Plan`] is a fixed tree: phases in order, each phase holding ordered
//! tasks. Task ids are unique across the whole plan and are the handle the
//! rest of the system uses (completion, progress). Plans do not change after
//! creation; only completion state does.

use serde::{Deserialize, Serialize};

/// Task priority as shown to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// One unit of work inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique within the plan, `task-1`, `task-2`, ... in phase order.
    pub task_id: String,
    pub task_name: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Whether the platform can do this for the student (scheduling,
    /// reminders) as opposed to work only they can do.
    pub can_automate: bool,
    /// Human-readable effort estimate, e.g. "3 hours".
    pub estimated_time: String,
    /// Relative deadline hint, e.g. "end of week 2". Free-form.
    pub deadline: String,
}

impl Task {
    pub fn new(task_id: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_name: task_name.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            can_automate: false,
            estimated_time: String::new(),
            deadline: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Flag the task as something the platform can run on the student's
    /// behalf.
    pub fn automatable(mut self) -> Self {
        self.can_automate = true;
        self
    }

    pub fn with_estimate(mut self, estimated_time: impl Into<String>) -> Self {
        self.estimated_time = estimated_time.into();
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = deadline.into();
        self
    }
}

/// A numbered stage of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// 1-based position, matches the order in `Plan::phases`.
    pub phase_number: u32,
    pub phase_name: String,
    /// Human-readable span, e.g. "1-2 weeks".
    pub duration: String,
    pub description: String,
    pub tasks: Vec<Task>,
}

/// Split of the plan's tasks into platform-automatable and student-owned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationPlan {
    pub automatable: Vec<String>,
    pub manual: Vec<String>,
}

/// The full study plan for one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub plan_title: String,
    /// Overall span, e.g. "4-8 weeks".
    pub total_duration: String,
    pub phases: Vec<Phase>,
    pub automation_plan: AutomationPlan,
}

impl Plan {
    /// Number of tasks across all phases.
    pub fn total_task_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.tasks.len()).sum()
    }

    /// Look up a task anywhere in the plan.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.phases
            .iter()
            .flat_map(|phase| phase.tasks.iter())
            .find(|task| task.task_id == task_id)
    }

    /// All task ids in phase order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.phases
            .iter()
            .flat_map(|phase| phase.tasks.iter())
            .map(|task| task.task_id.as_str())
    }

    /// Rewrite task ids to `task-1..task-N` in phase order and renumber
    /// phases `1..M`. Applied to every plan before it is stored, so ids stay
    /// unique even when a model reply reused or omitted them.
    pub fn renumber(&mut self) {
        let mut next = 1u32;
        for (index, phase) in self.phases.iter_mut().enumerate() {
            phase.phase_number = index as u32 + 1;
            for task in &mut phase.tasks {
                task.task_id = format!("task-{next}");
                next += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_phase_plan() -> Plan {
        Plan {
            plan_title: "Study plan: pass algorithms".to_string(),
            total_duration: "4-8 weeks".to_string(),
            phases: vec![
                Phase {
                    phase_number: 7,
                    phase_name: "Foundation".to_string(),
                    duration: "1-2 weeks".to_string(),
                    description: "Basics".to_string(),
                    tasks: vec![
                        Task::new("x", "Read chapter one"),
                        Task::new("x", "Solve warmups").with_priority(TaskPriority::High),
                    ],
                },
                Phase {
                    phase_number: 9,
                    phase_name: "Practice".to_string(),
                    duration: "2 weeks".to_string(),
                    description: "Problem sets".to_string(),
                    tasks: vec![Task::new("y", "Weekly set").automatable()],
                },
            ],
            automation_plan: AutomationPlan::default(),
        }
    }

    #[test]
    fn test_renumber_assigns_sequential_ids() {
        let mut plan = two_phase_plan();
        plan.renumber();

        let ids: Vec<&str> = plan.task_ids().collect();
        assert_eq!(ids, vec!["task-1", "task-2", "task-3"]);
        assert_eq!(plan.phases[0].phase_number, 1);
        assert_eq!(plan.phases[1].phase_number, 2);
    }

    #[test]
    fn test_task_lookup_spans_phases() {
        let mut plan = two_phase_plan();
        plan.renumber();

        assert_eq!(plan.task("task-3").map(|t| t.task_name.as_str()), Some("Weekly set"));
        assert!(plan.task("task-9").is_none());
        assert_eq!(plan.total_task_count(), 3);
    }

    #[test]
    fn test_task_builders() {
        let task = Task::new("task-1", "Draft outline")
            .with_description("One page")
            .with_priority(TaskPriority::Low)
            .with_estimate("2 hours")
            .with_deadline("end of week 1")
            .automatable();

        assert_eq!(task.priority, TaskPriority::Low);
        assert!(task.can_automate);
        assert_eq!(task.estimated_time, "2 hours");
    }

    #[test]
    fn test_plan_wire_shape_is_camel_case() {
        let mut plan = two_phase_plan();
        plan.renumber();
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"planTitle\""));
        assert!(json.contains("\"phaseNumber\""));
        assert!(json.contains("\"canAutomate\""));
        assert!(json.contains("\"automationPlan\""));
    }
}
