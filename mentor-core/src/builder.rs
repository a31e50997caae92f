//! Plan building: analyzed goal in, phased [`Plan`] out.
//!
//! Same two-path shape as goal analysis. The model path asks for a full
//! plan as JSON and normalizes the reply before it leaves: phases and task
//! ids renumbered, automation split rederived from the task flags. The
//! deterministic path instantiates a fixed foundation / development /
//! mastery template that is already in normal form.

use tracing::warn;

use crate::error::{EngineError, Result};
use crate::goal::Goal;
use crate::model::{self, TextModel};
use crate::plan::{AutomationPlan, Phase, Plan, Task, TaskPriority};

/// Build a plan for an analyzed goal.
///
/// `answers` pairs clarifying questions with the student's answers; they
/// only influence the model path. Errors on a goal without a main goal
/// line; model trouble is handled internally.
pub fn build(model: &dyn TextModel, goal: &Goal, answers: &[(String, String)]) -> Result<Plan> {
    if goal.main_goal.trim().is_empty() {
        return Err(EngineError::invalid_input("goal must carry a main goal line"));
    }
    let plan = match model_plan(model, goal, answers) {
        Some(mut plan) => {
            plan.renumber();
            derive_automation(&mut plan);
            plan
        }
        None => fallback_plan(goal),
    };
    Ok(plan)
}

fn model_plan(model: &dyn TextModel, goal: &Goal, answers: &[(String, String)]) -> Option<Plan> {
    let request = model::plan_prompt(goal, answers);
    match model.generate(&request) {
        Ok(reply) => {
            let plan = parse_plan_reply(&reply, goal);
            if plan.is_none() {
                warn!(main_goal = %goal.main_goal, "unusable plan reply, taking the template path");
            }
            plan
        }
        Err(error) => {
            warn!(%error, main_goal = %goal.main_goal, "plan model call failed, taking the template path");
            None
        }
    }
}

/// Accept a model reply only if it parses into a plan with at least one
/// phase and no empty phases. A blank title is patched from the goal.
fn parse_plan_reply(reply: &str, goal: &Goal) -> Option<Plan> {
    let value = model::extract_json(reply)?;
    let mut plan: Plan = serde_json::from_value(value).ok()?;
    if plan.plan_title.trim().is_empty() {
        plan.plan_title = format!("Study plan: {}", goal.main_goal);
    }
    let usable = !plan.phases.is_empty() && plan.phases.iter().all(|phase| !phase.tasks.is_empty());
    usable.then_some(plan)
}

/// Rebuild a model reply's automation split from the per-task flags; the
/// reply's own lists are ignored.
fn derive_automation(plan: &mut Plan) {
    let mut automatable = Vec::new();
    let mut manual = Vec::new();
    for phase in &plan.phases {
        for task in &phase.tasks {
            if task.can_automate {
                automatable.push(task.task_name.clone());
            } else {
                manual.push(task.task_name.clone());
            }
        }
    }
    plan.automation_plan.automatable = automatable;
    plan.automation_plan.manual = manual;
}

/// Deterministic three-phase template, nine tasks total.
///
/// Generic on purpose: it keeps the flow alive when no model is reachable.
/// The automation split is fixed at three platform-runnable tasks
/// (scheduling, reminders, booking the mock) against three representative
/// study tasks, one of each per phase.
pub fn fallback_plan(goal: &Goal) -> Plan {
    let phases = vec![
        Phase {
            phase_number: 1,
            phase_name: "Foundation Phase".to_string(),
            duration: "1-2 weeks".to_string(),
            description: "Set up the ground work: schedule, materials, first pass over the fundamentals."
                .to_string(),
            tasks: vec![
                Task::new("task-1", "Set up a weekly study schedule")
                    .with_description("Block recurring study time around existing commitments.")
                    .with_priority(TaskPriority::High)
                    .automatable()
                    .with_estimate("1 hour")
                    .with_deadline("start of week 1"),
                Task::new("task-2", "Collect syllabus, materials, and resources")
                    .with_description("Gather everything needed so later weeks lose no time to searching.")
                    .with_estimate("2 hours")
                    .with_deadline("end of week 1"),
                Task::new("task-3", "First pass over the fundamentals")
                    .with_description("Cover the core material once, breadth before depth.")
                    .with_priority(TaskPriority::High)
                    .with_estimate("6 hours")
                    .with_deadline("end of week 2"),
            ],
        },
        Phase {
            phase_number: 2,
            phase_name: "Development Phase".to_string(),
            duration: "2-4 weeks".to_string(),
            description: "Put the material to work through regular practice and a small build."
                .to_string(),
            tasks: vec![
                Task::new("task-4", "Enable progress reminders and check-ins")
                    .with_description("Weekly nudge with the next milestone and the current completion rate.")
                    .with_priority(TaskPriority::Low)
                    .automatable()
                    .with_estimate("30 minutes")
                    .with_deadline("start of week 3"),
                Task::new("task-5", "Complete practice exercises for each new topic")
                    .with_description("Exercises immediately after each topic, while it is fresh.")
                    .with_priority(TaskPriority::High)
                    .with_estimate("8 hours")
                    .with_deadline("end of week 4"),
                Task::new("task-6", "Build a small project applying the material")
                    .with_description("Something end-to-end and scoped to a weekend, not a thesis.")
                    .with_estimate("10 hours")
                    .with_deadline("end of week 5"),
            ],
        },
        Phase {
            phase_number: 3,
            phase_name: "Mastery Phase".to_string(),
            duration: "1-2 weeks".to_string(),
            description: "Close the gaps and prove the goal is met.".to_string(),
            tasks: vec![
                Task::new("task-7", "Schedule a mock assessment")
                    .with_description("Book a realistic dry run under real conditions.")
                    .automatable()
                    .with_estimate("30 minutes")
                    .with_deadline("start of week 6"),
                Task::new("task-8", "Review weak areas from the mock")
                    .with_description("Targeted review of whatever the dry run exposed.")
                    .with_priority(TaskPriority::High)
                    .with_estimate("4 hours")
                    .with_deadline("end of week 6"),
                Task::new("task-9", "Final self-assessment and write-up")
                    .with_description("Judge the result against the goal and note what comes next.")
                    .with_estimate("3 hours")
                    .with_deadline("end of week 7"),
            ],
        },
    ];

    Plan {
        plan_title: format!("Study plan: {}", goal.main_goal),
        total_duration: "4-8 weeks".to_string(),
        phases,
        automation_plan: AutomationPlan {
            automatable: vec![
                "Set up a weekly study schedule".to_string(),
                "Enable progress reminders and check-ins".to_string(),
                "Schedule a mock assessment".to_string(),
            ],
            manual: vec![
                "First pass over the fundamentals".to_string(),
                "Complete practice exercises for each new topic".to_string(),
                "Review weak areas from the mock".to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::fallback_goal;
    use crate::model::{ModelError, ModelRequest, NullModel};

    struct CannedModel(&'static str);

    impl TextModel for CannedModel {
        fn generate(&self, _request: &ModelRequest) -> std::result::Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_fallback_plan_shape() {
        let goal = fallback_goal("learn machine learning");
        let plan = fallback_plan(&goal);

        assert_eq!(plan.plan_title, "Study plan: learn machine learning");
        assert_eq!(plan.phases.len(), 3);
        assert_eq!(plan.total_task_count(), 9);
        assert_eq!(plan.phases[0].phase_name, "Foundation Phase");
        assert_eq!(plan.phases[1].phase_name, "Development Phase");
        assert_eq!(plan.phases[2].phase_name, "Mastery Phase");

        let ids: Vec<&str> = plan.task_ids().collect();
        assert_eq!(ids.first(), Some(&"task-1"));
        assert_eq!(ids.last(), Some(&"task-9"));
    }

    #[test]
    fn test_fallback_automation_split_is_three_each() {
        let goal = fallback_goal("learn machine learning");
        let plan = fallback_plan(&goal);

        assert_eq!(plan.automation_plan.automatable.len(), 3);
        assert_eq!(plan.automation_plan.manual.len(), 3);
        assert!(plan
            .automation_plan
            .automatable
            .contains(&"Set up a weekly study schedule".to_string()));
        assert!(plan
            .automation_plan
            .manual
            .contains(&"Complete practice exercises for each new topic".to_string()));
        // The automatable list stays consistent with the task flags.
        for name in &plan.automation_plan.automatable {
            let task = plan
                .phases
                .iter()
                .flat_map(|p| p.tasks.iter())
                .find(|t| &t.task_name == name)
                .unwrap();
            assert!(task.can_automate);
        }
    }

    #[test]
    fn test_build_without_model_uses_template() {
        let goal = fallback_goal("pass linear algebra");
        let plan = build(&NullModel, &goal, &[]).unwrap();
        assert_eq!(plan.total_task_count(), 9);
        assert_eq!(plan.plan_title, "Study plan: pass linear algebra");
    }

    #[test]
    fn test_build_rejects_goal_without_main_line() {
        let mut goal = fallback_goal("x");
        goal.main_goal = "  ".to_string();
        assert!(build(&NullModel, &goal, &[]).is_err());
    }

    #[test]
    fn test_model_plan_is_renumbered_and_automation_derived() {
        // Duplicate ids and an automation split that disagrees with the
        // task flags; both must be fixed on the way out.
        let reply = r#"{
            "planTitle": "ML in 12 weeks",
            "totalDuration": "12 weeks",
            "phases": [
                {
                    "phaseNumber": 1,
                    "phaseName": "Math",
                    "duration": "4 weeks",
                    "description": "Refresher",
                    "tasks": [
                        {"taskId": "a", "taskName": "Linear algebra review", "description": "",
                         "priority": "high", "canAutomate": false, "estimatedTime": "10 hours",
                         "deadline": "week 2"},
                        {"taskId": "a", "taskName": "Set review reminders", "description": "",
                         "priority": "low", "canAutomate": true, "estimatedTime": "15 minutes",
                         "deadline": "week 1"}
                    ]
                },
                {
                    "phaseNumber": 1,
                    "phaseName": "Models",
                    "duration": "8 weeks",
                    "description": "Supervised learning",
                    "tasks": [
                        {"taskId": "b", "taskName": "Train a classifier", "description": "",
                         "priority": "medium", "canAutomate": false, "estimatedTime": "6 hours",
                         "deadline": "week 6"}
                    ]
                }
            ],
            "automationPlan": {"automatable": ["Train a classifier"], "manual": []}
        }"#;
        let goal = fallback_goal("learn machine learning");
        let plan = build(&CannedModel(reply), &goal, &[]).unwrap();

        let ids: Vec<&str> = plan.task_ids().collect();
        assert_eq!(ids, vec!["task-1", "task-2", "task-3"]);
        assert_eq!(plan.phases[1].phase_number, 2);
        assert_eq!(plan.automation_plan.automatable, vec!["Set review reminders".to_string()]);
        assert_eq!(plan.automation_plan.manual.len(), 2);
    }

    #[test]
    fn test_model_plan_with_empty_phase_falls_back() {
        let reply = r#"{
            "planTitle": "Thin plan",
            "totalDuration": "2 weeks",
            "phases": [
                {"phaseNumber": 1, "phaseName": "Only", "duration": "2 weeks",
                 "description": "", "tasks": []}
            ],
            "automationPlan": {"automatable": [], "manual": []}
        }"#;
        let goal = fallback_goal("learn machine learning");
        let plan = build(&CannedModel(reply), &goal, &[]).unwrap();
        assert_eq!(plan.total_task_count(), 9);
    }

    #[test]
    fn test_prose_reply_falls_back() {
        let goal = fallback_goal("learn machine learning");
        let plan = build(&CannedModel("I suggest starting with the basics."), &goal, &[]).unwrap();
        assert_eq!(plan.phases.len(), 3);
    }
}
