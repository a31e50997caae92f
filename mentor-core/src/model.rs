//! Text-model seam.
//!
//! The engine never talks to a provider directly; it goes through
//! [`TextModel`], a synchronous single-call interface the host wires up.
//! Every operation that consults the model also has a deterministic path, so
//! a failing [`TextModel::generate`] is an input to fallback logic, never an
//! error the caller sees.

use serde_json::Value;
use thiserror::Error;

use crate::drafts::DraftKind;
use crate::goal::Goal;

/// Why a model call produced no usable text. Callers log these and fall back;
/// none of them crosses the engine boundary.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("model call timed out")]
    Timeout,
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("model returned an empty reply")]
    EmptyReply,
    #[error("no model configured")]
    Disabled,
}

/// One self-contained request: a system framing plus the user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub prompt: String,
}

/// Synchronous text generation. Implementations own transport, auth and
/// timeouts; the engine only sees text or a [`ModelError`].
pub trait TextModel: Send + Sync {
    fn generate(&self, request: &ModelRequest) -> Result<String, ModelError>;
}

/// Stand-in for deployments without an API key. Every call reports
/// [`ModelError::Disabled`], so callers take their deterministic path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullModel;

impl TextModel for NullModel {
    fn generate(&self, _request: &ModelRequest) -> Result<String, ModelError> {
        Err(ModelError::Disabled)
    }
}

const JSON_ONLY_SYSTEM: &str = "You are the planning assistant of a campus study platform. \
Reply with a single JSON object and nothing else: no prose, no markdown fences.";

const DRAFT_SYSTEM: &str = "You are the writing assistant of a campus study platform. \
Produce the requested document body in plain markdown. Do not add preambles or sign-offs.";

/// Prompt for turning free text into a structured goal.
pub fn goal_prompt(goal_text: &str, context: &[(String, String)]) -> ModelRequest {
    let mut prompt = String::new();
    prompt.push_str("Analyze this student goal and reply with a JSON object.\n\n");
    prompt.push_str(&format!("Goal: {goal_text}\n"));
    if !context.is_empty() {
        prompt.push_str("Known context:\n");
        for (key, value) in context {
            prompt.push_str(&format!("- {key}: {value}\n"));
        }
    }
    prompt.push_str(
        "\nThe JSON object must have exactly these keys:\n\
         - mainGoal: the goal restated in one line\n\
         - goalType: one of \"academic\", \"skill\", \"project\", \"career\", \"exam\"\n\
         - description: two or three sentences on what reaching it involves\n\
         - clarifyingQuestions: 3-5 questions whose answers would sharpen the plan\n\
         - estimatedDuration: e.g. \"5 weeks\"\n\
         - difficulty: one of \"beginner\", \"intermediate\", \"advanced\"\n\
         - keyMilestones: 4-6 ordered checkpoints\n",
    );
    ModelRequest { system: JSON_ONLY_SYSTEM.to_string(), prompt }
}

/// Prompt for expanding an analyzed goal into a phased plan.
pub fn plan_prompt(goal: &Goal, answers: &[(String, String)]) -> ModelRequest {
    let goal_json = serde_json::to_string_pretty(goal).unwrap_or_else(|_| goal.main_goal.clone());
    let mut prompt = String::new();
    prompt.push_str("Create a phased study plan for this analyzed goal.\n\nGoal analysis:\n");
    prompt.push_str(&goal_json);
    prompt.push('\n');
    if !answers.is_empty() {
        prompt.push_str("\nThe student answered the clarifying questions:\n");
        for (question, answer) in answers {
            prompt.push_str(&format!("- {question}: {answer}\n"));
        }
    }
    prompt.push_str(
        "\nReply with a JSON object with exactly these keys:\n\
         - planTitle\n\
         - totalDuration: e.g. \"4-8 weeks\"\n\
         - phases: ordered array of { phaseNumber, phaseName, duration, description, tasks }\n\
         - each task: { taskId, taskName, description, priority (\"low\"|\"medium\"|\"high\"), \
         canAutomate (bool), estimatedTime, deadline }\n\
         - automationPlan: { automatable: [task names], manual: [task names] }\n\
         Use 3 or 4 phases with 2-4 tasks each.\n",
    );
    ModelRequest { system: JSON_ONLY_SYSTEM.to_string(), prompt }
}

/// Prompt for drafting an assignment document.
pub fn draft_prompt(
    title: &str,
    problem_statement: &str,
    requirements: &[String],
    kind: DraftKind,
) -> ModelRequest {
    let mut prompt = String::new();
    prompt.push_str(&format!("Draft a {kind} titled \"{title}\".\n\n"));
    prompt.push_str(&format!("Problem statement: {problem_statement}\n"));
    if !requirements.is_empty() {
        prompt.push_str("Requirements:\n");
        for requirement in requirements {
            prompt.push_str(&format!("- {requirement}\n"));
        }
    }
    prompt.push_str("\nWrite the full document body. Mark any assumption clearly.\n");
    ModelRequest { system: DRAFT_SYSTEM.to_string(), prompt }
}

/// Pull the first JSON object out of a model reply.
///
/// Replies arrive in three shapes: bare JSON, JSON inside a markdown fence,
/// or JSON surrounded by prose. The fence is preferred when present,
/// otherwise everything between the outermost braces is tried.
pub fn extract_json(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();

    if let Some(fenced) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(fenced) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .filter(Value::is_object)
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Fence may carry a language tag on the opening line.
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Difficulty, GoalType};

    #[test]
    fn test_null_model_is_disabled() {
        let request = goal_prompt("learn Rust", &[]);
        let err = NullModel.generate(&request).unwrap_err();
        assert!(matches!(err, ModelError::Disabled));
    }

    #[test]
    fn test_goal_prompt_carries_text_and_context() {
        let context = vec![("major".to_string(), "CS".to_string())];
        let request = goal_prompt("pass the physics exam", &context);
        assert!(request.prompt.contains("Goal: pass the physics exam"));
        assert!(request.prompt.contains("major: CS"));
        assert!(request.prompt.contains("goalType"));
    }

    #[test]
    fn test_plan_prompt_embeds_goal_and_answers() {
        let goal = Goal {
            main_goal: "learn Rust".to_string(),
            goal_type: GoalType::Skill,
            description: String::new(),
            clarifying_questions: vec!["Hours per week?".to_string()],
            estimated_duration: "5 weeks".to_string(),
            difficulty: Difficulty::Beginner,
            key_milestones: vec![],
        };
        let answers = vec![("Hours per week?".to_string(), "10".to_string())];
        let request = plan_prompt(&goal, &answers);
        assert!(request.prompt.contains("\"mainGoal\": \"learn Rust\""));
        assert!(request.prompt.contains("Hours per week?: 10"));
        assert!(request.prompt.contains("automationPlan"));
    }

    #[test]
    fn test_extract_json_bare_object() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_extract_json_fenced() {
        let reply = "Here you go:\n```json\n{\"mainGoal\": \"x\"}\n```\ndone";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["mainGoal"], "x");
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let reply = "Sure! {\"a\": {\"b\": 2}} hope that helps";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["a"]["b"], 2);
    }

    #[test]
    fn test_extract_json_rejects_garbage() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("{broken").is_none());
        assert!(extract_json("[1, 2, 3]").is_none());
    }
}
