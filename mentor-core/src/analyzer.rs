//! Goal analysis: free text in, structured [`Goal`] out.
//!
//! Two paths with one contract. The model path asks the configured
//! [`TextModel`] for a JSON analysis; the deterministic path classifies by
//! keyword and fills a generic template. Any model problem (transport,
//! timeout, unparseable or thin reply) drops to the deterministic path with
//! a warning, never an error.

use tracing::warn;

use crate::error::{EngineError, Result};
use crate::goal::{Difficulty, Goal, GoalType};
use crate::model::{self, TextModel};

/// Keyword table for the deterministic path. First match in table order
/// wins no matter where the word sits in the text, so "programming exam
/// prep" is a skill goal, not an exam goal.
const GOAL_KEYWORDS: &[(&str, GoalType)] = &[
    ("programming", GoalType::Skill),
    ("study", GoalType::Academic),
    ("project", GoalType::Project),
    ("career", GoalType::Career),
    ("exam", GoalType::Exam),
];

const FALLBACK_QUESTIONS: &[&str] = &[
    "What is your current experience level with this subject?",
    "Is there a hard deadline, such as an exam date or application window?",
    "What resources do you already have (courses, books, tools)?",
    "How will you know you have reached the goal?",
    "Which specific skills or topics should the plan emphasize?",
];

const FALLBACK_MILESTONES: &[&str] = &[
    "Week 1: baseline assessment and study setup",
    "Week 2: core concepts covered once",
    "Week 3: first applied practice completed",
    "Week 4: weak areas identified and revisited",
    "Week 5: final review and self-assessment",
];

/// Analyze a free-text goal.
///
/// `context` is optional known facts about the student (major, year) passed
/// through to the model verbatim. Errors only on empty input; model trouble
/// is handled internally.
pub fn analyze(model: &dyn TextModel, goal_text: &str, context: &[(String, String)]) -> Result<Goal> {
    let goal_text = goal_text.trim();
    if goal_text.is_empty() {
        return Err(EngineError::invalid_input("goal text must be non-empty"));
    }
    Ok(model_goal(model, goal_text, context).unwrap_or_else(|| fallback_goal(goal_text)))
}

fn model_goal(model: &dyn TextModel, goal_text: &str, context: &[(String, String)]) -> Option<Goal> {
    let request = model::goal_prompt(goal_text, context);
    match model.generate(&request) {
        Ok(reply) => {
            let goal = parse_goal_reply(&reply, goal_text);
            if goal.is_none() {
                warn!(goal_text, "unusable goal reply, taking the keyword path");
            }
            goal
        }
        Err(error) => {
            warn!(%error, goal_text, "goal model call failed, taking the keyword path");
            None
        }
    }
}

/// Accept a model reply only if it parses into a usable [`Goal`]. A blank
/// `mainGoal` is patched from the input text before the usability check.
fn parse_goal_reply(reply: &str, goal_text: &str) -> Option<Goal> {
    let value = model::extract_json(reply)?;
    let mut goal: Goal = serde_json::from_value(value).ok()?;
    if goal.main_goal.trim().is_empty() {
        goal.main_goal = goal_text.to_string();
    }
    goal.is_usable().then_some(goal)
}

/// Classify a goal by keyword. Case-insensitive substring match against the
/// table; anything unmatched is an academic goal.
pub fn classify(goal_text: &str) -> GoalType {
    let text = goal_text.to_lowercase();
    for (keyword, goal_type) in GOAL_KEYWORDS {
        if text.contains(keyword) {
            return *goal_type;
        }
    }
    GoalType::Academic
}

/// Deterministic analysis used whenever the model path is unavailable.
///
/// Intentionally generic: it guarantees the flow continues with a valid
/// goal, not that the content matches the subject. The clarifying questions
/// are always present, so the caller still gets a useful next step.
pub fn fallback_goal(goal_text: &str) -> Goal {
    Goal {
        main_goal: goal_text.to_string(),
        goal_type: classify(goal_text),
        description: format!("Structured study track for: {goal_text}"),
        clarifying_questions: FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        estimated_duration: "5 weeks".to_string(),
        difficulty: Difficulty::Intermediate,
        key_milestones: FALLBACK_MILESTONES.iter().map(|m| m.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelError, ModelRequest, NullModel};

    struct CannedModel(&'static str);

    impl TextModel for CannedModel {
        fn generate(&self, _request: &ModelRequest) -> std::result::Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    impl TextModel for FailingModel {
        fn generate(&self, _request: &ModelRequest) -> std::result::Result<String, ModelError> {
            Err(ModelError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn test_classify_table_order_beats_position() {
        // Both "programming" and "exam" are present; table order decides.
        assert_eq!(classify("programming exam prep"), GoalType::Skill);
        assert_eq!(classify("Exam prep for organic chemistry"), GoalType::Exam);
        assert_eq!(classify("finish my capstone project"), GoalType::Project);
        assert_eq!(classify("career fair preparation"), GoalType::Career);
        assert_eq!(classify("study for finals"), GoalType::Academic);
    }

    #[test]
    fn test_classify_defaults_to_academic() {
        assert_eq!(classify("get better at chess"), GoalType::Academic);
        assert_eq!(classify(""), GoalType::Academic);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("PROGRAMMING bootcamp"), GoalType::Skill);
    }

    #[test]
    fn test_empty_goal_text_is_invalid_input() {
        let err = analyze(&NullModel, "   ", &[]).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_disabled_model_falls_back() {
        let goal = analyze(&NullModel, "I want to learn machine learning in 3 months", &[]).unwrap();
        assert_eq!(goal.goal_type, GoalType::Academic);
        assert_eq!(goal.main_goal, "I want to learn machine learning in 3 months");
        assert_eq!(goal.clarifying_questions.len(), 5);
        assert_eq!(goal.key_milestones.len(), 5);
        assert_eq!(goal.difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn test_fallback_questions_cover_five_distinct_themes() {
        // One question each: experience, timeline, resources, success
        // measure, specific skills.
        let goal = fallback_goal("learn machine learning");
        let themes = ["experience level", "deadline", "resources", "reached the goal", "skills"];
        assert_eq!(goal.clarifying_questions.len(), themes.len());
        for (question, theme) in goal.clarifying_questions.iter().zip(themes) {
            assert!(question.contains(theme), "{question:?} should mention {theme:?}");
        }
    }

    #[test]
    fn test_transport_failure_falls_back() {
        let goal = analyze(&FailingModel, "study plan for the bar exam", &[]).unwrap();
        assert_eq!(goal.goal_type, GoalType::Academic); // "study" before "exam"
        assert!(!goal.clarifying_questions.is_empty());
    }

    #[test]
    fn test_good_model_reply_is_used() {
        let reply = r#"{
            "mainGoal": "Learn machine learning fundamentals",
            "goalType": "skill",
            "description": "Math refresher, then supervised learning basics.",
            "clarifyingQuestions": ["Which math courses have you taken?"],
            "estimatedDuration": "3 months",
            "difficulty": "advanced",
            "keyMilestones": ["Linear algebra refresher done"]
        }"#;
        let model = CannedModel(reply);
        let goal = analyze(&model, "I want to learn machine learning in 3 months", &[]).unwrap();
        assert_eq!(goal.goal_type, GoalType::Skill);
        assert_eq!(goal.main_goal, "Learn machine learning fundamentals");
        assert_eq!(goal.estimated_duration, "3 months");
    }

    #[test]
    fn test_unparseable_reply_falls_back() {
        let model = CannedModel("Sorry, I can't help with that right now.");
        let goal = analyze(&model, "learn machine learning", &[]).unwrap();
        assert_eq!(goal.estimated_duration, "5 weeks");
        assert_eq!(goal.clarifying_questions.len(), 5);
    }

    #[test]
    fn test_thin_reply_without_questions_falls_back() {
        let reply = r#"{
            "mainGoal": "Learn ML",
            "goalType": "skill",
            "description": "",
            "clarifyingQuestions": [],
            "estimatedDuration": "3 months",
            "difficulty": "beginner",
            "keyMilestones": []
        }"#;
        let model = CannedModel(reply);
        let goal = analyze(&model, "learn machine learning", &[]).unwrap();
        // Fallback took over, so the questions are the template ones.
        assert_eq!(goal.clarifying_questions.len(), 5);
        assert_eq!(goal.estimated_duration, "5 weeks");
    }

    #[test]
    fn test_blank_main_goal_is_patched_from_input() {
        let reply = r#"{
            "mainGoal": "",
            "goalType": "exam",
            "description": "Prep schedule.",
            "clarifyingQuestions": ["When is the exam?"],
            "estimatedDuration": "2 weeks",
            "difficulty": "beginner",
            "keyMilestones": []
        }"#;
        let model = CannedModel(reply);
        let goal = analyze(&model, "pass biology", &[]).unwrap();
        assert_eq!(goal.main_goal, "pass biology");
        assert_eq!(goal.goal_type, GoalType::Exam);
    }
}
