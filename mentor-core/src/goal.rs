//! Structured goal model produced by analysis.
//!
//! A [`Goal`] is the contract between goal analysis and plan building:
//! analysis turns free text into this shape once, and the plan builder
//! consumes it without re-reading the original text.

use serde::{Deserialize, Serialize};

/// Category of a stated goal. Exactly one is assigned per goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Coursework and general learning.
    Academic,
    /// Hands-on ability, e.g. programming or a language.
    Skill,
    /// Something to build or deliver.
    Project,
    /// Internships, applications, interviews.
    Career,
    /// A specific test to pass.
    Exam,
}

/// Rough difficulty estimate, used for pacing hints in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Structured form of a free-text goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The goal restated in one line.
    pub main_goal: String,
    pub goal_type: GoalType,
    /// Short elaboration of what reaching the goal involves.
    pub description: String,
    /// Questions whose answers would sharpen the plan.
    pub clarifying_questions: Vec<String>,
    /// Human-readable estimate, e.g. "5 weeks".
    pub estimated_duration: String,
    pub difficulty: Difficulty,
    /// Ordered checkpoints on the way to the goal.
    pub key_milestones: Vec<String>,
}

impl Goal {
    /// Whether a model-produced goal is complete enough to hand to the plan
    /// builder. Anything thinner gets replaced by the deterministic fallback.
    pub fn is_usable(&self) -> bool {
        !self.main_goal.trim().is_empty() && !self.clarifying_questions.is_empty()
    }
}

/// Analysis verdict handed back to the caller: the structured goal plus
/// whether answering the clarifying questions is worth a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalysis {
    pub analysis: Goal,
    pub requires_input: bool,
}
