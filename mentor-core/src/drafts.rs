//! Deterministic assignment drafts.
//!
//! Two pure builders: [`generate_draft`] produces a complete skeleton from
//! the assignment facts alone, and [`to_fixed_template`] wraps already
//! generated text in the platform's document frame. Same inputs, same bytes
//! out; nothing here consults a model or a clock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document shape requested by the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftKind {
    Essay,
    Report,
    Code,
    General,
}

impl DraftKind {
    /// Section skeleton for the no-model draft.
    fn sections(self) -> &'static [(&'static str, &'static str)] {
        match self {
            DraftKind::Essay => &[
                ("Introduction", "State the thesis and why it matters."),
                ("Argument", "Develop the main line of reasoning with evidence."),
                ("Counterpoints", "Take the strongest objection seriously before answering it."),
                ("Conclusion", "Restate the thesis in light of the argument."),
            ],
            DraftKind::Report => &[
                ("Summary", "One paragraph: what was done and what was found."),
                ("Method", "How the work was carried out, enough to reproduce it."),
                ("Findings", "Results, organized around the questions asked."),
                ("Discussion", "What the findings mean and where they are weak."),
                ("References", "Sources cited, in the required style."),
            ],
            DraftKind::Code => &[
                ("Problem Restatement", "The task in your own words, including constraints."),
                ("Approach", "Chosen data structures and algorithm, and why they fit."),
                ("Implementation Notes", "Anything non-obvious in the code itself."),
                ("Testing", "Cases covered, including the edge cases."),
                ("Usage", "How to build and run the submission."),
            ],
            DraftKind::General => &[
                ("Overview", "What this document covers."),
                ("Main Content", "The substance, one idea per paragraph."),
                ("Conclusion", "Takeaways and open points."),
            ],
        }
    }
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftKind::Essay => "essay",
            DraftKind::Report => "report",
            DraftKind::Code => "code assignment write-up",
            DraftKind::General => "document",
        };
        f.write_str(name)
    }
}

const FOOTER: &str = "Drafted by the campus study assistant. Review and rework before submitting.";

/// Wrap generated text in the platform's fixed document frame.
pub fn to_fixed_template(body: &str, title: &str) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("# {title}\n\n"));
    doc.push_str(body.trim());
    doc.push_str("\n\n---\n");
    doc.push_str(FOOTER);
    doc.push('\n');
    doc
}

/// Build a full draft skeleton without any model involvement.
///
/// Structure: problem statement, requirements checklist, then the section
/// skeleton for `kind` with one guidance line per section.
pub fn generate_draft(
    title: &str,
    problem_statement: &str,
    requirements: &[String],
    kind: DraftKind,
) -> String {
    let mut body = String::new();
    body.push_str(&format!("## Assignment\n\n{problem_statement}\n\n"));

    if !requirements.is_empty() {
        body.push_str("## Requirements\n\n");
        for requirement in requirements {
            body.push_str(&format!("- [ ] {requirement}\n"));
        }
        body.push('\n');
    }

    for (section, guidance) in kind.sections() {
        body.push_str(&format!("## {section}\n\n_{guidance}_\n\n"));
    }

    to_fixed_template(&body, title)
}
