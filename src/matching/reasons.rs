use serde::{Deserialize, Serialize};

use crate::extraction::StructuredProfile;

use super::content::ContentAssessment;
use super::rules::GateOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    Rule,
    Content,
}

/// Human-readable justification attached to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReason {
    #[serde(rename = "type")]
    pub kind: ReasonKind,
    pub text: String,
}

impl MatchReason {
    pub fn rule(text: impl Into<String>) -> Self {
        Self {
            kind: ReasonKind::Rule,
            text: text.into(),
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            kind: ReasonKind::Content,
            text: text.into(),
        }
    }
}

pub fn gate_reason(gate: &GateOutcome) -> MatchReason {
    let text = match *gate {
        GateOutcome::Unrestricted => "No minimum CGPA requirement".to_string(),
        GateOutcome::Met { score, minimum } => {
            format!("Meets minimum CGPA requirement ({score:.2} ≥ {minimum:.2})")
        }
        GateOutcome::NotMet {
            score: Some(score),
            minimum,
        } => format!("Does not meet minimum CGPA requirement ({score:.2} < {minimum:.2})"),
        GateOutcome::NotMet {
            score: None,
            minimum,
        } => format!("No CGPA on profile; minimum CGPA requirement is {minimum:.2}"),
    };
    MatchReason::rule(text)
}

pub fn content_reasons(content: &ContentAssessment, profile: &StructuredProfile) -> Vec<MatchReason> {
    if let Some(matched) = content.matched {
        let text = if matched {
            "Your program matches the scholarship requirements".to_string()
        } else {
            let declared = match profile.declared_study() {
                "" => "not provided",
                declared => declared,
            };
            format!("Not eligible: your program ({declared}) does not match the required programs")
        };
        return vec![MatchReason::content(text)];
    }

    let programs = if content.program_open {
        "Open to all programs"
    } else {
        "Eligible programs are restricted"
    };
    let majors = if content.major_open {
        "Open to all majors"
    } else {
        "Eligible majors are restricted"
    };
    vec![MatchReason::content(programs), MatchReason::content(majors)]
}

/// Rule reason first, then content reasons, in the order the branches were evaluated.
pub fn explain(
    gate: &GateOutcome,
    content: &ContentAssessment,
    profile: &StructuredProfile,
) -> Vec<MatchReason> {
    let mut reasons = vec![gate_reason(gate)];
    reasons.extend(content_reasons(content, profile));
    reasons
}
