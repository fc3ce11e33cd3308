use serde::{Deserialize, Serialize};

use super::confidence::SALVAGE_DISCOUNT;
use super::domain::AcademicScore;

/// Thresholds applied while cleaning tagger spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPolicy {
    /// Longer names are assumed to carry trailing document noise.
    pub name_max_chars: usize,
    pub name_max_segments: usize,
    pub name_min_words: usize,
    pub name_max_words: usize,
    /// Longer programs are cut to their first line.
    pub program_max_chars: usize,
    pub salvage_discount: f32,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            name_max_chars: 100,
            name_max_segments: 10,
            name_min_words: 2,
            name_max_words: 8,
            program_max_chars: 200,
            salvage_discount: SALVAGE_DISCOUNT,
        }
    }
}

/// Result of validating a NAME span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCandidate {
    Clean(String),
    /// Recovered from an overlong span; confidence is discounted.
    Salvaged(String),
    Rejected,
}

pub fn clean_name(raw: &str, policy: &ExtractionPolicy) -> NameCandidate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NameCandidate::Rejected;
    }

    if trimmed.chars().count() <= policy.name_max_chars {
        return NameCandidate::Clean(trimmed.to_string());
    }

    trimmed
        .split('\n')
        .take(policy.name_max_segments)
        .map(str::trim)
        .find(|segment| looks_like_name(segment, policy))
        .map_or(NameCandidate::Rejected, |segment| {
            NameCandidate::Salvaged(segment.to_string())
        })
}

fn looks_like_name(segment: &str, policy: &ExtractionPolicy) -> bool {
    let words: Vec<&str> = segment.split_whitespace().collect();
    if !(policy.name_min_words..=policy.name_max_words).contains(&words.len()) {
        return false;
    }

    words.iter().all(|word| {
        let letters: String = word.chars().filter(|ch| *ch != '-' && *ch != '\'').collect();
        !letters.is_empty() && letters.chars().all(char::is_alphabetic)
    })
}

/// Why a SCORE span was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreRejection {
    Unparsable(String),
    OutOfRange(f64),
}

pub fn parse_score(raw: &str) -> Result<AcademicScore, ScoreRejection> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ScoreRejection::Unparsable(trimmed.to_string()))?;

    if value.is_nan() {
        return Err(ScoreRejection::Unparsable(trimmed.to_string()));
    }

    AcademicScore::new(value).ok_or(ScoreRejection::OutOfRange(value))
}

/// Result of validating a PROGRAM span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramCandidate {
    Clean(String),
    /// Overlong span cut down to its first line.
    Truncated { value: String, original_chars: usize },
    Rejected,
}

impl ProgramCandidate {
    pub fn into_value(self) -> Option<String> {
        match self {
            ProgramCandidate::Clean(value) | ProgramCandidate::Truncated { value, .. } => {
                Some(value)
            }
            ProgramCandidate::Rejected => None,
        }
    }
}

pub fn clean_program(raw: &str, policy: &ExtractionPolicy) -> ProgramCandidate {
    let trimmed = raw.trim();
    let original_chars = trimmed.chars().count();
    if original_chars <= policy.program_max_chars {
        return match trimmed {
            "" => ProgramCandidate::Rejected,
            program => ProgramCandidate::Clean(program.to_string()),
        };
    }

    match trimmed.split('\n').next().map(str::trim) {
        Some(first) if !first.is_empty() => ProgramCandidate::Truncated {
            value: first.to_string(),
            original_chars,
        },
        _ => ProgramCandidate::Rejected,
    }
}
