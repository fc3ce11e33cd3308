use super::domain::{round3, EntityLabel, ExtractionMethod};

/// Multiplier applied to the model score when a span needed salvage cleanup.
pub const SALVAGE_DISCOUNT: f32 = 0.85;

const OUT_OF_RANGE_LENGTH: f32 = 0.8;
const RAGGED_BOUNDARY: f32 = 0.9;
const IRREGULAR_NAME_CASING: f32 = 0.9;
const LOWERCASE_PROGRAM: f32 = 0.95;
const LATE_NAME_POSITION: f32 = 0.9;
/// Names are expected near the top of a transcript.
const NAME_POSITION_WINDOW: f32 = 0.3;

/// Where a span sits in the tagged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPosition {
    pub start: usize,
    pub document_len: usize,
}

/// Calibrates a tagger score into a field reliability in `[0, 1]`.
///
/// The estimate is a product of the base model score and heuristic factors
/// covering text length, boundary cleanliness, casing and position. It never
/// fails: malformed input yields `0.0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfidenceEstimator;

impl ConfidenceEstimator {
    pub fn estimate(
        &self,
        candidate: &str,
        label: &EntityLabel,
        method: ExtractionMethod,
        base_score: f32,
        position: Option<SpanPosition>,
    ) -> f32 {
        if !base_score.is_finite() || !(0.0..=1.0).contains(&base_score) {
            return 0.0;
        }

        let text = candidate.trim();
        if text.is_empty() || matches!(label, EntityLabel::Other(_)) {
            return 0.0;
        }

        let heuristic = length_factor(text, label)
            * boundary_factor(text)
            * casing_factor(text, label)
            * position_factor(label, position);

        round3((base_score * method.weight() * heuristic).clamp(0.0, 1.0))
    }
}

fn length_factor(text: &str, label: &EntityLabel) -> f32 {
    let chars = text.chars().count();
    let plausible = match label {
        EntityLabel::Name => (3..=60).contains(&chars),
        EntityLabel::Score => (1..=4).contains(&chars),
        EntityLabel::Program => (4..=200).contains(&chars),
        EntityLabel::Other(_) => false,
    };

    if plausible {
        1.0
    } else {
        OUT_OF_RANGE_LENGTH
    }
}

fn boundary_factor(text: &str) -> f32 {
    let clean_start = text.chars().next().is_some_and(char::is_alphanumeric);
    let clean_end = text.chars().next_back().is_some_and(char::is_alphanumeric);

    if clean_start && clean_end {
        1.0
    } else {
        RAGGED_BOUNDARY
    }
}

fn casing_factor(text: &str, label: &EntityLabel) -> f32 {
    match label {
        EntityLabel::Name => {
            let capitalized = text.split_whitespace().all(|word| {
                word.chars()
                    .find(|ch| ch.is_alphabetic())
                    .is_some_and(char::is_uppercase)
            });
            if capitalized {
                1.0
            } else {
                IRREGULAR_NAME_CASING
            }
        }
        EntityLabel::Program => {
            if text.chars().any(char::is_uppercase) {
                1.0
            } else {
                LOWERCASE_PROGRAM
            }
        }
        EntityLabel::Score | EntityLabel::Other(_) => 1.0,
    }
}

fn position_factor(label: &EntityLabel, position: Option<SpanPosition>) -> f32 {
    let Some(position) = position else {
        return 1.0;
    };

    match label {
        EntityLabel::Name => {
            let len = position.document_len.max(1) as f32;
            if (position.start as f32) / len <= NAME_POSITION_WINDOW {
                1.0
            } else {
                LATE_NAME_POSITION
            }
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(actual: f32, expected: f32) -> bool {
        (actual - expected).abs() < 1e-6
    }

    fn at_top() -> Option<SpanPosition> {
        Some(SpanPosition {
            start: 0,
            document_len: 400,
        })
    }

    #[test]
    fn clean_name_keeps_model_score() {
        let estimator = ConfidenceEstimator;
        let confidence = estimator.estimate(
            "Jane Doe",
            &EntityLabel::Name,
            ExtractionMethod::Ner,
            0.92,
            at_top(),
        );
        assert!(near(confidence, 0.92));
    }

    #[test]
    fn heuristics_discount_noisy_names() {
        let estimator = ConfidenceEstimator;
        let confidence = estimator.estimate(
            "jane doe,",
            &EntityLabel::Name,
            ExtractionMethod::Ner,
            1.0,
            Some(SpanPosition {
                start: 350,
                document_len: 400,
            }),
        );
        // ragged boundary, lowercase words, late position
        assert!(near(confidence, round3(0.9 * 0.9 * 0.9)));
    }

    #[test]
    fn salvage_discount_flows_through() {
        let estimator = ConfidenceEstimator;
        let confidence = estimator.estimate(
            "Jane Doe",
            &EntityLabel::Name,
            ExtractionMethod::Ner,
            1.0 * SALVAGE_DISCOUNT,
            at_top(),
        );
        assert!(near(confidence, 0.85));
    }

    #[test]
    fn malformed_input_yields_zero() {
        let estimator = ConfidenceEstimator;
        let ner = ExtractionMethod::Ner;
        assert_eq!(estimator.estimate("", &EntityLabel::Name, ner, 0.9, None), 0.0);
        assert_eq!(
            estimator.estimate("3.50", &EntityLabel::Score, ner, f32::NAN, None),
            0.0
        );
        assert_eq!(
            estimator.estimate("3.50", &EntityLabel::Score, ner, 1.2, None),
            0.0
        );
        assert_eq!(
            estimator.estimate("UM", &EntityLabel::Other("UNI".into()), ner, 0.9, None),
            0.0
        );
    }

    #[test]
    fn estimate_is_deterministic() {
        let estimator = ConfidenceEstimator;
        let first = estimator.estimate(
            "Bachelor of Computer Science",
            &EntityLabel::Program,
            ExtractionMethod::Ner,
            0.77,
            None,
        );
        let second = estimator.estimate(
            "Bachelor of Computer Science",
            &EntityLabel::Program,
            ExtractionMethod::Ner,
            0.77,
            None,
        );
        assert_eq!(first, second);
        assert!(near(first, 0.77));
    }
}
