use super::common::*;
use serde_json::json;

use crate::matching::offer::{Offer, ScoreRequirement};
use crate::matching::reasons::gate_reason;
use crate::matching::rules::{evaluate_gate, rule_score, GateOutcome};

#[test]
fn offers_without_minimum_pass_any_profile() {
    let offer = open_offer("open");
    for score in [None, Some(0.0), Some(2.1), Some(4.0)] {
        assert_eq!(rule_score(&offer, &profile(score, None)), 100);
    }
    assert_eq!(
        evaluate_gate(&offer, &profile(None, None)),
        GateOutcome::Unrestricted
    );
}

#[test]
fn boundary_score_is_inclusive() {
    let offer = Offer::new("o", "Merit").with_min_score(3.5);
    assert_eq!(rule_score(&offer, &profile(Some(3.5), None)), 100);
    assert_eq!(rule_score(&offer, &profile(Some(3.49), None)), 0);
}

#[test]
fn missing_profile_score_fails_numeric_gate() {
    let offer = Offer::new("o", "Merit").with_min_score(2.0);
    let outcome = evaluate_gate(&offer, &profile(None, None));

    assert_eq!(
        outcome,
        GateOutcome::NotMet {
            score: None,
            minimum: 2.0
        }
    );
    assert_eq!(
        gate_reason(&outcome).text,
        "No CGPA on profile; minimum CGPA requirement is 2.00"
    );
}

#[test]
fn malformed_minimum_is_unrestricted() {
    let offer = Offer::new("o", "Merit")
        .with_min_score(ScoreRequirement::Malformed(json!({ "value": "3.0" })));
    assert_eq!(rule_score(&offer, &profile(Some(1.0), None)), 100);

    let offer = Offer::new("o", "Merit").with_min_score(f64::NAN);
    assert_eq!(rule_score(&offer, &profile(Some(1.0), None)), 100);
}

#[test]
fn gate_reasons_render_two_decimals() {
    let offer = Offer::new("o", "Merit").with_min_score(3.5);

    let met = evaluate_gate(&offer, &profile(Some(3.75), None));
    assert_eq!(
        gate_reason(&met).text,
        "Meets minimum CGPA requirement (3.75 ≥ 3.50)"
    );

    let not_met = evaluate_gate(&offer, &profile(Some(3.0), None));
    assert_eq!(
        gate_reason(&not_met).text,
        "Does not meet minimum CGPA requirement (3.00 < 3.50)"
    );
    assert_eq!(
        gate_reason(&GateOutcome::Unrestricted).text,
        "No minimum CGPA requirement"
    );
}
