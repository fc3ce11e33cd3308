use super::common::*;
use serde_json::json;

use crate::matching::catalog::CatalogContext;
use crate::matching::hybrid::{combine_scores, HybridMatcher, ScoreBreakdown, ScoreOptions};
use crate::matching::offer::Offer;
use crate::matching::reasons::ReasonKind;

#[test]
fn combination_table() {
    assert_eq!(combine_scores(100, 100).0, 100);
    assert_eq!(combine_scores(0, 0).0, 0);
    assert_eq!(combine_scores(100, 0).0, 50);
    assert_eq!(combine_scores(0, 50).0, 25);
}

#[test]
fn independent_rounding_discrepancy_is_preserved() {
    let (total, breakdown) = combine_scores(25, 25);
    assert_eq!(total, 25);
    assert_eq!(
        breakdown,
        ScoreBreakdown {
            rule_based_score: 13,
            content_score: 13
        }
    );
    assert_eq!(
        u16::from(breakdown.rule_based_score) + u16::from(breakdown.content_score),
        u16::from(total) + 1
    );
}

#[test]
fn scores_eligible_restricted_match() {
    let matcher = HybridMatcher::default();
    let offers = catalog();
    let context = CatalogContext::new(&offers);
    let student = profile(Some(3.75), Some("Ijazah Sarjana Muda Sains Komputer"));

    let result = matcher.score(
        &computing_offer("digital"),
        &student,
        &context,
        &ScoreOptions::default(),
    );

    assert_eq!(result.total_score, 100);
    assert_eq!(result.components.rule_score, 100);
    assert_eq!(result.components.content_score, 100);
    assert_eq!(result.breakdown.rule_based_score, 50);
    assert_eq!(result.match_reasons[0].kind, ReasonKind::Rule);
    assert_eq!(
        result.match_reasons[0].text,
        "Meets minimum CGPA requirement (3.75 ≥ 3.50)"
    );
    assert_eq!(
        result.match_reasons[1].text,
        "Your program matches the scholarship requirements"
    );
}

#[test]
fn ranking_options_do_not_change_scores() {
    let matcher = HybridMatcher::default();
    let offers = catalog();
    let context = CatalogContext::new(&offers);
    let student = profile(Some(3.2), Some("Diploma Perakaunan"));
    let offer = Offer::new("m", "Major Grant").with_majors(["Physics"]);

    let plain = matcher.score(&offer, &student, &context, &ScoreOptions::default());
    let options: ScoreOptions = serde_json::from_value(json!({
        "clickData": { "medicine": 4 },
        "currentMatches": [ { "id": "community" } ],
        "index": 7
    }))
    .expect("options deserialize");
    let with_context = matcher.score(&offer, &student, &context, &options);

    assert_eq!(plain, with_context);
    assert_eq!(plain.total_score, 75);
}

#[test]
fn options_accept_any_index_shape() {
    let matcher = HybridMatcher::default();
    let context = CatalogContext::default();
    let student = profile(Some(3.6), Some("Bachelor of Computer Science"));
    let offer = computing_offer("digital");
    let plain = matcher.score(&offer, &student, &context, &ScoreOptions::default());

    for index in [json!("page-2"), json!(-1), json!(null), json!({ "page": 2 })] {
        let options: ScoreOptions = serde_json::from_value(json!({ "index": index }))
            .expect("opaque index accepted");
        assert_eq!(matcher.score(&offer, &student, &context, &options), plain);
    }
}

#[test]
fn score_is_deterministic_and_serializes_camel_case() {
    let matcher = HybridMatcher::default();
    let student = profile(Some(2.5), None);
    let offer = computing_offer("digital");
    let context = CatalogContext::default();

    let first = matcher.score(&offer, &student, &context, &ScoreOptions::default());
    let second = matcher.score(&offer, &student, &context, &ScoreOptions::default());
    assert_eq!(first, second);
    assert_eq!(first.total_score, 0);

    let payload = serde_json::to_value(&first).expect("result serializes");
    assert_eq!(payload["totalScore"], 0);
    assert_eq!(payload["breakdown"]["ruleBasedScore"], 0);
    assert_eq!(payload["components"]["contentScore"], 0);
    assert_eq!(payload["matchReasons"][0]["type"], "rule");
}
