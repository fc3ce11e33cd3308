use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::extraction::StructuredProfile;

use super::catalog::CatalogContext;
use super::content::ContentScorer;
use super::offer::Offer;
use super::reasons::{self, MatchReason};
use super::rules::evaluate_gate;

const RULE_WEIGHT: f64 = 0.5;
const CONTENT_WEIGHT: f64 = 0.5;

/// Ranking context reserved for personalization. Every field is opaque:
/// accepted in any JSON shape and never weighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_matches: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
}

/// Weighted halves, each rounded on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub rule_based_score: u8,
    pub content_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub rule_score: u8,
    pub content_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total_score: u8,
    pub breakdown: ScoreBreakdown,
    pub components: ScoreComponents,
    pub match_reasons: Vec<MatchReason>,
}

fn weighted(score: u8, weight: f64) -> f64 {
    f64::from(score) * weight
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Total and breakdown for a rule/content pair.
///
/// The breakdown halves are rounded independently, so `13 + 13` can sit next
/// to a total of `25`.
pub fn combine_scores(rule_score: u8, content_score: u8) -> (u8, ScoreBreakdown) {
    let total = to_score(weighted(rule_score, RULE_WEIGHT) + weighted(content_score, CONTENT_WEIGHT));
    let breakdown = ScoreBreakdown {
        rule_based_score: to_score(weighted(rule_score, RULE_WEIGHT)),
        content_score: to_score(weighted(content_score, CONTENT_WEIGHT)),
    };
    (total, breakdown)
}

/// Rule gate and content scorer combined into one explainable score.
#[derive(Debug, Clone, Default)]
pub struct HybridMatcher {
    content: ContentScorer,
}

impl HybridMatcher {
    pub fn new(content: ContentScorer) -> Self {
        Self { content }
    }

    pub fn score(
        &self,
        offer: &Offer,
        profile: &StructuredProfile,
        catalog: &CatalogContext<'_>,
        options: &ScoreOptions,
    ) -> ScoreResult {
        let gate = evaluate_gate(offer, profile);
        let content = self.content.score(offer, profile, catalog);
        let rule_score = gate.score();
        let (total_score, breakdown) = combine_scores(rule_score, content.score);

        debug!(
            offer = %offer.id,
            rule_score,
            content_score = content.score,
            total_score,
            personalized = options.click_data.is_some() || options.current_matches.is_some(),
            "offer scored"
        );

        ScoreResult {
            total_score,
            breakdown,
            components: ScoreComponents {
                rule_score,
                content_score: content.score,
            },
            match_reasons: reasons::explain(&gate, &content, profile),
        }
    }
}
