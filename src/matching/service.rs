use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::extraction::StructuredProfile;

use super::catalog::{CatalogContext, CatalogError, OfferCatalog};
use super::hybrid::{HybridMatcher, ScoreOptions, ScoreResult};
use super::offer::Offer;
use super::reasons::{MatchReason, ReasonKind};

/// Upper bound on non-eligible offers returned with a report.
pub const NON_ELIGIBLE_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub today: NaiveDate,
    pub include_non_eligible: bool,
    pub options: ScoreOptions,
}

impl MatchRequest {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            include_non_eligible: false,
            options: ScoreOptions::default(),
        }
    }

    pub fn including_non_eligible(mut self, include: bool) -> Self {
        self.include_non_eligible = include;
        self
    }

    pub fn with_options(mut self, options: ScoreOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub offer: Offer,
    #[serde(flatten)]
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonEligibleOffer {
    pub offer: Offer,
    pub reasons: Vec<MatchReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// Eligible offers, best first.
    pub matches: Vec<RankedMatch>,
    pub non_eligible: Vec<NonEligibleOffer>,
    pub evaluated: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Ranks one profile against the active catalog.
pub struct MatchingService<C> {
    catalog: Arc<C>,
    matcher: Arc<HybridMatcher>,
}

impl<C> MatchingService<C>
where
    C: OfferCatalog + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_matcher(catalog, Arc::new(HybridMatcher::default()))
    }

    pub fn with_matcher(catalog: Arc<C>, matcher: Arc<HybridMatcher>) -> Self {
        Self { catalog, matcher }
    }

    pub fn matcher(&self) -> &HybridMatcher {
        &self.matcher
    }

    /// Fetch the active offers once and score each against `profile`.
    pub fn match_profile(
        &self,
        profile: &StructuredProfile,
        request: &MatchRequest,
    ) -> Result<MatchReport, MatchingError> {
        let offers = self.catalog.fetch_active_offers()?;
        let context = CatalogContext::new(&offers);

        let mut matches = Vec::new();
        let mut non_eligible = Vec::new();

        for (index, offer) in offers.iter().enumerate() {
            if offer.deadline_passed(request.today) {
                non_eligible.push(NonEligibleOffer {
                    offer: offer.clone(),
                    reasons: vec![MatchReason::rule("Scholarship deadline has passed")],
                });
                continue;
            }

            let score = self.matcher.score(offer, profile, &context, &request.options);
            debug!(position = index, offer = %offer.id, "catalog offer evaluated");

            if score.components.rule_score == 0 {
                non_eligible.push(NonEligibleOffer {
                    offer: offer.clone(),
                    reasons: score
                        .match_reasons
                        .into_iter()
                        .filter(|reason| reason.kind == ReasonKind::Rule)
                        .collect(),
                });
                continue;
            }

            matches.push(RankedMatch {
                offer: offer.clone(),
                score,
            });
        }

        // stable: equal scores keep catalog order
        matches.sort_by(|left, right| right.score.total_score.cmp(&left.score.total_score));

        info!(
            evaluated = offers.len(),
            eligible = matches.len(),
            non_eligible = non_eligible.len(),
            "profile matched against catalog"
        );

        let non_eligible = if request.include_non_eligible {
            non_eligible.truncate(NON_ELIGIBLE_LIMIT);
            non_eligible
        } else {
            Vec::new()
        };

        Ok(MatchReport {
            matches,
            non_eligible,
            evaluated: offers.len(),
        })
    }
}
