//! Hybrid scholarship matching: a binary minimum-score gate, a graded
//! program/major compatibility score, and the template explainer that
//! justifies the combined result.

pub mod catalog;
pub mod compatibility;
pub mod content;
pub mod hybrid;
pub mod offer;
pub mod reasons;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    load_catalog, CatalogContext, CatalogError, CsvCatalogImporter, InMemoryCatalog,
    JsonFileCatalog, OfferCatalog,
};
pub use compatibility::{FieldAwareCompatibility, ProgramCompatibility, SubstringCompatibility};
pub use content::{
    ContentAssessment, ContentScorer, KeywordOpenness, OpennessHeuristic, OPEN_TO_ALL_KEYWORDS,
};
pub use hybrid::{
    combine_scores, HybridMatcher, ScoreBreakdown, ScoreComponents, ScoreOptions, ScoreResult,
};
pub use offer::{Offer, OfferRequirements, OfferStatus, ScoreRequirement};
pub use reasons::{MatchReason, ReasonKind};
pub use router::{matching_router, MatchPayload, MatchResponse, MatchingApi};
pub use rules::{evaluate_gate, rule_score, GateOutcome};
pub use service::{
    MatchReport, MatchRequest, MatchingError, MatchingService, NonEligibleOffer, RankedMatch,
    NON_ELIGIBLE_LIMIT,
};
