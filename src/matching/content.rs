use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::extraction::StructuredProfile;

use super::catalog::CatalogContext;
use super::compatibility::{FieldAwareCompatibility, ProgramCompatibility};
use super::offer::Offer;

/// Phrases that mark an offer as open to every program and major.
pub const OPEN_TO_ALL_KEYWORDS: &[&str] = &[
    "all programs",
    "any major",
    "open to all",
    "all fields",
    "any field",
    "open to all majors",
    "all majors",
    "no major restriction",
    "any discipline",
    "all disciplines",
    "any field of study",
    "all fields of study",
    "all students",
];

/// Detects offers that advertise themselves as open to everyone.
pub trait OpennessHeuristic: Send + Sync {
    fn is_open_to_all(&self, offer: &Offer) -> bool;
}

/// Case-insensitive keyword lookup over title, description and category.
#[derive(Debug, Clone)]
pub struct KeywordOpenness {
    keywords: Vec<String>,
}

impl KeywordOpenness {
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }
}

impl Default for KeywordOpenness {
    fn default() -> Self {
        Self::with_keywords(OPEN_TO_ALL_KEYWORDS)
    }
}

impl OpennessHeuristic for KeywordOpenness {
    fn is_open_to_all(&self, offer: &Offer) -> bool {
        let text = offer.searchable_text().to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| text.contains(keyword.as_str()))
    }
}

/// Content score plus the flags that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAssessment {
    pub score: u8,
    pub program_open: bool,
    pub major_open: bool,
    /// Set only when both lists were restricted and a direct match was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
}

/// Graded program/major compatibility between a profile and an offer.
#[derive(Clone)]
pub struct ContentScorer {
    openness: Arc<dyn OpennessHeuristic>,
    compatibility: Arc<dyn ProgramCompatibility>,
}

impl ContentScorer {
    pub fn new(
        openness: Arc<dyn OpennessHeuristic>,
        compatibility: Arc<dyn ProgramCompatibility>,
    ) -> Self {
        Self {
            openness,
            compatibility,
        }
    }

    pub fn score(
        &self,
        offer: &Offer,
        profile: &StructuredProfile,
        catalog: &CatalogContext<'_>,
    ) -> ContentAssessment {
        let courses = &offer.eligible_courses;
        let majors = &offer.requirements.eligible_majors;

        // evaluated once; both flags share it
        let open_to_all = self.openness.is_open_to_all(offer);
        let program_open = courses.is_empty() || open_to_all;
        let major_open = majors.is_empty() || open_to_all;

        let (score, matched) = match (program_open, major_open) {
            (true, true) => (100, None),
            (true, false) | (false, true) => (50, None),
            (false, false) => {
                let matched =
                    self.compatibility
                        .is_compatible(profile.declared_study(), courses, majors);
                (if matched { 100 } else { 0 }, Some(matched))
            }
        };

        debug!(
            offer = %offer.id,
            program_open,
            major_open,
            score,
            catalog_size = catalog.len(),
            "content compatibility evaluated"
        );

        ContentAssessment {
            score,
            program_open,
            major_open,
            matched,
        }
    }
}

impl Default for ContentScorer {
    fn default() -> Self {
        Self::new(
            Arc::new(KeywordOpenness::default()),
            Arc::new(FieldAwareCompatibility),
        )
    }
}

impl std::fmt::Debug for ContentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentScorer").finish_non_exhaustive()
    }
}
