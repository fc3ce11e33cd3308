use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::extraction::{
    AcademicScore, EntitySpan, EntityTagger, ExtractedField, GlossaryTranslator, ProfileDraft,
    ProfileExtractor, StructuredProfile, TaggerError,
};
use crate::matching::catalog::{CatalogError, InMemoryCatalog, OfferCatalog};
use crate::matching::offer::Offer;
use crate::matching::router::MatchingApi;
use crate::matching::service::MatchingService;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
}

pub(super) fn profile(score: Option<f64>, program: Option<&str>) -> StructuredProfile {
    ProfileDraft {
        name: Some(ExtractedField {
            value: "Jane Doe".to_string(),
            confidence: 0.9,
        }),
        score: score.map(|value| ExtractedField {
            value: AcademicScore::new(value).expect("score in range"),
            confidence: 0.9,
        }),
        program: program.map(|value| ExtractedField {
            value: value.to_string(),
            confidence: 0.9,
        }),
    }
    .finish(None)
}

pub(super) fn open_offer(id: &str) -> Offer {
    Offer::new(id, "Community Grant").with_description("Need-based support")
}

pub(super) fn computing_offer(id: &str) -> Offer {
    Offer::new(id, "Digital Talent Scholarship")
        .with_min_score(3.5)
        .with_courses(["Bachelor of Computer Science", "Bachelor of Software Engineering"])
        .with_majors(["Computer Science", "Data Science"])
}

pub(super) fn catalog() -> Vec<Offer> {
    vec![
        open_offer("community"),
        computing_offer("digital"),
        Offer::new("medicine", "Medical Pathway Award")
            .with_courses(["Bachelor of Medicine"])
            .with_majors(["Medicine"]),
        Offer::new("majors-only", "STEM Majors Grant").with_majors(["Physics"]),
        Offer::new("expired", "Last Year's Bursary")
            .with_deadline(NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date")),
        Offer::new("hidden", "Inactive Fund").with_status("inactive"),
    ]
}

#[derive(Default)]
pub(super) struct CountingCatalog {
    pub(super) inner: InMemoryCatalog,
    pub(super) fetches: AtomicUsize,
}

impl CountingCatalog {
    pub(super) fn with_offers(offers: Vec<Offer>) -> Self {
        Self {
            inner: InMemoryCatalog::new(offers),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl OfferCatalog for CountingCatalog {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_active_offers()
    }
}

pub(super) struct UnavailableCatalog;

impl OfferCatalog for UnavailableCatalog {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

/// Returns the same spans for every document.
pub(super) struct StubTagger(pub(super) Vec<EntitySpan>);

impl EntityTagger for StubTagger {
    fn tag(&self, _document: &str) -> Result<Vec<EntitySpan>, TaggerError> {
        Ok(self.0.clone())
    }
}

pub(super) fn jane_doe_spans() -> Vec<EntitySpan> {
    vec![
        EntitySpan::new("Jane Doe", "STUDENT_NAME", 0, 0.95),
        EntitySpan::new("3.75", "CGPA", 40, 0.9),
        EntitySpan::new("Ijazah Sarjana Muda Sains Komputer", "PROGRAM", 60, 0.88),
    ]
}

pub(super) fn build_api<C>(catalog: Arc<C>) -> Arc<MatchingApi<StubTagger, GlossaryTranslator, C>>
where
    C: OfferCatalog + 'static,
{
    let extractor = ProfileExtractor::new(
        Arc::new(StubTagger(jane_doe_spans())),
        Arc::new(GlossaryTranslator),
    );
    Arc::new(MatchingApi::new(extractor, MatchingService::new(catalog)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
