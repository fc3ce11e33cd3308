use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extraction::{CourseTranslator, EntityTagger, ProfileExtractor, StructuredProfile};

use super::catalog::OfferCatalog;
use super::hybrid::ScoreOptions;
use super::service::{MatchReport, MatchRequest, MatchingError, MatchingService};

/// Extraction and matching services shared by the HTTP handlers.
pub struct MatchingApi<T, L, C> {
    extractor: ProfileExtractor<T, L>,
    service: MatchingService<C>,
}

impl<T, L, C> MatchingApi<T, L, C>
where
    T: EntityTagger + 'static,
    L: CourseTranslator + 'static,
    C: OfferCatalog + 'static,
{
    pub fn new(extractor: ProfileExtractor<T, L>, service: MatchingService<C>) -> Self {
        Self { extractor, service }
    }

    pub fn extractor(&self) -> &ProfileExtractor<T, L> {
        &self.extractor
    }

    pub fn service(&self) -> &MatchingService<C> {
        &self.service
    }
}

/// Router builder exposing profile extraction and scholarship matching.
pub fn matching_router<T, L, C>(api: Arc<MatchingApi<T, L, C>>) -> Router
where
    T: EntityTagger + 'static,
    L: CourseTranslator + 'static,
    C: OfferCatalog + 'static,
{
    Router::new()
        .route("/api/v1/profiles/extract", post(extract_handler::<T, L, C>))
        .route("/api/v1/matches", post(match_handler::<T, L, C>))
        .with_state(api)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractPayload {
    pub document: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub profile: Option<StructuredProfile>,
    #[serde(default)]
    pub declared_major: Option<String>,
    #[serde(default)]
    pub include_non_eligible: bool,
    #[serde(default)]
    pub options: ScoreOptions,
    /// Overrides the date deadlines are compared against.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub profile: StructuredProfile,
    #[serde(flatten)]
    pub report: MatchReport,
}

pub(crate) async fn extract_handler<T, L, C>(
    State(api): State<Arc<MatchingApi<T, L, C>>>,
    axum::Json(payload): axum::Json<ExtractPayload>,
) -> Response
where
    T: EntityTagger + 'static,
    L: CourseTranslator + 'static,
    C: OfferCatalog + 'static,
{
    let profile = api.extractor.extract_profile(&payload.document);
    (StatusCode::OK, axum::Json(profile)).into_response()
}

pub(crate) async fn match_handler<T, L, C>(
    State(api): State<Arc<MatchingApi<T, L, C>>>,
    axum::Json(payload): axum::Json<MatchPayload>,
) -> Response
where
    T: EntityTagger + 'static,
    L: CourseTranslator + 'static,
    C: OfferCatalog + 'static,
{
    let profile = match (payload.profile, payload.document.as_deref()) {
        (Some(profile), _) => profile,
        (None, Some(document)) => api.extractor.extract_profile(document),
        (None, None) => {
            let payload = json!({
                "error": "request must include a document or a profile",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };
    let profile = match payload.declared_major {
        Some(major) => profile.with_declared_major(major),
        None => profile,
    };

    let request = MatchRequest::new(payload.today.unwrap_or_else(|| Utc::now().date_naive()))
        .including_non_eligible(payload.include_non_eligible)
        .with_options(payload.options);

    match api.service.match_profile(&profile, &request) {
        Ok(report) => {
            let view = MatchResponse { profile, report };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(MatchingError::Catalog(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
