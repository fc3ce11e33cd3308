use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::extraction::GlossaryTranslator;
use crate::matching::router::{match_handler, MatchPayload};
use crate::matching::matching_router;

fn post_json(uri: &str, body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn extract_route_returns_structured_profile() {
    let router = matching_router(build_api(Arc::new(CountingCatalog::with_offers(catalog()))));

    let response = router
        .oneshot(post_json(
            "/api/v1/profiles/extract",
            json!({ "document": "transcript text" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], "Jane Doe");
    assert_eq!(payload["score"], "3.75");
    assert_eq!(payload["program_translated"], "Bachelor of Computer Science");
    assert_eq!(payload["field_of_study"], "computer_science");
    assert_eq!(payload["quality_tier"], "high");
}

#[tokio::test]
async fn match_route_ranks_extracted_profile() {
    let router = matching_router(build_api(Arc::new(CountingCatalog::with_offers(catalog()))));

    let response = router
        .oneshot(post_json(
            "/api/v1/matches",
            json!({
                "document": "transcript text",
                "includeNonEligible": true,
                "today": "2025-09-01",
                "options": { "index": 3 }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["profile"]["name"], "Jane Doe");
    assert_eq!(payload["matches"][0]["offer"]["id"], "community");
    assert_eq!(payload["matches"][0]["totalScore"], 100);
    assert_eq!(payload["matches"][1]["offer"]["id"], "digital");
    assert_eq!(payload["nonEligible"][0]["offer"]["id"], "expired");
    assert_eq!(payload["evaluated"], 5);
}

#[tokio::test]
async fn match_route_ignores_non_numeric_ranking_options() {
    let router = matching_router(build_api(Arc::new(CountingCatalog::with_offers(catalog()))));

    let response = router
        .oneshot(post_json(
            "/api/v1/matches",
            json!({
                "document": "transcript text",
                "today": "2025-09-01",
                "options": { "index": -1, "clickData": "none", "currentMatches": 0 }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["matches"][0]["offer"]["id"], "community");
    assert_eq!(payload["matches"][0]["totalScore"], 100);
}

#[tokio::test]
async fn declared_major_is_applied_to_supplied_profile() {
    let api = build_api(Arc::new(CountingCatalog::with_offers(vec![
        computing_offer("digital"),
    ])));
    let profile = profile(Some(3.8), Some("Diploma Perakaunan"));

    let payload = MatchPayload {
        profile: Some(profile),
        declared_major: Some("Data Science".to_string()),
        today: Some(today()),
        ..MatchPayload::default()
    };
    let response = match_handler::<StubTagger, GlossaryTranslator, CountingCatalog>(
        State(api),
        axum::Json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["profile"]["declared_major"], "Data Science");
    assert_eq!(payload["matches"][0]["components"]["contentScore"], 100);
}

#[tokio::test]
async fn match_route_requires_document_or_profile() {
    let router = matching_router(build_api(Arc::new(CountingCatalog::with_offers(catalog()))));

    let response = router
        .oneshot(post_json("/api/v1/matches", json!({ "includeNonEligible": true })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("document or a profile"));
}

#[tokio::test]
async fn catalog_outage_maps_to_service_unavailable() {
    let router = matching_router(build_api(Arc::new(UnavailableCatalog)));

    let response = router
        .oneshot(post_json(
            "/api/v1/matches",
            json!({ "document": "transcript text" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "catalog unavailable: database offline");
}
