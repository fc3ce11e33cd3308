use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use scholar_match::config::MatchingConfig;
use scholar_match::error::AppError;
use scholar_match::extraction::{GlossaryTranslator, LabeledLineTagger, ProfileExtractor};
use scholar_match::matching::{
    load_catalog, InMemoryCatalog, MatchingApi, MatchingService, OfferCatalog,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type Catalog = Box<dyn OfferCatalog>;
pub(crate) type ServiceApi = MatchingApi<LabeledLineTagger, GlossaryTranslator, Catalog>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog from an explicit path, else the configured one, else empty.
pub(crate) fn open_catalog(
    override_path: Option<&Path>,
    config: &MatchingConfig,
) -> Result<Catalog, AppError> {
    match override_path.or(config.catalog_path.as_deref()) {
        Some(path) => {
            info!(path = %path.display(), "loading scholarship catalog");
            Ok(load_catalog(path)?)
        }
        None => {
            info!("no catalog configured; starting with an empty catalog");
            Ok(Box::new(InMemoryCatalog::default()))
        }
    }
}

pub(crate) fn profile_extractor(
    config: &MatchingConfig,
) -> ProfileExtractor<LabeledLineTagger, GlossaryTranslator> {
    ProfileExtractor::new(
        Arc::new(LabeledLineTagger::new(config.tagger_score)),
        Arc::new(GlossaryTranslator),
    )
}

pub(crate) fn build_api(catalog: Catalog, config: &MatchingConfig) -> Arc<ServiceApi> {
    let service = MatchingService::new(Arc::new(catalog));
    Arc::new(MatchingApi::new(profile_extractor(config), service))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
