use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use super::offer::{split_list, Offer, OfferRequirements, OfferStatus, ScoreRequirement};

/// Source of the offers a matching run ranks against.
pub trait OfferCatalog: Send + Sync {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog json invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog csv invalid: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Catalog-wide view handed to scorers alongside each offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogContext<'a> {
    offers: &'a [Offer],
}

impl<'a> CatalogContext<'a> {
    pub fn new(offers: &'a [Offer]) -> Self {
        Self { offers }
    }

    pub fn offers(&self) -> &'a [Offer] {
        self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    offers: Vec<Offer>,
}

impl InMemoryCatalog {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self { offers }
    }

    /// Every offer, including inactive ones.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }
}

impl OfferCatalog for InMemoryCatalog {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError> {
        Ok(self
            .offers
            .iter()
            .filter(|offer| offer.status.is_active())
            .cloned()
            .collect())
    }
}

/// JSON array of offers, re-read on every fetch so edits apply without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OfferCatalog for JsonFileCatalog {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError> {
        let raw = fs::read(&self.path)?;
        let offers: Vec<Offer> = serde_json::from_slice(&raw)?;
        Ok(offers
            .into_iter()
            .filter(|offer| offer.status.is_active())
            .collect())
    }
}

/// Imports spreadsheet exports of the scholarship catalog.
///
/// Expected header: `id,title,status,min_score,eligible_majors,eligible_courses,description,category,deadline`.
/// List cells are `;`-separated; empty cells are treated as absent.
pub struct CsvCatalogImporter;

impl CsvCatalogImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryCatalog, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut offers = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            let row = record?;
            offers.push(row.into_offer());
        }

        info!(offers = offers.len(), "catalog imported from csv");
        Ok(InMemoryCatalog::new(offers))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<InMemoryCatalog, CatalogError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

/// Catalog chosen by file extension: `.csv` is imported once, anything else is read as JSON.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Box<dyn OfferCatalog>, CatalogError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(Box::new(CsvCatalogImporter::from_path(path)?))
    } else {
        Ok(Box::new(JsonFileCatalog::new(path)))
    }
}

impl<C: OfferCatalog + ?Sized> OfferCatalog for Box<C> {
    fn fetch_active_offers(&self) -> Result<Vec<Offer>, CatalogError> {
        (**self).fetch_active_offers()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_majors: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eligible_courses: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    deadline: Option<String>,
}

impl CatalogRow {
    fn into_offer(self) -> Offer {
        let min_score = self.min_score.map(|raw| match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => ScoreRequirement::Numeric(value),
            _ => ScoreRequirement::Malformed(Value::String(raw)),
        });
        let deadline = self.deadline.as_deref().and_then(|raw| {
            let parsed = parse_deadline(raw);
            if parsed.is_none() {
                warn!(offer = %self.id, deadline = raw, "ignoring unparsable deadline");
            }
            parsed
        });

        Offer {
            id: self.id,
            title: self.title,
            status: self.status.map(OfferStatus::from).unwrap_or_default(),
            requirements: OfferRequirements {
                min_score,
                eligible_majors: self.eligible_majors.as_deref().map(split_list).unwrap_or_default(),
            },
            eligible_courses: self.eligible_courses.as_deref().map(split_list).unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            deadline,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}
