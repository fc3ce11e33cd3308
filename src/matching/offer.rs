use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Publication state of a scholarship offer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OfferStatus {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl OfferStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OfferStatus::Active => "active",
            OfferStatus::Inactive => "inactive",
            OfferStatus::Other(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, OfferStatus::Active)
    }
}

impl From<String> for OfferStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => OfferStatus::Active,
            "inactive" => OfferStatus::Inactive,
            _ => OfferStatus::Other(value),
        }
    }
}

impl From<&str> for OfferStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OfferStatus> for String {
    fn from(value: OfferStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Minimum score as stored in the catalog.
///
/// Catalog data is hand-maintained, so anything that is not a finite number is
/// kept verbatim and treated as no requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreRequirement {
    Numeric(f64),
    Malformed(Value),
}

impl ScoreRequirement {
    pub fn threshold(&self) -> Option<f64> {
        match self {
            ScoreRequirement::Numeric(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for ScoreRequirement {
    fn from(value: f64) -> Self {
        ScoreRequirement::Numeric(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequirements {
    #[serde(
        default,
        alias = "minGPA",
        alias = "minGpa",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_score: Option<ScoreRequirement>,
    #[serde(default, alias = "majors", deserialize_with = "lenient_list")]
    pub eligible_majors: Vec<String>,
}

impl OfferRequirements {
    /// Well-formed minimum score, if the offer sets one.
    pub fn min_score(&self) -> Option<f64> {
        self.min_score
            .as_ref()
            .and_then(ScoreRequirement::threshold)
    }
}

/// One scholarship as published by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: OfferStatus,
    #[serde(default)]
    pub requirements: OfferRequirements,
    #[serde(default, deserialize_with = "lenient_list")]
    pub eligible_courses: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Offer {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: OfferStatus::Active,
            requirements: OfferRequirements::default(),
            eligible_courses: Vec::new(),
            description: String::new(),
            category: String::new(),
            deadline: None,
        }
    }

    pub fn with_min_score(mut self, minimum: impl Into<ScoreRequirement>) -> Self {
        self.requirements.min_score = Some(minimum.into());
        self
    }

    pub fn with_courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_courses = courses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_majors<I, S>(mut self, majors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements.eligible_majors = majors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_status(mut self, status: impl Into<OfferStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// Free text searched by openness heuristics.
    pub fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
        ]
        .join(" ")
    }

    pub fn deadline_passed(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline < today)
    }
}

/// Accepts a list of strings, a single `;`-separated string, or null.
/// Blank and non-string entries are dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let entries = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        Some(Value::String(text)) => split_list(&text),
        _ => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
