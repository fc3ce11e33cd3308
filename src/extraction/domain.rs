use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::translation::FieldCategory;

/// Field a tagger span was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Name,
    Score,
    Program,
    /// Labels the extractor does not consume.
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Name => "STUDENT_NAME",
            EntityLabel::Score => "CGPA",
            EntityLabel::Program => "PROGRAM",
            EntityLabel::Other(raw) => raw,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "STUDENT_NAME" | "NAME" => EntityLabel::Name,
            "CGPA" | "GPA" | "SCORE" => EntityLabel::Score,
            "PROGRAM" | "PROGRAMME" => EntityLabel::Program,
            _ => EntityLabel::Other(value),
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EntityLabel> for String {
    fn from(value: EntityLabel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labeled substring produced by the tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset of the span within the tagged document.
    #[serde(default)]
    pub start: usize,
    /// Base model score in `[0, 1]`.
    pub model_score: f32,
}

impl EntitySpan {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<EntityLabel>,
        start: usize,
        model_score: f32,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            model_score,
        }
    }
}

/// How a field value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Ner,
}

impl ExtractionMethod {
    pub const fn label(self) -> &'static str {
        match self {
            ExtractionMethod::Ner => "ner",
        }
    }

    pub(crate) const fn weight(self) -> f32 {
        match self {
            ExtractionMethod::Ner => 1.0,
        }
    }
}

/// Cumulative grade point average on the fixed 0.00 to 4.00 scale.
///
/// Always rendered with two decimal places, both for display and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AcademicScore(f64);

impl AcademicScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 4.0;

    /// Accepts values inside the scale; anything else (including NaN) is rejected, never clamped.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self((value * 100.0).round() / 100.0))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for AcademicScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for AcademicScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AcademicScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(value) => value,
            Raw::Text(text) => text.trim().parse::<f64>().map_err(D::Error::custom)?,
        };

        AcademicScore::new(value).ok_or_else(|| {
            D::Error::custom(format!(
                "score {value} outside {:.1}..={:.1}",
                AcademicScore::MIN,
                AcademicScore::MAX
            ))
        })
    }
}

/// Coarse bucket summarizing extraction confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    pub fn from_confidence(overall: f32) -> Self {
        if overall >= 0.85 {
            QualityTier::High
        } else if overall >= 0.70 {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }
}

/// Per-field reliability plus their mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub name: f32,
    pub score: f32,
    pub program: f32,
    pub overall: f32,
}

impl FieldConfidence {
    pub fn new(name: f32, score: f32, program: f32) -> Self {
        Self {
            name,
            score,
            program,
            overall: round3(Self::mean_of(name, score, program)),
        }
    }

    /// Unrounded mean of the three fields. Tiers are decided on this value;
    /// `overall` is only the reported figure.
    pub fn mean(&self) -> f32 {
        Self::mean_of(self.name, self.score, self.program)
    }

    fn mean_of(name: f32, score: f32, program: f32) -> f32 {
        (name + score + program) / 3.0
    }
}

/// Accepted field value with the confidence it was accepted at.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField<T> {
    pub value: T,
    pub confidence: f32,
}

/// English rendering of the program and its field category.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramTranslation {
    pub english: String,
    pub field_of_study: Option<FieldCategory>,
}

impl ProgramTranslation {
    /// Keeps the original text when no translation is available.
    pub fn untranslated(program: &str) -> Self {
        Self {
            english: program.to_string(),
            field_of_study: None,
        }
    }
}

/// Accepted fields gathered from tagger spans before translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub name: Option<ExtractedField<String>>,
    pub score: Option<ExtractedField<AcademicScore>>,
    pub program: Option<ExtractedField<String>>,
}

impl ProfileDraft {
    pub fn finish(self, translation: Option<ProgramTranslation>) -> StructuredProfile {
        let confidence = FieldConfidence::new(
            self.name.as_ref().map_or(0.0, |field| field.confidence),
            self.score.as_ref().map_or(0.0, |field| field.confidence),
            self.program.as_ref().map_or(0.0, |field| field.confidence),
        );

        let program_raw = self.program.map(|field| field.value);
        let translation = match (&program_raw, translation) {
            (Some(_), Some(translation)) => Some(translation),
            (Some(raw), None) => Some(ProgramTranslation::untranslated(raw)),
            (None, _) => None,
        };
        let (program_translated, field_of_study) = match translation {
            Some(translation) => (Some(translation.english), translation.field_of_study),
            None => (None, None),
        };

        StructuredProfile {
            name: self.name.map(|field| field.value),
            score: self.score.map(|field| field.value),
            program_raw,
            program_translated,
            field_of_study,
            declared_major: None,
            quality_tier: QualityTier::from_confidence(confidence.mean()),
            confidence,
            method: ExtractionMethod::Ner,
        }
    }
}

/// Confidence-scored representation of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredProfile {
    pub name: Option<String>,
    pub score: Option<AcademicScore>,
    pub program_raw: Option<String>,
    pub program_translated: Option<String>,
    pub field_of_study: Option<FieldCategory>,
    /// Major declared by the student outside the document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_major: Option<String>,
    pub confidence: FieldConfidence,
    pub quality_tier: QualityTier,
    pub method: ExtractionMethod,
}

impl StructuredProfile {
    pub fn with_declared_major(mut self, major: impl Into<String>) -> Self {
        let major = major.into();
        self.declared_major = if major.trim().is_empty() {
            None
        } else {
            Some(major)
        };
        self
    }

    /// String compared against an offer's eligible courses and majors.
    pub fn declared_study(&self) -> &str {
        self.declared_major
            .as_deref()
            .or(self.program_translated.as_deref())
            .or(self.program_raw.as_deref())
            .unwrap_or("")
    }

    /// Score used by numeric gates; a missing score compares as zero.
    pub fn score_value(&self) -> f64 {
        self.score.map_or(0.0, AcademicScore::value)
    }
}

pub(crate) fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_tagger_vocabulary() {
        assert_eq!(EntityLabel::from("STUDENT_NAME"), EntityLabel::Name);
        assert_eq!(EntityLabel::from("cgpa"), EntityLabel::Score);
        assert_eq!(EntityLabel::from("PROGRAM"), EntityLabel::Program);
        assert_eq!(
            EntityLabel::from("UNIVERSITY"),
            EntityLabel::Other("UNIVERSITY".to_string())
        );
    }

    #[test]
    fn academic_score_rejects_values_outside_scale() {
        assert!(AcademicScore::new(4.0).is_some());
        assert!(AcademicScore::new(0.0).is_some());
        assert!(AcademicScore::new(4.01).is_none());
        assert!(AcademicScore::new(-0.1).is_none());
        assert!(AcademicScore::new(f64::NAN).is_none());
    }

    #[test]
    fn academic_score_serializes_with_two_decimals() {
        let score = AcademicScore::new(3.5).expect("in range");
        assert_eq!(score.to_string(), "3.50");
        assert_eq!(serde_json::to_value(score).expect("serializes"), "3.50");

        let parsed: AcademicScore = serde_json::from_str("3.456").expect("number accepted");
        assert_eq!(parsed.to_string(), "3.46");
        let parsed: AcademicScore = serde_json::from_str("\"2.1\"").expect("string accepted");
        assert_eq!(parsed.to_string(), "2.10");
        assert!(serde_json::from_str::<AcademicScore>("\"4.5\"").is_err());
    }

    #[test]
    fn quality_tier_thresholds_are_inclusive() {
        assert_eq!(QualityTier::from_confidence(0.85), QualityTier::High);
        assert_eq!(QualityTier::from_confidence(0.849), QualityTier::Medium);
        assert_eq!(QualityTier::from_confidence(0.70), QualityTier::Medium);
        assert_eq!(QualityTier::from_confidence(0.699), QualityTier::Low);
    }

    #[test]
    fn absent_fields_count_as_zero_in_overall_confidence() {
        let draft = ProfileDraft {
            name: Some(ExtractedField {
                value: "Jane Doe".to_string(),
                confidence: 0.9,
            }),
            score: None,
            program: None,
        };

        let profile = draft.finish(None);

        assert!((profile.confidence.overall - 0.3).abs() < 1e-6);
        assert_eq!(profile.quality_tier, QualityTier::Low);
        assert!(profile.program_translated.is_none());
    }

    #[test]
    fn tier_uses_mean_before_rounding() {
        let field = |value: &str| {
            Some(ExtractedField {
                value: value.to_string(),
                confidence: 0.8497,
            })
        };
        let draft = ProfileDraft {
            name: field("Jane Doe"),
            score: AcademicScore::new(3.5).map(|value| ExtractedField {
                value,
                confidence: 0.8497,
            }),
            program: field("Bachelor of Computer Science"),
        };

        let profile = draft.finish(None);

        assert!((profile.confidence.overall - 0.85).abs() < 1e-6);
        assert_eq!(profile.quality_tier, QualityTier::Medium);
    }

    #[test]
    fn program_without_translation_keeps_original_text() {
        let draft = ProfileDraft {
            program: Some(ExtractedField {
                value: "Diploma Perakaunan".to_string(),
                confidence: 0.8,
            }),
            ..ProfileDraft::default()
        };

        let profile = draft.finish(None);

        assert_eq!(profile.program_raw.as_deref(), Some("Diploma Perakaunan"));
        assert_eq!(
            profile.program_translated.as_deref(),
            Some("Diploma Perakaunan")
        );
        assert!(profile.field_of_study.is_none());
    }

    #[test]
    fn declared_major_takes_precedence_for_matching() {
        let draft = ProfileDraft {
            program: Some(ExtractedField {
                value: "Sains Komputer".to_string(),
                confidence: 0.8,
            }),
            ..ProfileDraft::default()
        };
        let profile = draft.finish(None);
        assert_eq!(profile.declared_study(), "Sains Komputer");

        let profile = profile.with_declared_major("Data Science");
        assert_eq!(profile.declared_study(), "Data Science");
        assert_eq!(profile.score_value(), 0.0);
    }
}
