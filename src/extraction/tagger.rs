use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::{EntityLabel, EntitySpan};

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("entity tagger unavailable: {0}")]
    Unavailable(String),
    #[error("entity tagger rejected document: {0}")]
    InvalidDocument(String),
}

/// Named-entity tagger returning labeled spans for a document.
pub trait EntityTagger: Send + Sync {
    fn tag(&self, document: &str) -> Result<Vec<EntitySpan>, TaggerError>;
}

/// Tags `Label: value` lines such as `CGPA: 3.75` or `Nama: Jane Doe`.
///
/// Stands in for a trained model when documents arrive pre-structured; every
/// span carries the same configured model score.
#[derive(Debug, Clone, Copy)]
pub struct LabeledLineTagger {
    model_score: f32,
}

impl LabeledLineTagger {
    pub fn new(model_score: f32) -> Self {
        Self { model_score }
    }
}

impl Default for LabeledLineTagger {
    fn default() -> Self {
        Self::new(0.9)
    }
}

static LINE_LABELS: OnceLock<HashMap<&'static str, EntityLabel>> = OnceLock::new();

fn line_label(key: &str) -> Option<&'static EntityLabel> {
    LINE_LABELS
        .get_or_init(|| {
            const KEYS: &[(&str, EntityLabel)] = &[
                ("name", EntityLabel::Name),
                ("student name", EntityLabel::Name),
                ("full name", EntityLabel::Name),
                ("nama", EntityLabel::Name),
                ("nama pelajar", EntityLabel::Name),
                ("cgpa", EntityLabel::Score),
                ("gpa", EntityLabel::Score),
                ("pngk", EntityLabel::Score),
                ("program", EntityLabel::Program),
                ("programme", EntityLabel::Program),
                ("program pengajian", EntityLabel::Program),
                ("course", EntityLabel::Program),
            ];
            KEYS.iter()
                .map(|(key, label)| (*key, label.clone()))
                .collect()
        })
        .get(key)
}

impl EntityTagger for LabeledLineTagger {
    fn tag(&self, document: &str) -> Result<Vec<EntitySpan>, TaggerError> {
        let mut spans = Vec::new();
        let mut offset = 0;

        for line in document.split_inclusive('\n') {
            if let Some((key, value)) = line.split_once(':') {
                let normalized = key.split_whitespace().collect::<Vec<_>>().join(" ");
                let value_trimmed = value.trim();
                if let Some(label) = line_label(&normalized.to_lowercase()) {
                    if !value_trimmed.is_empty() {
                        let leading = value.len() - value.trim_start().len();
                        let start = offset + key.len() + 1 + leading;
                        spans.push(EntitySpan::new(
                            value_trimmed,
                            label.clone(),
                            start,
                            self.model_score,
                        ));
                    }
                }
            }
            offset += line.len();
        }

        Ok(spans)
    }
}
