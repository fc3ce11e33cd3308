//! Turns tagger output into a validated, confidence-scored student profile.
//!
//! Extraction never fails. Spans that do not survive validation leave their
//! field absent, which lowers the overall confidence and the quality tier.

pub mod confidence;
pub mod domain;
pub mod fields;
pub mod tagger;
pub mod translation;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use confidence::{ConfidenceEstimator, SpanPosition, SALVAGE_DISCOUNT};
pub use domain::{
    AcademicScore, EntityLabel, EntitySpan, ExtractedField, ExtractionMethod, FieldConfidence,
    ProfileDraft, ProgramTranslation, QualityTier, StructuredProfile,
};
pub use fields::{ExtractionPolicy, NameCandidate, ProgramCandidate, ScoreRejection};
pub use tagger::{EntityTagger, LabeledLineTagger, TaggerError};
pub use translation::{
    field_category_of, CourseTranslator, FieldCategory, GlossaryTranslator, NoopTranslator,
    TranslationError,
};

/// Builds [`StructuredProfile`]s from documents using injected collaborators.
pub struct ProfileExtractor<T, L> {
    tagger: Arc<T>,
    translator: Arc<L>,
    policy: ExtractionPolicy,
    estimator: ConfidenceEstimator,
}

impl<T, L> ProfileExtractor<T, L>
where
    T: EntityTagger + 'static,
    L: CourseTranslator + 'static,
{
    pub fn new(tagger: Arc<T>, translator: Arc<L>) -> Self {
        Self::with_policy(tagger, translator, ExtractionPolicy::default())
    }

    pub fn with_policy(tagger: Arc<T>, translator: Arc<L>, policy: ExtractionPolicy) -> Self {
        Self {
            tagger,
            translator,
            policy,
            estimator: ConfidenceEstimator,
        }
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    /// Extract a profile from raw document text.
    pub fn extract_profile(&self, document: &str) -> StructuredProfile {
        let spans = match self.tagger.tag(document) {
            Ok(spans) => spans,
            Err(err) => {
                warn!(error = %err, "entity tagger failed; continuing with an empty profile");
                Vec::new()
            }
        };

        let draft = self.collect_fields(&spans, document.len());
        let translation = draft
            .program
            .as_ref()
            .map(|program| self.translate_program(&program.value));

        let profile = draft.finish(translation);
        info!(
            overall = profile.confidence.overall,
            tier = profile.quality_tier.label(),
            "profile extracted"
        );
        profile
    }

    /// Accept the first valid span per label; later spans of a filled label are ignored.
    pub fn collect_fields(&self, spans: &[EntitySpan], document_len: usize) -> ProfileDraft {
        let mut draft = ProfileDraft::default();

        for span in spans {
            let preview: String = span.text.chars().take(50).collect();
            debug!(label = %span.label, text = %preview, model_score = span.model_score, "entity span");

            let position = Some(SpanPosition {
                start: span.start,
                document_len,
            });

            match &span.label {
                EntityLabel::Name if draft.name.is_none() => {
                    draft.name = self.accept_name(span, position);
                }
                EntityLabel::Score if draft.score.is_none() => {
                    draft.score = self.accept_score(span, position);
                }
                EntityLabel::Program if draft.program.is_none() => {
                    draft.program = self.accept_program(span, position);
                }
                _ => {}
            }
        }

        draft
    }

    fn accept_name(
        &self,
        span: &EntitySpan,
        position: Option<SpanPosition>,
    ) -> Option<ExtractedField<String>> {
        let (value, base_score) = match fields::clean_name(&span.text, &self.policy) {
            NameCandidate::Clean(value) => (value, span.model_score),
            NameCandidate::Salvaged(value) => {
                info!(chars = span.text.chars().count(), "salvaged name from overlong span");
                (value, span.model_score * self.policy.salvage_discount)
            }
            NameCandidate::Rejected => {
                warn!(
                    chars = span.text.chars().count(),
                    "name span rejected; no plausible name line found"
                );
                return None;
            }
        };

        let confidence = self.estimator.estimate(
            &value,
            &EntityLabel::Name,
            ExtractionMethod::Ner,
            base_score,
            position,
        );
        Some(ExtractedField { value, confidence })
    }

    fn accept_score(
        &self,
        span: &EntitySpan,
        position: Option<SpanPosition>,
    ) -> Option<ExtractedField<AcademicScore>> {
        match fields::parse_score(&span.text) {
            Ok(score) => {
                let confidence = self.estimator.estimate(
                    &score.to_string(),
                    &EntityLabel::Score,
                    ExtractionMethod::Ner,
                    span.model_score,
                    position,
                );
                Some(ExtractedField {
                    value: score,
                    confidence,
                })
            }
            Err(ScoreRejection::OutOfRange(value)) => {
                warn!(value, "score outside 0.00..=4.00; ignoring span");
                None
            }
            Err(ScoreRejection::Unparsable(text)) => {
                warn!(text = %text, "cannot parse score span");
                None
            }
        }
    }

    fn accept_program(
        &self,
        span: &EntitySpan,
        position: Option<SpanPosition>,
    ) -> Option<ExtractedField<String>> {
        let value = match fields::clean_program(&span.text, &self.policy) {
            ProgramCandidate::Truncated {
                value,
                original_chars,
            } => {
                warn!(chars = original_chars, "program span too long; keeping first line");
                value
            }
            candidate => candidate.into_value()?,
        };
        let confidence = self.estimator.estimate(
            &value,
            &EntityLabel::Program,
            ExtractionMethod::Ner,
            span.model_score,
            position,
        );
        Some(ExtractedField { value, confidence })
    }

    fn translate_program(&self, program: &str) -> ProgramTranslation {
        match self.translator.translate(program) {
            Ok(english) => {
                let field_of_study = self.translator.map_to_field_category(&english);
                if english == program {
                    debug!("program needs no translation");
                } else {
                    info!(
                        field = field_of_study.map(FieldCategory::label),
                        "program translated"
                    );
                }
                ProgramTranslation {
                    english,
                    field_of_study,
                }
            }
            Err(err) => {
                warn!(error = %err, "translation unavailable; keeping original program text");
                ProgramTranslation::untranslated(program)
            }
        }
    }
}
