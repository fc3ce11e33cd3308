use crate::extraction::StructuredProfile;

use super::offer::Offer;

/// Which branch of the minimum-score gate fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOutcome {
    /// No minimum, or one that is not a usable number.
    Unrestricted,
    Met { score: f64, minimum: f64 },
    NotMet { score: Option<f64>, minimum: f64 },
}

impl GateOutcome {
    pub const fn score(self) -> u8 {
        match self {
            GateOutcome::Unrestricted | GateOutcome::Met { .. } => 100,
            GateOutcome::NotMet { .. } => 0,
        }
    }

    pub const fn passed(self) -> bool {
        self.score() == 100
    }
}

/// Binary hard-requirement check. A profile without a score compares as 0.0.
pub fn evaluate_gate(offer: &Offer, profile: &StructuredProfile) -> GateOutcome {
    let Some(minimum) = offer.requirements.min_score() else {
        return GateOutcome::Unrestricted;
    };

    let score = profile.score.map(|score| score.value());
    if profile.score_value() >= minimum {
        GateOutcome::Met {
            score: profile.score_value(),
            minimum,
        }
    } else {
        GateOutcome::NotMet { score, minimum }
    }
}

pub fn rule_score(offer: &Offer, profile: &StructuredProfile) -> u8 {
    evaluate_gate(offer, profile).score()
}
