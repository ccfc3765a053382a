/// Tunables for ranking, pairing and evidence confidence.
///
/// Every public computation takes one of these explicitly instead of reading
/// module-level constants, so callers and tests can override any of them.
use crate::constants::{
    ANALYTICS_WEIGHT, ASSUMPTIONS_WEIGHT, BASELINE_IMPACT_SCORE, COMPARISON_CONFIDENCE_WEIGHT,
    DEFAULT_EVIDENCE_WEIGHT, ELO_SCALE, HIGH_CONFIDENCE_THRESHOLD, K_FACTOR,
    MEDIUM_CONFIDENCE_THRESHOLD, SUPPORT_TICKETS_WEIGHT, USER_FEEDBACK_WEIGHT, USER_UPLOAD_WEIGHT,
};
use crate::types::EvidenceSource;

/// Per-source evidence weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvidenceWeights {
    pub analytics: f64,
    pub user_upload: f64,
    pub support_tickets: f64,
    pub user_feedback: f64,
    pub assumptions: f64,
    /// Used for entries with no recognised source.
    pub unknown: f64,
}

impl EvidenceWeights {
    /// Total lookup: every source, plus the missing-source case, has a weight.
    pub fn weight_for(&self, source: Option<EvidenceSource>) -> f64 {
        match source {
            Some(EvidenceSource::Analytics) => self.analytics,
            Some(EvidenceSource::UserUpload) => self.user_upload,
            Some(EvidenceSource::SupportTickets) => self.support_tickets,
            Some(EvidenceSource::UserFeedback) => self.user_feedback,
            Some(EvidenceSource::Assumptions) => self.assumptions,
            None => self.unknown,
        }
    }
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        Self {
            analytics: ANALYTICS_WEIGHT,
            user_upload: USER_UPLOAD_WEIGHT,
            support_tickets: SUPPORT_TICKETS_WEIGHT,
            user_feedback: USER_FEEDBACK_WEIGHT,
            assumptions: ASSUMPTIONS_WEIGHT,
            unknown: DEFAULT_EVIDENCE_WEIGHT,
        }
    }
}

/// Cut-offs for classifying a confidence value as low / medium / high.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_CONFIDENCE_THRESHOLD,
            medium: MEDIUM_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Configuration for the ranking engine and pair selector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankingConfig {
    /// Starting impact score for every item.
    pub baseline: f64,
    pub k_factor: f64,
    /// Logistic scale of the expected-outcome curve.
    pub elo_scale: f64,
    /// Share of rank confidence taken from comparison coverage; the rest
    /// comes from evidence confidence.
    pub comparison_weight: f64,
    pub evidence_weights: EvidenceWeights,
    pub levels: LevelThresholds,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            baseline: BASELINE_IMPACT_SCORE,
            k_factor: K_FACTOR,
            elo_scale: ELO_SCALE,
            comparison_weight: COMPARISON_CONFIDENCE_WEIGHT,
            evidence_weights: EvidenceWeights::default(),
            levels: LevelThresholds::default(),
        }
    }
}
