/// Evidence confidence model.
///
/// Collapses an item's heterogeneous evidence into one 0.0 to 1.0 number by
/// averaging per-source weights. Pure and deterministic.
use std::fmt;

use crate::config::{EvidenceWeights, LevelThresholds};
use crate::types::{Evidence, EvidenceSource};

/// Sources whose absence is worth asking the user about.
pub const GAP_SOURCES: [EvidenceSource; 3] = [
    EvidenceSource::Analytics,
    EvidenceSource::SupportTickets,
    EvidenceSource::UserFeedback,
];

/// Coarse bucket for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Mean source weight of the evidence, capped at 1.0. Empty evidence is 0.0.
pub fn evidence_confidence(evidence: &[Evidence], weights: &EvidenceWeights) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    let total: f64 = evidence.iter().map(|e| weights.weight_for(e.source)).sum();
    (total / evidence.len() as f64).clamp(0.0, 1.0)
}

/// Gap sources (analytics, support tickets, user feedback) with no entry
/// in `evidence`, in that fixed order.
pub fn identify_gaps(evidence: &[Evidence]) -> Vec<EvidenceSource> {
    GAP_SOURCES
        .into_iter()
        .filter(|gap| !evidence.iter().any(|e| e.source == Some(*gap)))
        .collect()
}

/// Classify a confidence score. Thresholds are inclusive lower bounds.
pub fn level(score: f64, thresholds: &LevelThresholds) -> ConfidenceLevel {
    if score >= thresholds.high {
        ConfidenceLevel::High
    } else if score >= thresholds.medium {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entries(sources: &[Option<EvidenceSource>]) -> Vec<Evidence> {
        let now = Utc::now();
        sources
            .iter()
            .map(|&s| Evidence::new("note", s, now))
            .collect()
    }

    #[test]
    fn test_empty_evidence_is_zero() {
        assert_eq!(evidence_confidence(&[], &EvidenceWeights::default()), 0.0);
    }

    #[test]
    fn test_single_source_confidence() {
        let w = EvidenceWeights::default();
        assert_eq!(evidence_confidence(&entries(&[Some(EvidenceSource::Analytics)]), &w), 1.0);
        assert_eq!(evidence_confidence(&entries(&[Some(EvidenceSource::Assumptions)]), &w), 0.3);
    }

    #[test]
    fn test_mixed_sources_average() {
        let ev = entries(&[
            Some(EvidenceSource::Analytics),
            Some(EvidenceSource::UserFeedback),
        ]);
        let c = evidence_confidence(&ev, &EvidenceWeights::default());
        assert!((c - 0.8).abs() < 1e-12, "got {c}");
    }

    #[test]
    fn test_missing_source_counts_as_assumption() {
        let w = EvidenceWeights::default();
        let unknown = evidence_confidence(&entries(&[None]), &w);
        let assumed = evidence_confidence(&entries(&[Some(EvidenceSource::Assumptions)]), &w);
        assert_eq!(unknown, assumed);
    }

    #[test]
    fn test_overridden_weights_are_capped() {
        let w = EvidenceWeights { analytics: 1.5, ..EvidenceWeights::default() };
        let c = evidence_confidence(&entries(&[Some(EvidenceSource::Analytics)]), &w);
        assert_eq!(c, 1.0);
    }

    #[test]
    fn test_identical_input_identical_output() {
        let ev = entries(&[
            Some(EvidenceSource::SupportTickets),
            Some(EvidenceSource::UserUpload),
            None,
        ]);
        let w = EvidenceWeights::default();
        assert_eq!(
            evidence_confidence(&ev, &w).to_bits(),
            evidence_confidence(&ev, &w).to_bits()
        );
    }

    #[test]
    fn test_identify_gaps() {
        assert_eq!(identify_gaps(&[]), GAP_SOURCES.to_vec());

        let ev = entries(&[
            Some(EvidenceSource::SupportTickets),
            Some(EvidenceSource::Assumptions),
        ]);
        assert_eq!(
            identify_gaps(&ev),
            vec![EvidenceSource::Analytics, EvidenceSource::UserFeedback]
        );

        let full = entries(&[
            Some(EvidenceSource::UserFeedback),
            Some(EvidenceSource::Analytics),
            Some(EvidenceSource::SupportTickets),
        ]);
        assert!(identify_gaps(&full).is_empty());
    }

    #[test]
    fn test_level_boundaries() {
        let t = LevelThresholds::default();
        assert_eq!(level(0.7, &t), ConfidenceLevel::High);
        assert_eq!(level(0.69, &t), ConfidenceLevel::Medium);
        assert_eq!(level(0.4, &t), ConfidenceLevel::Medium);
        assert_eq!(level(0.39, &t), ConfidenceLevel::Low);
        assert_eq!(level(0.0, &t), ConfidenceLevel::Low);
    }
}
