/// Impact score every item starts from before any decision is replayed.
/// Items that never appear in a decision stay exactly here.
pub const BASELINE_IMPACT_SCORE: f64 = 1500.0;

/// Elo K-factor: the maximum score a single decision can move an item.
pub const K_FACTOR: f64 = 32.0;

/// Rating difference at which the stronger item is expected to win 10:1.
/// Standard Elo logistic scale.
pub const ELO_SCALE: f64 = 400.0;

/// Share of rank confidence that comes from comparison coverage.
/// The remainder (0.3) comes from the item's evidence confidence.
pub const COMPARISON_CONFIDENCE_WEIGHT: f64 = 0.7;

/// Per-source evidence weights, assigned when an evidence entry is created.
pub const ANALYTICS_WEIGHT: f64 = 1.0;
pub const USER_UPLOAD_WEIGHT: f64 = 0.9;
pub const SUPPORT_TICKETS_WEIGHT: f64 = 0.8;
pub const USER_FEEDBACK_WEIGHT: f64 = 0.6;
pub const ASSUMPTIONS_WEIGHT: f64 = 0.3;

/// Weight used when an evidence entry carries no recognised source.
/// Same as an assumption.
pub const DEFAULT_EVIDENCE_WEIGHT: f64 = ASSUMPTIONS_WEIGHT;

/// Confidence at or above which an item is reported as "high".
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Confidence at or above which an item is reported as "medium".
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.4;
