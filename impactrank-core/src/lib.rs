/// impactrank-core: Pure-computation prioritization engine.
///
/// Pairwise "which matters more?" decisions → Elo impact scores → ranked list
/// with a confidence per item, plus the next pair worth asking about.
/// No IO, no persistence, no prompts to an AI — just math over a snapshot.
///
/// Items and decisions are identified by caller-provided `i64` IDs. Every
/// call replays the full decision history, so results depend only on the
/// inputs.
///
/// # Quick start
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use impactrank_core::{
///     next_pair, rank, Category, DecisionLog, Item, NewDecision, RankingConfig, Scope,
/// };
///
/// let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let items = vec![
///     Item::new(1, "Faster checkout", Category::Performance, Scope::Global, t),
///     Item::new(2, "Dark mode", Category::UserExperience, Scope::Global, t),
///     Item::new(3, "Retry failed syncs", Category::Reliability, Scope::Global, t),
/// ];
///
/// let mut log = DecisionLog::new();
/// log.record(&items, NewDecision::new(Scope::Global, 1, 2, 1), t).unwrap();
///
/// let config = RankingConfig::default();
/// for r in rank(&items, log.decisions(), &config) {
///     println!("#{} item {}: {:.1} ({:.2})", r.rank_position, r.id, r.impact_score, r.confidence);
/// }
///
/// assert_eq!(next_pair(&items, log.decisions(), &config), Some((1, 3)));
/// ```

pub mod config;
pub mod constants;
pub mod decisions;
pub mod elo;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod pairing;
pub mod scope;
pub mod types;

// Re-export primary public API at crate root.
pub use config::{EvidenceWeights, LevelThresholds, RankingConfig};
pub use decisions::{DecisionLog, NewDecision, RecordOutcome};
pub use engine::{
    apply_rankings, blended_confidence, rank, target_comparisons, total_pairs, RankingEngine,
};
pub use error::{DecisionError, ParseError};
pub use evidence::{evidence_confidence, identify_gaps, level, ConfidenceLevel};
pub use pairing::{next_pair, select_next, Progress, Selection};
pub use scope::ScopeSnapshot;
pub use types::{
    pair_key, Category, Decision, DecisionId, EffortLevel, Evidence, EvidenceSource, Item, ItemId,
    Pair, RankedItem, Scope,
};
