/// Ranking engine.
///
/// Pure computation: no async, no IO. The host loads a scope's items and
/// decisions, calls [`rank`], then writes the result back with
/// [`apply_rankings`] and persists it.
use std::collections::HashMap;

use tracing::debug;

use crate::config::RankingConfig;
use crate::elo::replay;
use crate::evidence::{evidence_confidence, level};
use crate::pairing::{select_next, Selection};
use crate::types::{Decision, Evidence, IdMap, Item, RankedItem};

/// Confidence from comparison coverage blended with evidence confidence.
///
/// Coverage is the share of the other `num_items - 1` items this item has
/// been compared against, clamped to 1.0.
pub fn blended_confidence(
    comparisons: usize,
    num_items: usize,
    evidence: &[Evidence],
    config: &RankingConfig,
) -> f64 {
    let peers = num_items.saturating_sub(1).max(1) as f64;
    let coverage = (comparisons as f64 / peers).clamp(0.0, 1.0);
    let evidence = evidence_confidence(evidence, &config.evidence_weights);
    let w = config.comparison_weight.clamp(0.0, 1.0);
    (w * coverage + (1.0 - w) * evidence).clamp(0.0, 1.0)
}

/// Rank every item in a scope from its full decision history.
///
/// Returns one entry per item, ordered by rank position (1..=n). Position
/// ties on impact score are broken by confidence level bucket (high first),
/// then raw confidence within the bucket, then creation time (older first),
/// then item id. A lone item sits at position 1 on the baseline score.
pub fn rank(items: &[Item], decisions: &[Decision], config: &RankingConfig) -> Vec<RankedItem> {
    let num_items = items.len();
    if num_items == 0 {
        debug!("nothing to rank");
        return Vec::new();
    }

    let id_map = IdMap::from_ids(items.iter().map(|i| i.id));
    let elo = replay(&id_map, items, decisions, config);

    let confidences: Vec<f64> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            blended_confidence(elo.games_played[idx], num_items, &item.evidence, config)
        })
        .collect();
    let levels: Vec<_> = confidences.iter().map(|&c| level(c, &config.levels)).collect();

    let mut order: Vec<usize> = (0..num_items).collect();
    order.sort_by(|&a, &b| {
        elo.ratings[b]
            .total_cmp(&elo.ratings[a])
            .then(levels[b].cmp(&levels[a]))
            .then(confidences[b].total_cmp(&confidences[a]))
            .then(items[a].created_at.cmp(&items[b].created_at))
            .then(items[a].id.cmp(&items[b].id))
    });

    debug!(
        num_items,
        num_decisions = decisions.len(),
        top = id_map.to_id(order[0]),
        "recomputed ranking"
    );

    order
        .into_iter()
        .enumerate()
        .map(|(position, idx)| RankedItem {
            id: id_map.to_id(idx),
            rank_position: position + 1,
            impact_score: elo.ratings[idx],
            confidence: confidences[idx],
        })
        .collect()
}

/// Overwrite the ranking fields of `items` with `rankings`.
///
/// This is a full overwrite: an item with no entry in `rankings` has its
/// fields reset to the configured baseline.
pub fn apply_rankings(items: &mut [Item], rankings: &[RankedItem], config: &RankingConfig) {
    let by_id: HashMap<_, _> = rankings.iter().map(|r| (r.id, r)).collect();
    for item in items.iter_mut() {
        match by_id.get(&item.id) {
            Some(r) => {
                item.rank_position = Some(r.rank_position);
                item.impact_score = r.impact_score;
                item.rank_confidence = r.confidence;
            }
            None => item.clear_ranking(config.baseline),
        }
    }
}

/// Comparisons needed for a confident ranking by a comparison sort:
/// `ceil(n * log2(n))`. Zero for fewer than two items.
pub fn target_comparisons(num_items: usize) -> usize {
    if num_items < 2 {
        return 0;
    }
    let n = num_items as f64;
    (n * n.log2()).ceil() as usize
}

/// Number of distinct unordered pairs: `n * (n - 1) / 2`.
pub fn total_pairs(num_items: usize) -> usize {
    num_items * num_items.saturating_sub(1) / 2
}

/// Convenience wrapper that carries one [`RankingConfig`] across calls.
///
/// Holds no ranking state: every call recomputes from the inputs it is given.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        RankingEngine { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn rank(&self, items: &[Item], decisions: &[Decision]) -> Vec<RankedItem> {
        rank(items, decisions, &self.config)
    }

    /// Rank, then write the result back onto `items`.
    pub fn rerank(&self, items: &mut [Item], decisions: &[Decision]) -> Vec<RankedItem> {
        let rankings = rank(items, decisions, &self.config);
        apply_rankings(items, &rankings, &self.config);
        rankings
    }

    pub fn select_next(&self, items: &[Item], decisions: &[Decision]) -> Selection {
        select_next(items, decisions, &self.config)
    }

    pub fn evidence_confidence(&self, evidence: &[Evidence]) -> f64 {
        evidence_confidence(evidence, &self.config.evidence_weights)
    }
}
