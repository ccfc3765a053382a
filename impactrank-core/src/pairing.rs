/// Pair selection for the next "which matters more?" question.
///
/// Deterministic: the same items and decisions always yield the same pair.
/// Works with caller item IDs at the boundary and `usize` indices inside.
use std::collections::HashSet;

use tracing::debug;

use crate::config::RankingConfig;
use crate::elo::{ordered_matches, replay};
use crate::engine::{target_comparisons, total_pairs};
use crate::types::{Decision, IdMap, Item, Pair};

/// How far along a scope is, for display only.
///
/// `fraction` is measured against the `ceil(n * log2(n))` estimate and caps
/// at 1.0. It is not a stopping rule: selection continues until every pair
/// has been decided.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// Distinct pairs decided so far.
    pub completed: usize,
    /// Estimated comparisons for a confident ranking.
    pub target: usize,
    /// Pairs needed for full exhaustion.
    pub total_pairs: usize,
    pub fraction: f64,
}

impl Progress {
    pub fn new(completed: usize, num_items: usize) -> Self {
        let target = target_comparisons(num_items);
        let fraction = if target == 0 {
            1.0
        } else {
            (completed as f64 / target as f64).min(1.0)
        };
        Progress {
            completed,
            target,
            total_pairs: total_pairs(num_items),
            fraction,
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }

    /// Pairs still undecided.
    pub fn remaining_pairs(&self) -> usize {
        self.total_pairs.saturating_sub(self.completed)
    }
}

/// The next pair to compare (or `None` when done) plus progress.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub pair: Option<Pair>,
    pub progress: Progress,
}

impl Selection {
    pub fn is_done(&self) -> bool {
        self.pair.is_none()
    }
}

/// Propose the next pair to compare, or `None` once every pair in the
/// scope has a decision.
pub fn next_pair(items: &[Item], decisions: &[Decision], config: &RankingConfig) -> Option<Pair> {
    select_next(items, decisions, config).pair
}

/// Propose the next pair and report progress.
///
/// Among undecided pairs, picks the one whose members have the fewest
/// comparisons between them. Ties go to the pair with the smallest current
/// impact-score gap, then to creation order.
pub fn select_next(items: &[Item], decisions: &[Decision], config: &RankingConfig) -> Selection {
    let num_items = items.len();
    if num_items < 2 {
        return Selection {
            pair: None,
            progress: Progress::new(0, num_items),
        };
    }

    let id_map = IdMap::from_ids(items.iter().map(|i| i.id));
    let decided = decided_pairs(&id_map, items, decisions);
    let progress = Progress::new(decided.len(), num_items);

    let pair = select_pair_indexed(items, decisions, &id_map, &decided, config)
        .map(|(a, b)| (id_map.to_id(a), id_map.to_id(b)));

    debug!(
        num_items,
        completed = progress.completed,
        remaining = progress.remaining_pairs(),
        ?pair,
        "selected next pair"
    );

    Selection { pair, progress }
}

/// Unordered index pairs (low, high) that already have a valid decision.
fn decided_pairs(
    id_map: &IdMap,
    items: &[Item],
    decisions: &[Decision],
) -> HashSet<(usize, usize)> {
    ordered_matches(id_map, items, decisions)
        .into_iter()
        .map(|(w, l)| if w < l { (w, l) } else { (l, w) })
        .collect()
}

fn select_pair_indexed(
    items: &[Item],
    decisions: &[Decision],
    id_map: &IdMap,
    decided: &HashSet<(usize, usize)>,
    config: &RankingConfig,
) -> Option<(usize, usize)> {
    let elo = replay(id_map, items, decisions, config);

    // Enumerate in creation order so the final tie-break is stable.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .created_at
            .cmp(&items[b].created_at)
            .then(items[a].id.cmp(&items[b].id))
    });

    // (comparison count, score gap, first, second)
    let mut best: Option<(usize, f64, usize, usize)> = None;

    for (pos, &a) in order.iter().enumerate() {
        for &b in &order[pos + 1..] {
            let key = if a < b { (a, b) } else { (b, a) };
            if decided.contains(&key) {
                continue;
            }

            let count = elo.games_played[a] + elo.games_played[b];
            let gap = (elo.ratings[a] - elo.ratings[b]).abs();

            let better = match best {
                None => true,
                Some((best_count, best_gap, _, _)) => {
                    count < best_count || (count == best_count && gap < best_gap)
                }
            };
            if better {
                best = Some((count, gap, a, b));
            }
        }
    }

    best.map(|(_, _, a, b)| (a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Scope};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn make_items(n: i64) -> Vec<Item> {
        (1..=n)
            .map(|id| {
                Item::new(
                    id,
                    format!("item {id}"),
                    Category::Performance,
                    Scope::Global,
                    t0() + Duration::seconds(id),
                )
            })
            .collect()
    }

    fn decide(id: i64, a: i64, b: i64, winner: i64) -> Decision {
        Decision {
            id,
            item_a: a,
            item_b: b,
            winner,
            rationale: None,
            prompt: None,
            scope: Scope::Global,
            decided_at: t0() + Duration::minutes(id),
            is_modified: false,
            modified_at: None,
        }
    }

    #[test]
    fn test_fewer_than_two_items_is_done() {
        let config = RankingConfig::default();
        assert_eq!(next_pair(&[], &[], &config), None);
        let selection = select_next(&make_items(1), &[], &config);
        assert!(selection.is_done());
        assert_eq!(selection.progress.fraction, 1.0);
    }

    #[test]
    fn test_first_pair_is_oldest_two() {
        let items = make_items(4);
        assert_eq!(next_pair(&items, &[], &RankingConfig::default()), Some((1, 2)));
    }

    #[test]
    fn test_prefers_least_compared_items() {
        let items = make_items(4);
        let decisions = vec![decide(1, 1, 2, 1)];
        // {3,4} has zero comparisons between its members
        assert_eq!(next_pair(&items, &decisions, &RankingConfig::default()), Some((3, 4)));
    }

    #[test]
    fn test_tie_on_count_goes_to_smallest_gap() {
        let items = make_items(3);
        let decisions = vec![decide(1, 1, 2, 1)];
        let pair = next_pair(&items, &decisions, &RankingConfig::default()).unwrap();
        // both remaining pairs have one comparison and a 16 point gap;
        // creation order picks item 1 first
        assert_eq!(pair, (1, 3));
    }

    #[test]
    fn test_smaller_gap_wins_when_counts_match() {
        let items = make_items(4);
        // 1 and 2 each won once, 3 and 4 each lost once
        let decisions = vec![decide(1, 1, 3, 1), decide(2, 2, 4, 2)];
        let pair = next_pair(&items, &decisions, &RankingConfig::default()).unwrap();
        // {1,2} and {3,4} have gap 0; {1,4}, {2,3} have gap 32
        assert_eq!(pair, (1, 2));
    }

    #[test]
    fn test_never_reoffers_decided_pair_in_either_order() {
        let items = make_items(2);
        let decisions = vec![decide(1, 2, 1, 2)];
        let selection = select_next(&items, &decisions, &RankingConfig::default());
        assert!(selection.is_done());
        assert_eq!(selection.progress.completed, 1);
        assert_eq!(selection.progress.remaining_pairs(), 0);
    }

    #[test]
    fn test_decisions_from_other_scope_do_not_count() {
        let items = make_items(2);
        let foreign = Decision { scope: Scope::Session("s1".into()), ..decide(1, 1, 2, 1) };
        assert_eq!(next_pair(&items, &[foreign], &RankingConfig::default()), Some((1, 2)));
    }

    #[test]
    fn test_exhausts_after_all_pairs() {
        let items = make_items(5);
        let config = RankingConfig::default();
        let mut decisions = Vec::new();
        let mut seen = HashSet::new();

        while let Some((a, b)) = next_pair(&items, &decisions, &config) {
            assert_ne!(a, b);
            assert!(seen.insert((a.min(b), a.max(b))), "pair ({a}, {b}) offered twice");
            let id = decisions.len() as i64 + 1;
            decisions.push(decide(id, a, b, a.max(b)));
        }
        assert_eq!(decisions.len(), 10);
    }

    #[test]
    fn test_progress_caps_at_one() {
        let progress = Progress::new(40, 5);
        assert_eq!(progress.target, 12);
        assert_eq!(progress.total_pairs, 10);
        assert_eq!(progress.fraction, 1.0);

        let halfway = Progress::new(6, 5);
        assert!((halfway.percent() - 50.0).abs() < 1e-9);
    }
}
