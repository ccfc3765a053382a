/// Elo rating replay over a scope's decision history.
///
/// Every call starts from the baseline and folds over the decisions in
/// chronological order, so the same decision set always produces the same
/// ratings. No rating state survives between calls.
/// Internal module: operates on pre-mapped `usize` indices.
use tracing::warn;

use crate::config::RankingConfig;
use crate::types::{Decision, IdMap, Item};

/// Probability that an item rated `rating_a` beats one rated `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / scale))
}

/// A decision resolved to internal indices: (winner, loser).
pub(crate) type IndexedMatch = (usize, usize);

pub(crate) struct EloReplay {
    /// Current ratings (indexed 0..num_items).
    pub ratings: Vec<f64>,
    /// Decisions each item took part in (indexed 0..num_items).
    pub games_played: Vec<usize>,
}

impl EloReplay {
    pub fn new(num_items: usize, baseline: f64) -> Self {
        EloReplay {
            ratings: vec![baseline; num_items],
            games_played: vec![0; num_items],
        }
    }

    /// Play one match and move both ratings by `k * (actual - expected)`.
    pub fn play(&mut self, (winner, loser): IndexedMatch, k_factor: f64, scale: f64) {
        let expected_winner = expected_score(self.ratings[winner], self.ratings[loser], scale);
        let expected_loser = 1.0 - expected_winner;

        self.ratings[winner] += k_factor * (1.0 - expected_winner);
        self.ratings[loser] += k_factor * (0.0 - expected_loser);

        self.games_played[winner] += 1;
        self.games_played[loser] += 1;
    }
}

/// Resolve decisions to indexed matches in replay order (`decided_at`,
/// then decision id). Decisions that break the caller contract are skipped.
pub(crate) fn ordered_matches(
    id_map: &IdMap,
    items: &[Item],
    decisions: &[Decision],
) -> Vec<IndexedMatch> {
    let mut valid: Vec<(&Decision, IndexedMatch)> = Vec::with_capacity(decisions.len());

    for d in decisions {
        let (Some(a), Some(b)) = (id_map.to_idx(d.item_a), id_map.to_idx(d.item_b)) else {
            warn!(decision = d.id, "skipping decision referencing an item outside the scope");
            continue;
        };
        if a == b {
            warn!(decision = d.id, "skipping self-comparison");
            continue;
        }
        if items[a].scope != d.scope || items[b].scope != d.scope {
            warn!(decision = d.id, scope = %d.scope, "skipping decision from another scope");
            continue;
        }
        let indexed = if d.winner == d.item_a {
            (a, b)
        } else if d.winner == d.item_b {
            (b, a)
        } else {
            warn!(
                decision = d.id,
                winner = d.winner,
                "skipping decision whose winner is not in the pair"
            );
            continue;
        };
        valid.push((d, indexed));
    }

    valid.sort_by(|(x, _), (y, _)| x.decided_at.cmp(&y.decided_at).then(x.id.cmp(&y.id)));
    valid.into_iter().map(|(_, m)| m).collect()
}

/// Replay the full decision history from the baseline.
pub(crate) fn replay(
    id_map: &IdMap,
    items: &[Item],
    decisions: &[Decision],
    config: &RankingConfig,
) -> EloReplay {
    let mut elo = EloReplay::new(id_map.len(), config.baseline);
    for m in ordered_matches(id_map, items, decisions) {
        elo.play(m, config.k_factor, config.elo_scale);
    }
    elo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_even_match() {
        assert!((expected_score(1500.0, 1500.0, 400.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_ten_to_one() {
        let p = expected_score(1900.0, 1500.0, 400.0);
        assert!((p - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_match_moves_half_k() {
        let mut elo = EloReplay::new(2, 1500.0);
        elo.play((0, 1), 32.0, 400.0);
        assert_eq!(elo.ratings, vec![1516.0, 1484.0]);
        assert_eq!(elo.games_played, vec![1, 1]);
    }

    #[test]
    fn test_rating_is_conserved() {
        let mut elo = EloReplay::new(3, 1500.0);
        elo.play((0, 1), 32.0, 400.0);
        elo.play((1, 2), 32.0, 400.0);
        elo.play((2, 0), 32.0, 400.0);
        let total: f64 = elo.ratings.iter().sum();
        assert!((total - 4500.0).abs() < 1e-9);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let mut favoured = EloReplay::new(2, 1500.0);
        favoured.ratings[0] = 1700.0;
        let mut upset = EloReplay::new(2, 1500.0);
        upset.ratings[0] = 1700.0;

        favoured.play((0, 1), 32.0, 400.0);
        upset.play((1, 0), 32.0, 400.0);

        let favoured_gain = favoured.ratings[0] - 1700.0;
        let upset_gain = upset.ratings[1] - 1500.0;
        assert!(upset_gain > favoured_gain);
    }
}
