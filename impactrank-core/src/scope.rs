/// Restricting a mixed collection of items and decisions to one scope.
use crate::config::RankingConfig;
use crate::engine::rank;
use crate::pairing::{select_next, Selection};
use crate::types::{Decision, Item, RankedItem, Scope};

/// A consistent, single-scope view: the input to every ranking call.
///
/// Items come from `scope` only; decisions must match `scope` and reference
/// two items of the snapshot. Nothing from another scope can leak in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSnapshot {
    pub scope: Scope,
    pub items: Vec<Item>,
    pub decisions: Vec<Decision>,
}

impl ScopeSnapshot {
    pub fn collect<'a>(
        scope: &Scope,
        items: impl IntoIterator<Item = &'a Item>,
        decisions: impl IntoIterator<Item = &'a Decision>,
    ) -> Self {
        let items: Vec<Item> = items
            .into_iter()
            .filter(|i| &i.scope == scope)
            .cloned()
            .collect();
        let decisions: Vec<Decision> = decisions
            .into_iter()
            .filter(|d| {
                &d.scope == scope
                    && items.iter().any(|i| i.id == d.item_a)
                    && items.iter().any(|i| i.id == d.item_b)
            })
            .cloned()
            .collect();
        ScopeSnapshot {
            scope: scope.clone(),
            items,
            decisions,
        }
    }

    pub fn rank(&self, config: &RankingConfig) -> Vec<RankedItem> {
        rank(&self.items, &self.decisions, config)
    }

    pub fn select_next(&self, config: &RankingConfig) -> Selection {
        select_next(&self.items, &self.decisions, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_collect_keeps_only_scope_members() {
        let t = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let session = Scope::Session("launch".into());
        let items = vec![
            Item::new(1, "a", Category::Feature, Scope::Global, t),
            Item::new(2, "b", Category::Feature, session.clone(), t),
            Item::new(3, "c", Category::Feature, session.clone(), t),
            Item::new(4, "d", Category::Feature, Scope::Global, t),
        ];
        let decision = |id, a, b, scope: &Scope| Decision {
            id,
            item_a: a,
            item_b: b,
            winner: a,
            rationale: None,
            prompt: None,
            scope: scope.clone(),
            decided_at: t,
            is_modified: false,
            modified_at: None,
        };
        let decisions = vec![
            decision(1, 2, 3, &session),
            decision(2, 1, 4, &Scope::Global),
            // mislabelled: global items under the session scope
            decision(3, 1, 4, &session),
        ];

        let snapshot = ScopeSnapshot::collect(&session, &items, &decisions);
        assert_eq!(snapshot.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(snapshot.decisions.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);

        let rankings = snapshot.rank(&RankingConfig::default());
        assert_eq!(rankings[0].id, 2);
        assert!(snapshot.select_next(&RankingConfig::default()).is_done());
    }
}
