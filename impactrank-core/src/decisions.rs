/// Decision log with boundary validation.
///
/// Holds at most one decision per (scope, unordered pair). Recording a pair
/// that already has a decision rewrites that record in place and marks it
/// modified; nothing here ever deletes a decision on its own.
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::DecisionError;
use crate::types::{pair_key, Decision, DecisionId, Item, ItemId, Scope};

/// Caller input for [`DecisionLog::record`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewDecision {
    pub scope: Scope,
    pub item_a: ItemId,
    pub item_b: ItemId,
    pub winner: ItemId,
    pub rationale: Option<String>,
    pub prompt: Option<String>,
}

impl NewDecision {
    pub fn new(scope: Scope, item_a: ItemId, item_b: ItemId, winner: ItemId) -> Self {
        NewDecision {
            scope,
            item_a,
            item_b,
            winner,
            rationale: None,
            prompt: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Created(DecisionId),
    /// An existing decision for the same pair was overwritten.
    Updated(DecisionId),
}

impl RecordOutcome {
    pub fn id(self) -> DecisionId {
        match self {
            RecordOutcome::Created(id) | RecordOutcome::Updated(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionLog {
    decisions: Vec<Decision>,
    next_id: DecisionId,
}

impl DecisionLog {
    pub fn new() -> Self {
        DecisionLog {
            decisions: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap decisions loaded from storage. They are trusted as-is.
    pub fn from_decisions(decisions: Vec<Decision>) -> Self {
        let next_id = decisions.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        DecisionLog { decisions, next_id }
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Decisions belonging to `scope`, in storage order.
    pub fn in_scope<'a>(&'a self, scope: &'a Scope) -> impl Iterator<Item = &'a Decision> + 'a {
        self.decisions.iter().filter(move |d| &d.scope == scope)
    }

    /// The decision for the unordered pair {a, b} in `scope`, if any.
    pub fn find(&self, scope: &Scope, a: ItemId, b: ItemId) -> Option<&Decision> {
        let key = pair_key(a, b);
        self.decisions
            .iter()
            .find(|d| &d.scope == scope && d.pair_key() == key)
    }

    /// Validate and record a decision, or update the existing one for the
    /// same pair (last write wins).
    ///
    /// `items` must contain both compared items.
    pub fn record(
        &mut self,
        items: &[Item],
        new: NewDecision,
        at: DateTime<Utc>,
    ) -> Result<RecordOutcome, DecisionError> {
        validate(items, &new)?;

        let key = pair_key(new.item_a, new.item_b);
        if let Some(existing) = self
            .decisions
            .iter_mut()
            .find(|d| d.scope == new.scope && d.pair_key() == key)
        {
            existing.winner = new.winner;
            existing.rationale = new.rationale;
            if new.prompt.is_some() {
                existing.prompt = new.prompt;
            }
            existing.is_modified = true;
            existing.modified_at = Some(at);
            debug!(decision = existing.id, winner = existing.winner, "updated decision");
            return Ok(RecordOutcome::Updated(existing.id));
        }

        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.decisions.push(Decision {
            id,
            item_a: new.item_a,
            item_b: new.item_b,
            winner: new.winner,
            rationale: new.rationale,
            prompt: new.prompt,
            scope: new.scope,
            decided_at: at,
            is_modified: false,
            modified_at: None,
        });
        debug!(decision = id, "recorded decision");
        Ok(RecordOutcome::Created(id))
    }

    /// Drop every decision that involves `item`. Returns how many were removed.
    ///
    /// Host-side cleanup when an item is deleted; ranking never calls this.
    pub fn remove_item(&mut self, item: ItemId) -> usize {
        let before = self.decisions.len();
        self.decisions.retain(|d| !d.involves(item));
        before - self.decisions.len()
    }

    pub fn into_decisions(self) -> Vec<Decision> {
        self.decisions
    }
}

fn validate(items: &[Item], new: &NewDecision) -> Result<(), DecisionError> {
    if new.item_a == new.item_b {
        return Err(DecisionError::SelfComparison { item: new.item_a });
    }
    if new.winner != new.item_a && new.winner != new.item_b {
        return Err(DecisionError::WinnerNotInPair {
            winner: new.winner,
            item_a: new.item_a,
            item_b: new.item_b,
        });
    }
    for id in [new.item_a, new.item_b] {
        let item = items
            .iter()
            .find(|i| i.id == id)
            .ok_or(DecisionError::UnknownItem { item: id })?;
        if item.scope != new.scope {
            return Err(DecisionError::ScopeMismatch {
                item: id,
                item_scope: item.scope.clone(),
                decision_scope: new.scope.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 8, 30, 0).unwrap()
    }

    fn items_in(scope: Scope) -> Vec<Item> {
        (1..=3)
            .map(|id| {
                Item::new(id, format!("item {id}"), Category::Reliability, scope.clone(), t0())
            })
            .collect()
    }

    #[test]
    fn test_record_creates_decision() {
        let items = items_in(Scope::Global);
        let mut log = DecisionLog::new();
        let outcome = log
            .record(
                &items,
                NewDecision::new(Scope::Global, 1, 2, 2).with_rationale("more users"),
                t0(),
            )
            .unwrap();

        assert_eq!(outcome, RecordOutcome::Created(1));
        let d = &log.decisions()[0];
        assert_eq!((d.item_a, d.item_b, d.winner), (1, 2, 2));
        assert_eq!(d.rationale.as_deref(), Some("more users"));
        assert!(!d.is_modified);
        assert_eq!(d.modified_at, None);
    }

    #[test]
    fn test_reversed_pair_updates_in_place() {
        let items = items_in(Scope::Global);
        let mut log = DecisionLog::new();
        log.record(&items, NewDecision::new(Scope::Global, 1, 2, 1), t0()).unwrap();

        let later = t0() + Duration::hours(2);
        let outcome = log
            .record(&items, NewDecision::new(Scope::Global, 2, 1, 2), later)
            .unwrap();

        assert_eq!(outcome, RecordOutcome::Updated(1));
        assert_eq!(log.len(), 1);
        let d = log.find(&Scope::Global, 1, 2).unwrap();
        assert_eq!(d.winner, 2);
        assert_eq!((d.item_a, d.item_b), (1, 2));
        assert!(d.is_modified);
        assert_eq!(d.modified_at, Some(later));
        assert_eq!(d.decided_at, t0());
    }

    #[test]
    fn test_same_pair_in_different_scopes_is_separate() {
        let global = items_in(Scope::Global);
        let session = Scope::Session("s1".into());
        let session_items: Vec<Item> = items_in(session.clone())
            .into_iter()
            .map(|mut i| {
                i.id += 10;
                i
            })
            .collect();

        let mut log = DecisionLog::new();
        log.record(&global, NewDecision::new(Scope::Global, 1, 2, 1), t0()).unwrap();
        let outcome = log
            .record(&session_items, NewDecision::new(session.clone(), 11, 12, 12), t0())
            .unwrap();

        assert_eq!(outcome, RecordOutcome::Created(2));
        assert_eq!(log.in_scope(&Scope::Global).count(), 1);
        assert_eq!(log.in_scope(&session).count(), 1);
    }

    #[test]
    fn test_rejects_contract_violations() {
        let items = items_in(Scope::Global);
        let mut log = DecisionLog::new();

        assert_eq!(
            log.record(&items, NewDecision::new(Scope::Global, 1, 1, 1), t0()),
            Err(DecisionError::SelfComparison { item: 1 })
        );
        assert_eq!(
            log.record(&items, NewDecision::new(Scope::Global, 1, 2, 3), t0()),
            Err(DecisionError::WinnerNotInPair { winner: 3, item_a: 1, item_b: 2 })
        );
        assert_eq!(
            log.record(&items, NewDecision::new(Scope::Global, 1, 9, 1), t0()),
            Err(DecisionError::UnknownItem { item: 9 })
        );
        assert!(matches!(
            log.record(&items, NewDecision::new(Scope::Session("s".into()), 1, 2, 1), t0()),
            Err(DecisionError::ScopeMismatch { item: 1, .. })
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn test_from_decisions_continues_ids() {
        let items = items_in(Scope::Global);
        let mut seed = DecisionLog::new();
        seed.record(&items, NewDecision::new(Scope::Global, 1, 2, 1), t0()).unwrap();
        seed.record(&items, NewDecision::new(Scope::Global, 2, 3, 3), t0()).unwrap();

        let mut log = DecisionLog::from_decisions(seed.into_decisions());
        let outcome = log
            .record(&items, NewDecision::new(Scope::Global, 1, 3, 1), t0())
            .unwrap();
        assert_eq!(outcome.id(), 3);
    }

    #[test]
    fn test_remove_item_drops_its_decisions() {
        let items = items_in(Scope::Global);
        let mut log = DecisionLog::new();
        log.record(&items, NewDecision::new(Scope::Global, 1, 2, 1), t0()).unwrap();
        log.record(&items, NewDecision::new(Scope::Global, 2, 3, 3), t0()).unwrap();
        log.record(&items, NewDecision::new(Scope::Global, 1, 3, 1), t0()).unwrap();

        assert_eq!(log.remove_item(2), 2);
        assert_eq!(log.len(), 1);
        assert!(log.find(&Scope::Global, 1, 3).is_some());
    }

    #[test]
    fn test_find_outlives_a_temporary_scope() {
        let session = Scope::Session("retro".into());
        let items = items_in(session.clone());
        let mut log = DecisionLog::new();
        log.record(&items, NewDecision::new(session, 3, 1, 1), t0()).unwrap();

        // the returned decision borrows the log, not the scope argument
        let found = {
            let lookup = Scope::Session("retro".into());
            log.find(&lookup, 1, 3)
        };
        assert_eq!(found.map(|d| d.winner), Some(1));
        assert!(log.find(&Scope::Global, 1, 3).is_none());
        assert_eq!(log.in_scope(&Scope::Session("retro".into())).count(), 1);
    }
}
