/// JSON-file persistence for items and decisions.
///
/// Stands in for the service database: loads everything, lets the caller
/// mutate it, and writes it back atomically (temp file + rename).
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use impactrank_core::{
    apply_rankings, Category, Decision, DecisionLog, EffortLevel, Evidence, EvidenceSource, Item,
    ItemId, NewDecision, RankedItem, RankingConfig, RecordOutcome, Scope, ScopeSnapshot,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
}

impl Store {
    /// Load from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Store> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse store at {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Store::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read store at {}", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize store")?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!(
            path = %path.display(),
            items = self.items.len(),
            decisions = self.decisions.len(),
            "saved store"
        );
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Result<&Item> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow!("No item with id {id}"))
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow!("No item with id {id}"))
    }

    pub fn add_item(
        &mut self,
        title: &str,
        category: Category,
        effort: Option<EffortLevel>,
        scope: Scope,
        now: DateTime<Utc>,
    ) -> ItemId {
        let id = self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let mut item = Item::new(id, title, category, scope, now);
        item.effort = effort;
        info!(item = id, scope = %item.scope, "created item");
        self.items.push(item);
        id
    }

    pub fn add_evidence(
        &mut self,
        id: ItemId,
        content: &str,
        source: Option<EvidenceSource>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let item = self.item_mut(id)?;
        item.evidence.push(Evidence::new(content, source, now));
        info!(item = id, source = ?source, "attached evidence");
        Ok(())
    }

    pub fn snapshot(&self, scope: &Scope) -> ScopeSnapshot {
        ScopeSnapshot::collect(scope, &self.items, &self.decisions)
    }

    pub fn record_decision(
        &mut self,
        new: NewDecision,
        now: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let mut log = DecisionLog::from_decisions(std::mem::take(&mut self.decisions));
        let outcome = log.record(&self.items, new, now);
        self.decisions = log.into_decisions();
        Ok(outcome?)
    }

    /// Recompute the ranking of `scope` and write it onto its items.
    pub fn rerank(&mut self, scope: &Scope, config: &RankingConfig) -> Vec<RankedItem> {
        let rankings = self.snapshot(scope).rank(config);

        let (mut scoped, rest): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|i| &i.scope == scope);
        apply_rankings(&mut scoped, &rankings, config);

        self.items = rest;
        self.items.extend(scoped);
        self.items.sort_by_key(|i| i.id);
        rankings
    }

    /// Delete an item and every decision involving it. Returns its scope.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Scope> {
        let scope = self.item(id)?.scope.clone();
        self.items.retain(|i| i.id != id);

        let mut log = DecisionLog::from_decisions(std::mem::take(&mut self.decisions));
        let dropped = log.remove_item(id);
        self.decisions = log.into_decisions();

        info!(item = id, dropped_decisions = dropped, "removed item");
        Ok(scope)
    }
}
