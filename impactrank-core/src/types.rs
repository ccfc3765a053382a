use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::constants::{
    ANALYTICS_WEIGHT, ASSUMPTIONS_WEIGHT, BASELINE_IMPACT_SCORE, DEFAULT_EVIDENCE_WEIGHT,
    SUPPORT_TICKETS_WEIGHT, USER_FEEDBACK_WEIGHT, USER_UPLOAD_WEIGHT,
};
use crate::error::ParseError;

/// Caller-provided item identifier.
pub type ItemId = i64;

/// Caller-provided decision record identifier. Breaks ties between
/// decisions recorded at the same instant.
pub type DecisionId = i64;

/// A pairing: two item IDs to be compared, oldest item first.
pub type Pair = (ItemId, ItemId);

/// Order-independent key for an unordered pair.
pub fn pair_key(a: ItemId, b: ItemId) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Uppercase, with `-` and spaces folded to `_`, so "user feedback",
/// "user-feedback" and "USER_FEEDBACK" all parse the same way.
fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// The closed set of improvement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Category {
    UserExperience,
    Performance,
    Reliability,
    Feature,
    TechnicalDebt,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::UserExperience,
        Category::Performance,
        Category::Reliability,
        Category::Feature,
        Category::TechnicalDebt,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::UserExperience => "USER_EXPERIENCE",
            Category::Performance => "PERFORMANCE",
            Category::Reliability => "RELIABILITY",
            Category::Feature => "FEATURE",
            Category::TechnicalDebt => "TECHNICAL_DEBT",
            Category::Other => "OTHER",
        }
    }

    /// Lowercase label for prompts and tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::UserExperience => "user experience",
            Category::Performance => "performance",
            Category::Reliability => "reliability",
            Category::Feature => "feature",
            Category::TechnicalDebt => "technical debt",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = normalize_tag(s);
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == tag || (tag == "UX" && *c == Category::UserExperience))
            .ok_or_else(|| ParseError::Category(s.to_string()))
    }
}

/// Where a piece of evidence came from. Determines its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EvidenceSource {
    Analytics,
    SupportTickets,
    UserFeedback,
    Assumptions,
    UserUpload,
}

impl EvidenceSource {
    pub const ALL: [EvidenceSource; 5] = [
        EvidenceSource::Analytics,
        EvidenceSource::SupportTickets,
        EvidenceSource::UserFeedback,
        EvidenceSource::Assumptions,
        EvidenceSource::UserUpload,
    ];

    /// Weight from the fixed per-source table.
    pub fn default_weight(self) -> f64 {
        match self {
            EvidenceSource::Analytics => ANALYTICS_WEIGHT,
            EvidenceSource::UserUpload => USER_UPLOAD_WEIGHT,
            EvidenceSource::SupportTickets => SUPPORT_TICKETS_WEIGHT,
            EvidenceSource::UserFeedback => USER_FEEDBACK_WEIGHT,
            EvidenceSource::Assumptions => ASSUMPTIONS_WEIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceSource::Analytics => "ANALYTICS",
            EvidenceSource::SupportTickets => "SUPPORT_TICKETS",
            EvidenceSource::UserFeedback => "USER_FEEDBACK",
            EvidenceSource::Assumptions => "ASSUMPTIONS",
            EvidenceSource::UserUpload => "USER_UPLOAD",
        }
    }
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = normalize_tag(s);
        EvidenceSource::ALL
            .into_iter()
            .find(|src| src.as_str() == tag)
            .ok_or_else(|| ParseError::EvidenceSource(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EffortLevel {
    Small,
    Medium,
    Large,
}

impl EffortLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EffortLevel::Small => "SMALL",
            EffortLevel::Medium => "MEDIUM",
            EffortLevel::Large => "LARGE",
        }
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffortLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "SMALL" | "S" => Ok(EffortLevel::Small),
            "MEDIUM" | "M" => Ok(EffortLevel::Medium),
            "LARGE" | "L" => Ok(EffortLevel::Large),
            _ => Err(ParseError::EffortLevel(s.to_string())),
        }
    }
}

/// The unit within which ranking and pairing are computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scope {
    /// Every item owned by the user that is not in a session.
    #[default]
    Global,
    Session(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Session(id) => write!(f, "session:{id}"),
        }
    }
}

impl FromStr for Scope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("global") {
            return Ok(Scope::Global);
        }
        match trimmed.strip_prefix("session:") {
            Some(id) if !id.trim().is_empty() => Ok(Scope::Session(id.trim().to_string())),
            _ => Err(ParseError::Scope(s.to_string())),
        }
    }
}

/// One piece of supporting information for an item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evidence {
    pub content: String,
    /// `None` when the source was missing or unrecognised upstream.
    pub source: Option<EvidenceSource>,
    /// Default-table weight recorded at creation. Confidence is always
    /// computed from the active [`crate::EvidenceWeights`], never from this.
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        content: impl Into<String>,
        source: Option<EvidenceSource>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let weight = source
            .map(EvidenceSource::default_weight)
            .unwrap_or(DEFAULT_EVIDENCE_WEIGHT);
        Evidence {
            content: content.into(),
            source,
            weight,
            created_at,
        }
    }
}

#[cfg(feature = "serde")]
fn baseline_score() -> f64 {
    BASELINE_IMPACT_SCORE
}

/// An improvement being ranked.
///
/// `rank_position`, `impact_score` and `rank_confidence` are outputs: only
/// [`crate::apply_rankings`] writes them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub category: Category,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effort: Option<EffortLevel>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Scope,
    pub created_at: DateTime<Utc>,
    /// Ordered by creation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub evidence: Vec<Evidence>,
    /// 1-based, unique within the scope. `None` until computed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank_position: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default = "baseline_score"))]
    pub impact_score: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank_confidence: f64,
}

impl Item {
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        category: Category,
        scope: Scope,
        created_at: DateTime<Utc>,
    ) -> Self {
        Item {
            id,
            title: title.into(),
            category,
            effort: None,
            scope,
            created_at,
            evidence: Vec::new(),
            rank_position: None,
            impact_score: BASELINE_IMPACT_SCORE,
            rank_confidence: 0.0,
        }
    }

    pub fn with_effort(mut self, effort: EffortLevel) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// Reset the ranking outputs to `baseline`, e.g. when the item leaves
    /// its scope.
    pub fn clear_ranking(&mut self, baseline: f64) {
        self.rank_position = None;
        self.impact_score = baseline;
        self.rank_confidence = 0.0;
    }
}

/// A recorded "which matters more?" answer between two items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub id: DecisionId,
    pub item_a: ItemId,
    pub item_b: ItemId,
    /// Must equal `item_a` or `item_b`.
    pub winner: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rationale: Option<String>,
    /// The comparison question shown when the decision was made, kept for audit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prompt: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Scope,
    pub decided_at: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_modified: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Decision {
    pub fn involves(&self, item: ItemId) -> bool {
        self.item_a == item || self.item_b == item
    }

    pub fn pair_key(&self) -> Pair {
        pair_key(self.item_a, self.item_b)
    }

    /// The losing item, or `None` when `winner` is not one of the pair.
    pub fn loser(&self) -> Option<ItemId> {
        if self.winner == self.item_a {
            Some(self.item_b)
        } else if self.winner == self.item_b {
            Some(self.item_a)
        } else {
            None
        }
    }
}

/// Ranking output for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedItem {
    pub id: ItemId,
    /// 1-based.
    pub rank_position: usize,
    pub impact_score: f64,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

/// Maps between caller-provided item IDs and internal 0..N indices.
pub(crate) struct IdMap {
    ids: Vec<ItemId>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl IdMap {
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let ids: Vec<ItemId> = ids.into_iter().collect();
        let mut id_to_idx = HashMap::with_capacity(ids.len());
        for (idx, &id) in ids.iter().enumerate() {
            let prev = id_to_idx.insert(id, idx);
            assert!(prev.is_none(), "Duplicate item ID: {}", id);
        }
        IdMap { ids, id_to_idx }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn to_idx(&self, id: ItemId) -> Option<usize> {
        self.id_to_idx.get(&id).copied()
    }

    pub fn to_id(&self, idx: usize) -> ItemId {
        self.ids[idx]
    }
}
