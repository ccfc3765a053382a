use crate::types::{ItemId, Scope};

/// Boundary validation failures when recording a decision.
///
/// The ranking and pairing functions never return these: they assume every
/// decision handed to them already passed through [`crate::DecisionLog`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecisionError {
    #[error("an item cannot be compared against itself (item {item})")]
    SelfComparison { item: ItemId },

    #[error("winner {winner} is neither item {item_a} nor item {item_b}")]
    WinnerNotInPair {
        winner: ItemId,
        item_a: ItemId,
        item_b: ItemId,
    },

    #[error("unknown item {item}")]
    UnknownItem { item: ItemId },

    #[error("item {item} belongs to {item_scope}, not {decision_scope}")]
    ScopeMismatch {
        item: ItemId,
        item_scope: Scope,
        decision_scope: Scope,
    },
}

/// Failure to parse one of the closed tag sets from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown category \"{0}\"")]
    Category(String),

    #[error("unknown evidence source \"{0}\"")]
    EvidenceSource(String),

    #[error("unknown effort level \"{0}\"")]
    EffortLevel(String),

    #[error("invalid scope \"{0}\": expected \"global\" or \"session:<id>\"")]
    Scope(String),
}
