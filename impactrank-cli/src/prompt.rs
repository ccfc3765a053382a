/// Prompt building for pairwise comparisons.
///
/// Pure: the same two items always produce the same question, so a prompt
/// stored on a decision for audit never drifts from what was shown.
use impactrank_core::{
    evidence_confidence, level, Category, ConfidenceLevel, EffortLevel, Item, RankingConfig,
};

/// The parts of an item a comparison question talks about.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptItem<'a> {
    pub title: &'a str,
    pub category: Category,
    pub effort: Option<EffortLevel>,
    pub evidence_level: ConfidenceLevel,
}

impl<'a> PromptItem<'a> {
    pub fn from_item(item: &'a Item, config: &RankingConfig) -> Self {
        let confidence = evidence_confidence(&item.evidence, &config.evidence_weights);
        PromptItem {
            title: &item.title,
            category: item.category,
            effort: item.effort,
            evidence_level: level(confidence, &config.levels),
        }
    }

    fn describe(&self) -> String {
        let effort = match self.effort {
            Some(EffortLevel::Small) => "small effort",
            Some(EffortLevel::Medium) => "medium effort",
            Some(EffortLevel::Large) => "large effort",
            None => "effort unestimated",
        };
        format!(
            "\"{}\" ({}, {}, {} evidence)",
            self.title,
            self.category.label(),
            effort,
            self.evidence_level,
        )
    }
}

/// Build the "which matters more?" question for two items.
pub fn build_prompt(a: &PromptItem<'_>, b: &PromptItem<'_>) -> String {
    let mut prompt = format!(
        "Option 1: {}\n\
         Option 2: {}\n\n\
         Which improvement matters more?",
        a.describe(),
        b.describe(),
    );

    // Effort only sways the question when both sides have an estimate.
    if let (Some(ea), Some(eb)) = (a.effort, b.effort) {
        if ea != eb {
            prompt.push_str(" Consider whether the difference in effort is worth it.");
        }
    }
    if a.evidence_level == ConfidenceLevel::Low && b.evidence_level == ConfidenceLevel::Low {
        prompt.push_str(" Neither option has strong evidence yet, so go with your best judgement.");
    }
    prompt
}
