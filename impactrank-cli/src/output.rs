/// Output formatting: terminal table and JSON.
use anyhow::Result;
use impactrank_core::{
    level, ConfidenceLevel, Evidence, EvidenceSource, EvidenceWeights, Item, Progress, RankedItem,
    RankingConfig, Scope,
};
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: i64,
    title: &'a str,
    impact_score: f64,
    confidence: f64,
    level: ConfidenceLevel,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    scope: String,
    items: Vec<JsonRankedItem<'a>>,
    progress: Progress,
}

fn title_of(items: &[Item], id: i64) -> &str {
    items
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.title.as_str())
        .unwrap_or("?")
}

/// Print results as a formatted terminal table.
pub fn print_table(
    rankings: &[RankedItem],
    items: &[Item],
    scope: &Scope,
    progress: &Progress,
    config: &RankingConfig,
) {
    if rankings.is_empty() {
        println!("Nothing to rank in {scope}: add an item first.");
        return;
    }

    // Find the widest title for padding
    let name_width = rankings
        .iter()
        .map(|r| title_of(items, r.id).len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!(" # | {:<name_width$} |   ID |  Impact | Confidence", "Item");
    println!("---|-{}-|------|---------|-----------", "-".repeat(name_width));

    for r in rankings {
        println!(
            "{:>2} | {:<name_width$} | {:>4} | {:>7.1} | {:>4.2} {:<6}",
            r.rank_position,
            title_of(items, r.id),
            r.id,
            r.impact_score,
            r.confidence,
            level(r.confidence, &config.levels),
        );
    }

    println!(
        "\n{} items in {} ranked from {} comparisons ({:.0}% of the ~{} needed, {} pairs left)",
        rankings.len(),
        scope,
        progress.completed,
        progress.percent(),
        progress.target,
        progress.remaining_pairs(),
    );
}

/// Print results as JSON.
pub fn print_json(
    rankings: &[RankedItem],
    items: &[Item],
    scope: &Scope,
    progress: &Progress,
    config: &RankingConfig,
) -> Result<()> {
    let output = JsonOutput {
        scope: scope.to_string(),
        items: rankings
            .iter()
            .map(|r| JsonRankedItem {
                rank: r.rank_position,
                id: r.id,
                title: title_of(items, r.id),
                impact_score: r.impact_score,
                confidence: r.confidence,
                level: level(r.confidence, &config.levels),
            })
            .collect(),
        progress: *progress,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One evidence row, showing the weight the confidence model actually uses.
fn evidence_line(evidence: &Evidence, weights: &EvidenceWeights) -> String {
    let source = evidence.source.map(|s| s.as_str()).unwrap_or("UNKNOWN");
    format!(
        "  [{source:<15}] {:.1}  {}",
        weights.weight_for(evidence.source),
        evidence.content
    )
}

/// Print the evidence summary for one item.
pub fn print_evidence(
    item: &Item,
    confidence: f64,
    gaps: &[EvidenceSource],
    config: &RankingConfig,
) {
    println!(
        "{} (#{}): evidence confidence {:.2} ({})",
        item.title,
        item.id,
        confidence,
        level(confidence, &config.levels),
    );
    for e in &item.evidence {
        println!("{}", evidence_line(e, &config.evidence_weights));
    }
    if gaps.is_empty() {
        println!("No evidence gaps.");
    } else {
        let names: Vec<&str> = gaps.iter().map(|g| g.as_str()).collect();
        println!("Missing: {}", names.join(", "));
    }
}
