/// Simulate command: measures how quickly the pair selector converges.
///
/// Generates items with hidden "true" importance, then lets a simulated user
/// answer every proposed pair (picking the truly more important item, except
/// with probability `noise`) until the selector reports done. Agreement with
/// the hidden order is measured with Kendall's tau at the point where the
/// n·log2(n) progress estimate reaches 100% and again at exhaustion.
use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use impactrank_core::{
    rank, select_next, Category, DecisionLog, Item, NewDecision, RankedItem, RankingConfig, Scope,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub items: usize,
    pub noise: f64,
    pub seed: u64,
    /// Comparisons asked before the selector reported done.
    pub comparisons: usize,
    /// Comparisons asked when the progress estimate first reached 100%.
    pub estimate_reached_at: Option<usize>,
    pub tau_at_estimate: Option<f64>,
    pub tau_at_end: f64,
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Kendall's tau between the computed ranking and the hidden strengths.
/// 1.0 means identical order, -1.0 fully reversed.
pub fn kendall_tau(rankings: &[RankedItem], strengths: &[f64]) -> f64 {
    // item ids are 1-based indices into `strengths`
    let position = |id: i64| {
        rankings
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.rank_position)
            .unwrap_or(usize::MAX)
    };

    let n = strengths.len();
    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for i in 0..n {
        for j in i + 1..n {
            let truth = strengths[i].total_cmp(&strengths[j]);
            // lower position = more important
            let ranked = position(j as i64 + 1).cmp(&position(i as i64 + 1));
            if truth == ranked {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let total = concordant + discordant;
    if total == 0 {
        return 1.0;
    }
    (concordant - discordant) as f64 / total as f64
}

pub fn run_simulation(
    num_items: usize,
    noise: f64,
    seed: u64,
    config: &RankingConfig,
) -> Result<SimulationReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = epoch();

    let strengths: Vec<f64> = (0..num_items).map(|_| rng.random::<f64>()).collect();
    let items: Vec<Item> = (0..num_items)
        .map(|i| {
            let id = i as i64 + 1;
            Item::new(
                id,
                format!("simulated {id}"),
                Category::ALL[i % Category::ALL.len()],
                Scope::Global,
                start + Duration::seconds(id),
            )
        })
        .collect();

    let mut log = DecisionLog::new();
    let mut estimate_reached_at = None;
    let mut tau_at_estimate = None;
    let mut comparisons = 0usize;

    loop {
        let selection = select_next(&items, log.decisions(), config);

        if estimate_reached_at.is_none() && selection.progress.fraction >= 1.0 {
            let rankings = rank(&items, log.decisions(), config);
            estimate_reached_at = Some(comparisons);
            tau_at_estimate = Some(kendall_tau(&rankings, &strengths));
        }

        let Some((a, b)) = selection.pair else { break };

        let a_stronger = strengths[(a - 1) as usize] >= strengths[(b - 1) as usize];
        let flipped = rng.random::<f64>() < noise;
        let winner = if a_stronger != flipped { a } else { b };

        comparisons += 1;
        log.record(
            &items,
            NewDecision::new(Scope::Global, a, b, winner),
            start + Duration::minutes(comparisons as i64),
        )?;
        debug!(comparisons, a, b, winner, "simulated decision");
    }

    let rankings = rank(&items, log.decisions(), config);
    Ok(SimulationReport {
        items: num_items,
        noise,
        seed,
        comparisons,
        estimate_reached_at,
        tau_at_estimate,
        tau_at_end: kendall_tau(&rankings, &strengths),
    })
}

pub fn print_report(report: &SimulationReport) {
    println!(
        "Simulated {} items (noise {:.0}%, seed {})",
        report.items,
        report.noise * 100.0,
        report.seed,
    );
    println!("Comparisons until done:     {}", report.comparisons);
    match (report.estimate_reached_at, report.tau_at_estimate) {
        (Some(at), Some(tau)) => {
            println!("Progress estimate reached:  {at} comparisons (Kendall tau {tau:.3})");
        }
        _ => println!("Progress estimate reached:  never"),
    }
    println!("Kendall tau at exhaustion:  {:.3}", report.tau_at_end);
}
