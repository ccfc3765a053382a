mod config;
mod output;
mod prompt;
mod simulate;
mod store;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use impactrank_core::{
    evidence_confidence, identify_gaps, Category, EffortLevel, EvidenceSource, ItemId,
    NewDecision, RankingConfig, RecordOutcome, Scope,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::prompt::{build_prompt, PromptItem};
use crate::store::Store;

#[derive(Parser)]
#[command(name = "impactrank", version, about = "Prioritize improvements by pairwise decisions")]
struct Cli {
    /// Path to config file (default: ~/.config/impactrank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON store (default: from config, else ~/.config/impactrank/store.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/impactrank/config.toml
    Init,
    /// Capture a new improvement
    Add(AddArgs),
    /// Attach a piece of evidence to an improvement
    Evidence(EvidenceArgs),
    /// Show evidence confidence and missing evidence for an improvement
    Gaps {
        #[arg(long)]
        item: ItemId,
    },
    /// Record which of two improvements matters more, then re-rank
    Decide(DecideArgs),
    /// Show the current ranking of a scope
    Rank(ScopeArgs),
    /// Show the next pair to compare
    Next(ScopeArgs),
    /// Delete an improvement and its decisions, then re-rank
    Remove {
        #[arg(long)]
        item: ItemId,
    },
    /// Measure comparisons-to-convergence against a simulated user
    Simulate(SimulateArgs),
}

#[derive(clap::Args)]
struct ScopeArgs {
    /// "global" or "session:<id>"
    #[arg(long, default_value = "global")]
    scope: Scope,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct AddArgs {
    #[arg(long)]
    title: String,

    /// One of USER_EXPERIENCE, PERFORMANCE, RELIABILITY, FEATURE, TECHNICAL_DEBT, OTHER
    #[arg(long)]
    category: Category,

    /// SMALL, MEDIUM or LARGE
    #[arg(long)]
    effort: Option<EffortLevel>,

    /// "global" or "session:<id>"
    #[arg(long, default_value = "global")]
    scope: Scope,
}

#[derive(clap::Args)]
struct EvidenceArgs {
    #[arg(long)]
    item: ItemId,

    #[arg(long)]
    content: String,

    /// ANALYTICS, SUPPORT_TICKETS, USER_FEEDBACK, ASSUMPTIONS or USER_UPLOAD.
    /// Omit when unknown (weighted like an assumption).
    #[arg(long)]
    source: Option<EvidenceSource>,
}

#[derive(clap::Args)]
struct DecideArgs {
    #[arg(long)]
    a: ItemId,

    #[arg(long)]
    b: ItemId,

    /// Must be one of --a / --b
    #[arg(long)]
    winner: ItemId,

    #[arg(long)]
    rationale: Option<String>,
}

#[derive(clap::Args)]
struct SimulateArgs {
    #[arg(long, default_value_t = 12)]
    items: usize,

    /// Probability the simulated user picks the less important item
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long)]
    json: bool,
}

/// Resolved paths and engine config for one invocation.
struct Invocation {
    config_path: PathBuf,
    store_path: PathBuf,
    ranking: RankingConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve(cli: &Cli) -> Result<Invocation> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let cfg = config::load_config(&config_path)?;
    let store_path = match cli.store.clone().or_else(|| cfg.store.clone()) {
        Some(path) => path,
        None => config::default_store_path()?,
    };
    Ok(Invocation {
        config_path,
        store_path,
        ranking: cfg.ranking_config(),
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = resolve(&cli)?;

    match cli.command {
        Commands::Init => {
            config::create_default_config(&ctx.config_path)?;
            println!("Created config at {}", ctx.config_path.display());
            println!("Edit it to set your store path, K-factor, etc.");
        }
        Commands::Add(args) => {
            let mut store = Store::load(&ctx.store_path)?;
            let id = store.add_item(
                &args.title,
                args.category,
                args.effort,
                args.scope.clone(),
                Utc::now(),
            );
            store.rerank(&args.scope, &ctx.ranking);
            store.save(&ctx.store_path)?;
            println!("Added #{id}: {} ({})", args.title, args.scope);
        }
        Commands::Evidence(args) => {
            let mut store = Store::load(&ctx.store_path)?;
            store.add_evidence(args.item, &args.content, args.source, Utc::now())?;
            let scope = store.item(args.item)?.scope.clone();
            store.rerank(&scope, &ctx.ranking);
            store.save(&ctx.store_path)?;
            println!("Attached evidence to #{}", args.item);
        }
        Commands::Gaps { item } => {
            let store = Store::load(&ctx.store_path)?;
            let item = store.item(item)?;
            let confidence = evidence_confidence(&item.evidence, &ctx.ranking.evidence_weights);
            output::print_evidence(item, confidence, &identify_gaps(&item.evidence), &ctx.ranking);
        }
        Commands::Decide(args) => run_decide(&ctx, args)?,
        Commands::Rank(args) => {
            let mut store = Store::load(&ctx.store_path)?;
            let rankings = store.rerank(&args.scope, &ctx.ranking);
            store.save(&ctx.store_path)?;

            let snapshot = store.snapshot(&args.scope);
            let progress = snapshot.select_next(&ctx.ranking).progress;
            if args.json {
                output::print_json(
                    &rankings,
                    &snapshot.items,
                    &args.scope,
                    &progress,
                    &ctx.ranking,
                )?;
            } else {
                output::print_table(
                    &rankings,
                    &snapshot.items,
                    &args.scope,
                    &progress,
                    &ctx.ranking,
                );
            }
        }
        Commands::Next(args) => run_next(&ctx, args)?,
        Commands::Remove { item } => {
            let mut store = Store::load(&ctx.store_path)?;
            let scope = store.remove_item(item)?;
            store.rerank(&scope, &ctx.ranking);
            store.save(&ctx.store_path)?;
            println!("Removed #{item} from {scope}");
        }
        Commands::Simulate(args) => {
            if !(0.0..=1.0).contains(&args.noise) {
                bail!("--noise must be between 0.0 and 1.0, got {}", args.noise);
            }
            if args.items < 2 {
                bail!("Need at least 2 items to simulate, got {}", args.items);
            }
            let report = simulate::run_simulation(args.items, args.noise, args.seed, &ctx.ranking)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                simulate::print_report(&report);
            }
        }
    }
    Ok(())
}

fn run_decide(ctx: &Invocation, args: DecideArgs) -> Result<()> {
    let mut store = Store::load(&ctx.store_path)?;
    let item_a = store.item(args.a)?;
    let item_b = store.item(args.b)?;
    let scope = item_a.scope.clone();

    let question = build_prompt(
        &PromptItem::from_item(item_a, &ctx.ranking),
        &PromptItem::from_item(item_b, &ctx.ranking),
    );
    let mut new =
        NewDecision::new(scope.clone(), args.a, args.b, args.winner).with_prompt(question);
    if let Some(rationale) = args.rationale {
        new = new.with_rationale(rationale);
    }

    let outcome = store
        .record_decision(new, Utc::now())
        .with_context(|| format!("Cannot record decision between #{} and #{}", args.a, args.b))?;

    // Every decision triggers a full recompute of the scope.
    store.rerank(&scope, &ctx.ranking);
    store.save(&ctx.store_path)?;

    match outcome {
        RecordOutcome::Created(id) => info!(decision = id, "decision recorded"),
        RecordOutcome::Updated(id) => info!(decision = id, "decision updated"),
    }
    let verb = match outcome {
        RecordOutcome::Created(_) => "Recorded",
        RecordOutcome::Updated(_) => "Updated",
    };
    println!("{verb}: #{} matters more", args.winner);

    let selection = store.snapshot(&scope).select_next(&ctx.ranking);
    match selection.pair {
        Some((a, b)) => println!(
            "Next: #{a} vs #{b} ({:.0}% of estimated comparisons done)",
            selection.progress.percent()
        ),
        None => println!("All pairs in {scope} have been compared."),
    }
    Ok(())
}

fn run_next(ctx: &Invocation, args: ScopeArgs) -> Result<()> {
    let store = Store::load(&ctx.store_path)?;
    let snapshot = store.snapshot(&args.scope);
    let selection = snapshot.select_next(&ctx.ranking);

    let question = match selection.pair {
        Some((a, b)) => {
            let item_a = store.item(a)?;
            let item_b = store.item(b)?;
            Some(build_prompt(
                &PromptItem::from_item(item_a, &ctx.ranking),
                &PromptItem::from_item(item_b, &ctx.ranking),
            ))
        }
        None => None,
    };

    if args.json {
        let body = serde_json::json!({
            "scope": args.scope.to_string(),
            "pair": selection.pair,
            "prompt": question,
            "progress": selection.progress,
            "done": selection.is_done(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match (selection.pair, question) {
        (Some((a, b)), Some(question)) => {
            println!("Compare #{a} vs #{b}:\n\n{question}\n");
            println!(
                "Record with: impactrank decide --a {a} --b {b} --winner <{a}|{b}>"
            );
        }
        _ => println!("Done: every pair in {} has been compared.", args.scope),
    }
    println!(
        "Progress: {} comparisons, {:.0}% of the ~{} estimate ({} pairs left)",
        selection.progress.completed,
        selection.progress.percent(),
        selection.progress.target,
        selection.progress.remaining_pairs(),
    );
    Ok(())
}
