use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};
use wheelhouse_execution::catalog;
use wheelhouse_simulator::{
    load_table_config, parse_bet_value, parse_spins, run_batch, Progression,
    ProgressionStrategy, RunRequest,
};
use wheelhouse_types::{
    roulette::{DEFAULT_FAULT_TOLERANCE, DEFAULT_MAX_ROUNDS},
    BetKind, BetValue, SessionLimits, TableConfig, WheelType,
};

fn init_tracing(level: &str) -> Result<()> {
    let level = Level::from_str(level).with_context(|| format!("invalid log level: {level}"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a batch of sessions and print the result as JSON.
    Run(RunArgs),
    /// Print the bet catalog for a wheel.
    Catalog(CatalogArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// YAML table config (defaults when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Staking progression.
    #[arg(long, value_enum, default_value_t = Progression::Flat)]
    strategy: Progression,

    /// Bet kind to stake (e.g. red, dozen, number, split).
    #[arg(long, default_value = "red")]
    bet: BetKind,

    /// Value for bets that take one: `7`, `00`, `1-2`.
    #[arg(long, value_parser = parse_bet_value)]
    value: Option<BetValue>,

    /// Base stake.
    #[arg(long, default_value_t = 5.0)]
    unit: f64,

    #[arg(long, default_value_t = 100.0)]
    bankroll: f64,

    /// Safety bound on rounds per session.
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: u64,

    #[arg(long, default_value_t = 1)]
    sessions: usize,

    /// Base seed (drawn from entropy when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 uses logical cores).
    #[arg(long, default_value_t = 0)]
    parallelism: usize,

    /// End a session once this much has been lost.
    #[arg(long)]
    stop_loss: Option<f64>,

    /// End a session once this much has been won.
    #[arg(long)]
    take_profit: Option<f64>,

    /// Consecutive contract-violating rounds tolerated per session.
    #[arg(long, default_value_t = DEFAULT_FAULT_TOLERANCE)]
    fault_tolerance: u32,

    /// Wall-clock budget for the whole batch in milliseconds.
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Replay these spins (comma separated, `00` allowed) instead of drawing them.
    #[arg(long)]
    spins: Option<String>,

    /// Include spin histories in the output.
    #[arg(long, default_value_t = false)]
    history: bool,

    /// Write the result here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    #[arg(long, default_value = "single-zero")]
    wheel: WheelType,

    /// Print JSON instead of CSV.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn build_request(args: &RunArgs) -> Result<RunRequest> {
    let config = match &args.config {
        Some(path) => load_table_config(path)?,
        None => TableConfig::default(),
    };
    let spins = args
        .spins
        .as_deref()
        .map(|raw| parse_spins(raw, config.wheel_type))
        .transpose()?;
    let request = RunRequest {
        max_rounds: args.max_rounds,
        session_count: args.sessions,
        seed: args.seed,
        limits: SessionLimits {
            stop_loss: args.stop_loss,
            take_profit: args.take_profit,
        },
        fault_tolerance: args.fault_tolerance,
        parallelism: args.parallelism,
        time_budget_ms: args.time_budget_ms,
        record_history: args.history,
        spins,
        ..RunRequest::new(config, args.bankroll)
    };
    request.validate().context("invalid run request")?;
    Ok(request)
}

fn run(args: &RunArgs) -> Result<()> {
    let request = build_request(args)?;
    let strategy = ProgressionStrategy::new(
        args.strategy,
        args.bet,
        args.value,
        args.unit,
        request.config.wheel_type,
    )
    .context("invalid strategy bet")?;

    let result = run_batch(&strategy, &request)?;
    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote result");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_catalog(args: &CatalogArgs) -> Result<()> {
    let entries = catalog(args.wheel);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    println!("kind,payout,coverage,house_edge");
    for entry in entries {
        println!(
            "{},{}:1,{},{:.4}%",
            entry.kind,
            entry.payout_ratio,
            entry.coverage,
            entry.house_edge * 100.0
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match &cli.command {
        Command::Run(args) => run(args),
        Command::Catalog(args) => print_catalog(args),
    }
}
