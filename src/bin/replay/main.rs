// Meme Arena Replay Runner: scripted strategies vs. the scenario catalog
// Monte Carlo over seeded ChaCha8 noise, fixed frame cadence, JSON report
//
// Usage:
//   cargo run --release --bin replay                      # All scenarios (30 runs each)
//   cargo run --release --bin replay -- --runs 5          # Quick mode
//   cargo run --release --bin replay -- frog              # Filter by id or name
//   cargo run --release --bin replay -- --seed 42         # Custom base seed
//   cargo run --release --bin replay -- --frame-ms 33     # 30 fps driver
//   cargo run --release --bin replay -- --config game.json

mod monte_carlo;
mod report;
mod strategy;

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info};

use meme_arena::catalog::SCENARIOS;
use meme_arena::{GameConfig, Scenario};
use report::ReplayReport;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

const DEFAULT_RUNS: usize = 30;
const DEFAULT_FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug)]
struct CliArgs {
    runs: usize,
    seed: u64,
    frame_ms: f64,
    config: Option<String>,
    filter: Option<String>,
}

fn flag_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse().map_err(|_| format!("{flag}: cannot parse {raw:?}"))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        runs: DEFAULT_RUNS,
        seed: 0,
        frame_ms: DEFAULT_FRAME_MS,
        config: None,
        filter: None,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => {
                cli.runs = flag_value("--runs", args.next())?;
                if cli.runs == 0 {
                    return Err("--runs must be at least 1".to_string());
                }
            }
            "--seed" => cli.seed = flag_value("--seed", args.next())?,
            "--frame-ms" => {
                cli.frame_ms = flag_value("--frame-ms", args.next())?;
                if !(cli.frame_ms.is_finite() && cli.frame_ms > 0.0) {
                    return Err(format!("--frame-ms must be a positive number, got {}", cli.frame_ms));
                }
            }
            "--config" => cli.config = Some(flag_value("--config", args.next())?),
            other if !other.starts_with('-') => cli.filter = Some(other.to_string()),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(cli)
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meme_arena=info,replay=info"));

    if std::env::var("MEME_ARENA_LOG_JSON").is_ok() {
        fmt().json().with_env_filter(env_filter).with_target(true).init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_logging();
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            error!(error = %e, "bad arguments");
            std::process::exit(2);
        }
    };

    let config = match &cli.config {
        Some(path) => match GameConfig::from_json_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(path = %path, error = %e, "could not load config");
                std::process::exit(2);
            }
        },
        None => GameConfig::default(),
    };

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            SCENARIOS.iter()
                .filter(|s| s.id == f_lower || s.name.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => SCENARIOS.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    info!(runs = cli.runs, seed = cli.seed, frame_ms = cli.frame_ms, scenarios = to_run.len(), "replay starting");

    println!("\n  {:<32} {:<26} {:>6} {:>7} {:>16} {:>10}",
        "Scenario", "Strategy", "Win%", "Forced%", "Profit% (±CI)", "Balance");
    println!("  {}", "-".repeat(102));

    let mut reports = Vec::new();
    for scenario in &to_run {
        for strategy in strategy::lineup(&scenario.params) {
            let report = match monte_carlo::run_monte_carlo(
                &config, scenario, strategy, cli.runs, cli.seed, cli.frame_ms,
            ) {
                Ok(r) => r,
                Err(e) => {
                    error!(scenario = scenario.id, strategy = %strategy.name(), error = %e, "run aborted");
                    continue;
                }
            };

            let ci = (report.profit_percent.ci_upper - report.profit_percent.ci_lower) / 2.0;
            println!("  {:<32} {:<26} {:>5.0}% {:>6.0}% {:>8.1}±{:<7.1} {:>10.2}",
                report.scenario_name,
                report.strategy,
                report.win_rate * 100.0,
                report.forced_rate * 100.0,
                report.profit_percent.mean, ci,
                report.balance_after.mean,
            );
            reports.push(report);
        }
    }

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis();
    let timestamp = format!("{}", ts);

    let report = ReplayReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        frame_ms: cli.frame_ms,
        n_runs: cli.runs,
        base_seed: cli.seed,
        reports,
    };

    let dir = std::path::Path::new("replay-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create replay-results/");
    }
    let path = dir.join(format!("replay-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write replay file");
    println!("\n  Results saved to: {}\n", path.display());
}
