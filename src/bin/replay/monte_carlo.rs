// Monte Carlo Infrastructure: N seeded runs per scenario x strategy
// Each run drives a full session at a fixed frame cadence, like the browser loop

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use meme_arena::{GameConfig, GameError, Scenario, SessionController, TickOutcome};

use crate::report::*;
use crate::strategy::{Action, Strategy};

/// Elapsed-time budget as a multiple of the time the forced end should take.
const STALL_FACTOR: f64 = 2.0;

/// Play one round of `scenario` with `strategy` under `seed`.
pub fn run_single(
    config: &GameConfig,
    scenario: &Scenario,
    strategy: Strategy,
    seed: u64,
    frame_ms: f64,
) -> Result<RunResult, GameError> {
    if !(frame_ms.is_finite() && frame_ms > 0.0) {
        return Err(GameError::InvalidConfig(format!("frame_ms must be positive, got {frame_ms}")));
    }
    let round = &config.round;
    let budget = scenario.max_duration * round.forced_end_distance / round.playable_distance * STALL_FACTOR;

    let mut session = SessionController::new(config.clone(), ChaCha8Rng::seed_from_u64(seed));
    let ticket = session.select_scenario(scenario.id)?;

    let mut frames: u64 = 0;
    let result = loop {
        frames += 1;
        let elapsed = frames as f64 * frame_ms / 1000.0;
        if elapsed > budget {
            return Err(GameError::InvalidConfig(format!(
                "round did not end within {budget:.1}s of simulated time"
            )));
        }
        match session.tick(ticket, elapsed) {
            TickOutcome::Running(snapshot) => match strategy.decide(&snapshot) {
                Action::Buy => session.buy()?,
                Action::Sell => break session.sell()?,
                Action::Wait => {}
            },
            TickOutcome::Ended(result) => break result,
            TickOutcome::Stale => return Err(GameError::NoActiveRound),
        }
    };

    debug!(seed, frames, strategy = %strategy.name(), reason = ?result.reason, "run finished");

    Ok(RunResult {
        seed,
        frames,
        profit_percent: result.profit_percent,
        balance_after: session.balance(),
        entry_distance: result.held_position().then_some(result.entry_distance),
        exit_distance: result.exit_distance,
        peak_distance: result.peak_distance,
        forced: result.forced,
        win: result.reason.is_win(),
        reason: result.narrative(),
    })
}

/// Run Monte Carlo: N runs of one strategy on one scenario, aggregate stats.
pub fn run_monte_carlo(
    config: &GameConfig,
    scenario: &Scenario,
    strategy: Strategy,
    n_runs: usize,
    base_seed: u64,
    frame_ms: f64,
) -> Result<StrategyReport, GameError> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(config, scenario, strategy, seed, frame_ms)?);
    }
    Ok(aggregate(scenario, strategy, results))
}

fn aggregate(scenario: &Scenario, strategy: Strategy, results: Vec<RunResult>) -> StrategyReport {
    let n = results.len().max(1);
    let wins = results.iter().filter(|r| r.win).count();
    let forced = results.iter().filter(|r| r.forced).count();

    let profit_percent = Stats::from_samples(
        &results.iter().map(|r| r.profit_percent).collect::<Vec<_>>()
    );
    let balance_after = Stats::from_samples(
        &results.iter().map(|r| r.balance_after).collect::<Vec<_>>()
    );

    StrategyReport {
        scenario_id: scenario.id.to_string(),
        scenario_name: scenario.name.to_string(),
        category: scenario.category.label().to_string(),
        strategy: strategy.name(),
        n_runs: results.len(),
        win_rate: wins as f64 / n as f64,
        forced_rate: forced as f64 / n as f64,
        profit_percent,
        balance_after,
        individual_runs: results,
    }
}
