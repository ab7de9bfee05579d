// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Round Engine
//
// Idle -> Active (start) -> Ended (sell / forced end). Each start issues a new
// RoundTicket; ticks carrying any other ticket are ignored, so a stale driver
// loop can never move a newer round.

use tracing::{debug, info};

use crate::config::RoundConfig;
use crate::error::GameError;
use crate::pricing::{self, NoiseSource};
use crate::types::*;

// ─── RoundEngine ─────────────────────────────────────────────────────────────

pub struct RoundEngine<N: NoiseSource> {
    config: RoundConfig,
    noise: N,

    phase: RoundPhase,
    scenario: Option<Scenario>,
    generation: u32,
    live_ticket: Option<RoundTicket>,

    distance: f64,
    price: f64,
    open_price: f64,
    holding: bool,
    entry_distance: f64,
    entry_price: f64,

    result: Option<RoundResult>,
}

impl<N: NoiseSource> RoundEngine<N> {
    pub fn new(config: RoundConfig, noise: N) -> Self {
        Self {
            config,
            noise,
            phase: RoundPhase::Idle,
            scenario: None,
            generation: 0,
            live_ticket: None,
            distance: 0.0,
            price: 0.0,
            open_price: 0.0,
            holding: false,
            entry_distance: 0.0,
            entry_price: 0.0,
            result: None,
        }
    }

    pub fn phase(&self) -> RoundPhase { self.phase }
    pub fn scenario(&self) -> Option<&Scenario> { self.scenario.as_ref() }
    pub fn live_ticket(&self) -> Option<RoundTicket> { self.live_ticket }
    pub fn distance(&self) -> f64 { self.distance }
    pub fn price(&self) -> f64 { self.price }
    pub fn open_price(&self) -> f64 { self.open_price }
    pub fn is_holding(&self) -> bool { self.holding }
    pub fn entry(&self) -> (f64, f64) { (self.entry_distance, self.entry_price) }
    pub fn result(&self) -> Option<&RoundResult> { self.result.as_ref() }

    /// Begin a new round. Any in-flight tick sequence is cancelled first.
    pub fn start(&mut self, scenario: &Scenario) -> RoundTicket {
        self.cancel();

        self.generation = self.generation.wrapping_add(1);
        let ticket = RoundTicket(self.generation);

        let open = pricing::noiseless_price(0.0, &scenario.params);
        self.scenario = Some(scenario.clone());
        self.phase = RoundPhase::Active;
        self.live_ticket = Some(ticket);
        self.distance = 0.0;
        self.price = open;
        self.open_price = open;
        self.holding = false;
        self.entry_distance = 0.0;
        self.entry_price = 0.0;
        self.result = None;

        debug!(ticket = ticket.0, scenario = scenario.id, open_price = open, "round started");
        ticket
    }

    /// Revoke the live ticket and drop back to Idle without settling.
    /// Returns false when nothing was running.
    pub fn cancel(&mut self) -> bool {
        match self.live_ticket.take() {
            Some(ticket) => {
                self.phase = RoundPhase::Idle;
                debug!(ticket = ticket.0, distance = self.distance, "round cancelled");
                true
            }
            None => false,
        }
    }

    /// Advance the live round to `elapsed_seconds` since its start.
    pub fn tick(&mut self, ticket: RoundTicket, elapsed_seconds: f64) -> TickOutcome {
        if self.phase != RoundPhase::Active || self.live_ticket != Some(ticket) {
            debug!(ticket = ticket.0, live = ?self.live_ticket, "stale tick ignored");
            return TickOutcome::Stale;
        }
        let Some(scenario) = self.scenario.as_ref() else {
            return TickOutcome::Stale;
        };

        let speed = self.config.playable_distance / scenario.max_duration;
        let distance = (elapsed_seconds * speed).max(0.0).max(self.distance);
        let price = pricing::price(distance, &scenario.params, &mut self.noise);

        self.distance = distance;
        self.price = price;

        if distance >= self.config.forced_end_distance {
            return match self.settle(true) {
                Ok(result) => TickOutcome::Ended(result),
                Err(_) => TickOutcome::Stale,
            };
        }
        TickOutcome::Running(self.snapshot())
    }

    /// Open a position at the current distance and price.
    pub fn buy(&mut self) -> Result<(), GameError> {
        if self.phase != RoundPhase::Active {
            return Err(GameError::NoActiveRound);
        }
        if self.holding {
            debug!(entry_distance = self.entry_distance, "second buy rejected");
            return Err(GameError::AlreadyHolding);
        }
        self.holding = true;
        self.entry_distance = self.distance;
        self.entry_price = self.price;
        debug!(distance = self.distance, price = self.price, "position opened");
        Ok(())
    }

    /// End the round by hand. Selling without a position is a skip.
    pub fn sell(&mut self) -> Result<RoundResult, GameError> {
        if self.phase != RoundPhase::Active {
            return Err(GameError::NoActiveRound);
        }
        self.settle(false)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let progress = (self.distance / self.config.playable_distance).min(1.0);
        let unrealized = if self.holding {
            Some((self.price - self.entry_price) / self.entry_price * 100.0)
        } else {
            None
        };
        RoundSnapshot {
            phase: self.phase,
            distance: self.distance,
            price: self.price,
            open_price: self.open_price,
            open_multiplier: if self.open_price > 0.0 { self.price / self.open_price } else { 0.0 },
            holding: self.holding,
            entry_distance: self.entry_distance,
            entry_price: self.entry_price,
            unrealized_pnl_percent: unrealized,
            progress,
            market_phase: MarketPhase::from_progress(progress),
            signal: None,
        }
    }

    /// Noiseless curve of the settled round with entry/exit markers.
    pub fn result_chart(&self) -> Option<ResultChart> {
        let scenario = self.scenario.as_ref()?;
        let result = self.result.as_ref()?;
        let step = self.config.chart_step;

        let points = pricing::sample_curve(&scenario.params, self.config.chart_limit, step);
        let entry = if result.held_position() {
            pricing::first_point_within(&points, result.entry_distance, step)
        } else {
            None
        };
        let exit = result
            .exit_distance
            .and_then(|d| pricing::first_point_within(&points, d, step));

        Some(ResultChart {
            points,
            entry,
            exit,
            peak: CurvePoint { d: result.peak_distance, price: result.peak_price },
        })
    }

    // ─── Settlement ──────────────────────────────────────────────────────

    fn settle(&mut self, forced: bool) -> Result<RoundResult, GameError> {
        let (scenario_id, params) = match self.scenario.as_ref() {
            Some(s) => (s.id.to_string(), s.params),
            None => return Err(GameError::NoActiveRound),
        };
        self.live_ticket = None;
        self.phase = RoundPhase::Ended;

        let peak = pricing::scan_peak(
            &params,
            self.config.peak_scan_limit,
            self.config.peak_scan_step,
        );

        let (exit_distance, exit_price, profit_percent) = if self.holding {
            let profit = (self.price - self.entry_price) / self.entry_price * 100.0;
            (Some(self.distance), Some(self.price), profit)
        } else {
            (None, None, 0.0)
        };

        let reason = classify(self.holding, forced, profit_percent);
        let entry_timing = self
            .holding
            .then(|| EntryTiming::classify(self.entry_distance, &params));

        let result = RoundResult {
            scenario_id,
            entry_distance: if self.holding { self.entry_distance } else { 0.0 },
            entry_price: if self.holding { self.entry_price } else { 0.0 },
            exit_distance,
            exit_price,
            profit_percent,
            peak_distance: peak.d,
            peak_price: peak.price,
            forced,
            reason,
            entry_timing,
        };

        info!(
            scenario = %result.scenario_id,
            forced,
            held = self.holding,
            profit_percent,
            peak_distance = peak.d,
            reason = ?reason,
            "round settled"
        );

        self.result = Some(result.clone());
        Ok(result)
    }
}

/// Narrative code for a settled round. Forced endings while holding are a
/// wipeout no matter what the numbers say.
fn classify(held: bool, forced: bool, profit_percent: f64) -> OutcomeReason {
    match (held, forced) {
        (false, true) => OutcomeReason::SatOut,
        (false, false) => OutcomeReason::Skipped,
        (true, true) => OutcomeReason::Rugged,
        (true, false) if profit_percent > 0.0 => OutcomeReason::TookProfit {
            percent: profit_percent.round() as i64,
        },
        (true, false) => OutcomeReason::BoughtTheTop,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SCENARIOS;
    use crate::pricing::{noiseless_price, FixedNoise};

    fn frog() -> Scenario {
        Scenario {
            id: "frog",
            name: "Frog",
            category: EventCategory::Meme,
            description: "",
            max_duration: 20.0,
            params: PropagationParams {
                p0: 100.0, beta: 0.5, gamma: 1.0, r: 0.6,
                lambda: 0.4, delta: 1.2, d_peak_est: 2.0,
            },
        }
    }

    fn engine() -> RoundEngine<FixedNoise> {
        RoundEngine::new(RoundConfig::default(), FixedNoise(0.5))
    }

    #[test]
    fn test_new_engine_is_idle() {
        let e = engine();
        assert_eq!(e.phase(), RoundPhase::Idle);
        assert!(e.live_ticket().is_none());
        assert!(e.result().is_none());
    }

    #[test]
    fn test_start_uses_noiseless_open_price() {
        let mut e = RoundEngine::new(RoundConfig::default(), FixedNoise(0.99));
        let s = frog();
        e.start(&s);
        assert_eq!(e.phase(), RoundPhase::Active);
        assert_eq!(e.distance(), 0.0);
        assert_eq!(e.open_price(), noiseless_price(0.0, &s.params));
        assert_eq!(e.price(), e.open_price());
        assert!(!e.is_holding());
    }

    #[test]
    fn test_distance_mapping() {
        let mut e = engine();
        let t = e.start(&frog());
        assert!(e.tick(t, 10.0).keep_going());
        assert_eq!(e.distance(), 4.0);
    }

    #[test]
    fn test_distance_never_decreases() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 5.0);
        let d = e.distance();
        e.tick(t, 2.0);
        assert_eq!(e.distance(), d);
        e.tick(t, -3.0);
        assert_eq!(e.distance(), d);
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, -1.0);
        assert_eq!(e.distance(), 0.0);
    }

    #[test]
    fn test_double_buy_keeps_first_entry() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 1.0);
        e.buy().unwrap();
        let first = e.entry();
        e.tick(t, 3.0);
        assert!(matches!(e.buy(), Err(GameError::AlreadyHolding)));
        assert_eq!(e.entry(), first);
    }

    #[test]
    fn test_buy_and_sell_rejected_when_idle() {
        let mut e = engine();
        assert!(matches!(e.buy(), Err(GameError::NoActiveRound)));
        assert!(matches!(e.sell(), Err(GameError::NoActiveRound)));
        assert_eq!(e.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_sell_after_end_rejected() {
        let mut e = engine();
        e.start(&frog());
        let first = e.sell().unwrap();
        assert!(matches!(e.sell(), Err(GameError::NoActiveRound)));
        assert_eq!(e.result(), Some(&first));
    }

    #[test]
    fn test_skip_without_position() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 3.0);
        let r = e.sell().unwrap();
        assert_eq!(r.profit_percent, 0.0);
        assert_eq!(r.exit_distance, None);
        assert_eq!(r.exit_price, None);
        assert_eq!(r.entry_price, 0.0);
        assert_eq!(r.reason, OutcomeReason::Skipped);
        assert!(r.entry_timing.is_none());
        assert!(!r.forced);
    }

    #[test]
    fn test_forced_end_without_position() {
        let mut e = engine();
        let t = e.start(&frog());
        match e.tick(t, 25.0) {
            TickOutcome::Ended(r) => {
                assert!(r.forced);
                assert_eq!(r.profit_percent, 0.0);
                assert_eq!(r.exit_price, None);
                assert_eq!(r.reason, OutcomeReason::SatOut);
            }
            other => panic!("expected forced end, got {other:?}"),
        }
    }

    #[test]
    fn test_forced_end_boundary_exact() {
        // 25 s at 8/20 per second lands exactly on 10.
        let mut e = engine();
        let t = e.start(&frog());
        assert!(matches!(e.tick(t, 25.0), TickOutcome::Ended(_)));
        assert_eq!(e.phase(), RoundPhase::Ended);
        assert_eq!(e.tick(t, 26.0), TickOutcome::Stale);
    }

    #[test]
    fn test_just_below_boundary_keeps_running() {
        let mut e = engine();
        let t = e.start(&frog());
        assert!(e.tick(t, 24.9).keep_going());
    }

    #[test]
    fn test_forced_end_while_holding_is_rugged_even_in_profit() {
        // Rising curve: forced exit is far above entry.
        let mut s = frog();
        s.params = PropagationParams {
            p0: 1.0, beta: 0.0, gamma: 0.0, r: 0.0,
            lambda: 0.0, delta: -1.0, d_peak_est: 0.0,
        };
        let mut e = engine();
        let t = e.start(&s);
        e.tick(t, 1.0);
        e.buy().unwrap();
        let TickOutcome::Ended(r) = e.tick(t, 30.0) else {
            panic!("expected forced end");
        };
        assert!(r.profit_percent > 0.0);
        assert_eq!(r.reason, OutcomeReason::Rugged);
        assert!(r.forced);
    }

    #[test]
    fn test_take_profit() {
        let mut s = frog();
        s.params.d_peak_est = 4.0;
        s.params.beta = 0.0;
        s.params.r = 0.0;
        s.params.delta = 0.0;
        let mut e = engine();
        let t = e.start(&s);
        e.tick(t, 2.0);
        e.buy().unwrap();
        e.tick(t, 10.0);
        let r = e.sell().unwrap();
        assert!(r.profit_percent > 0.0);
        assert_eq!(
            r.reason,
            OutcomeReason::TookProfit { percent: r.profit_percent.round() as i64 }
        );
        assert_eq!(r.exit_distance, Some(4.0));
        assert_eq!(r.entry_timing, Some(EntryTiming::Early));
    }

    #[test]
    fn test_loss_is_bought_the_top() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 1.0);
        e.buy().unwrap();
        e.tick(t, 10.0);
        let r = e.sell().unwrap();
        assert!(r.profit_percent < 0.0);
        assert_eq!(r.reason, OutcomeReason::BoughtTheTop);
    }

    #[test]
    fn test_flat_trade_is_bought_the_top() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 1.0);
        e.buy().unwrap();
        let r = e.sell().unwrap();
        assert_eq!(r.profit_percent, 0.0);
        assert_eq!(r.reason, OutcomeReason::BoughtTheTop);
    }

    #[test]
    fn test_restart_cancels_previous_ticket() {
        let mut e = engine();
        let old = e.start(&frog());
        e.tick(old, 5.0);
        let new = e.start(&frog());
        assert_ne!(old, new);
        assert_eq!(e.tick(old, 6.0), TickOutcome::Stale);
        assert_eq!(e.distance(), 0.0);
        assert!(e.tick(new, 1.0).keep_going());
    }

    #[test]
    fn test_ticket_counter_wraps() {
        let mut e = engine();
        e.generation = u32::MAX;
        let old = e.start(&frog());
        assert_eq!(old, RoundTicket(0));
        let new = e.start(&frog());
        assert_eq!(new, RoundTicket(1));
        assert_eq!(e.tick(old, 1.0), TickOutcome::Stale);
        assert!(e.tick(new, 1.0).keep_going());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut e = engine();
        let t = e.start(&frog());
        assert!(e.cancel());
        assert!(!e.cancel());
        assert_eq!(e.phase(), RoundPhase::Idle);
        assert_eq!(e.tick(t, 1.0), TickOutcome::Stale);
        assert!(e.result().is_none());
    }

    #[test]
    fn test_peak_recorded_in_result() {
        let mut e = engine();
        let s = frog();
        e.start(&s);
        let r = e.sell().unwrap();
        let peak = pricing::scan_peak(&s.params, 10.0, 0.1);
        assert_eq!(r.peak_distance, peak.d);
        assert_eq!(r.peak_price, peak.price);
    }

    #[test]
    fn test_snapshot_tracks_position() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 1.0);
        assert!(e.snapshot().unrealized_pnl_percent.is_none());
        e.buy().unwrap();
        let snap = e.snapshot();
        assert!(snap.holding);
        assert_eq!(snap.unrealized_pnl_percent, Some(0.0));
        assert_eq!(snap.entry_price, e.price());
        assert!((snap.progress - 0.05).abs() < 1e-12);
        assert_eq!(snap.market_phase, MarketPhase::Smart);
    }

    #[test]
    fn test_snapshot_progress_caps_at_one() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 22.0);
        let snap = e.snapshot();
        assert_eq!(snap.progress, 1.0);
        assert_eq!(snap.market_phase, MarketPhase::Rekt);
    }

    #[test]
    fn test_result_chart_markers() {
        let mut e = engine();
        let t = e.start(&frog());
        e.tick(t, 2.5);
        e.buy().unwrap();
        e.tick(t, 5.0);
        e.sell().unwrap();
        let chart = e.result_chart().unwrap();
        assert_eq!(chart.points.len(), 51);
        assert!((chart.entry.unwrap().d - 1.0).abs() < 0.2);
        assert!((chart.exit.unwrap().d - 2.0).abs() < 0.2);
    }

    #[test]
    fn test_result_chart_without_position() {
        let mut e = engine();
        assert!(e.result_chart().is_none());
        e.start(&frog());
        e.sell().unwrap();
        let chart = e.result_chart().unwrap();
        assert!(chart.entry.is_none());
        assert!(chart.exit.is_none());
    }

    #[test]
    fn test_every_catalog_scenario_force_ends() {
        for s in &SCENARIOS {
            let mut e = engine();
            let t = e.start(s);
            let end = s.max_duration * 1.3;
            assert!(matches!(e.tick(t, end), TickOutcome::Ended(_)), "{}", s.id);
        }
    }
}
