// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Session Controller
//
// Menu -> Playing (select_scenario) -> Result (settlement) -> Menu
// (return_to_menu). The balance survives every round of the session and is
// only touched at settlement.

use tracing::{debug, info, warn};

use crate::catalog::{self, SCENARIOS};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::pricing::NoiseSource;
use crate::round::RoundEngine;
use crate::signals::{self, SOCIAL_SIGNALS};
use crate::types::*;

pub struct SessionController<N: NoiseSource> {
    balance: f64,
    mode: ScreenMode,
    scenario: Option<&'static Scenario>,
    result: Option<RoundResult>,
    engine: RoundEngine<N>,
}

impl<N: NoiseSource> SessionController<N> {
    pub fn new(config: GameConfig, noise: N) -> Self {
        Self {
            balance: config.starting_balance,
            mode: ScreenMode::Menu,
            scenario: None,
            result: None,
            engine: RoundEngine::new(config.round, noise),
        }
    }

    pub fn balance(&self) -> f64 { self.balance }
    pub fn mode(&self) -> ScreenMode { self.mode }
    pub fn scenario(&self) -> Option<&'static Scenario> { self.scenario }
    pub fn result(&self) -> Option<&RoundResult> { self.result.as_ref() }
    pub fn engine(&self) -> &RoundEngine<N> { &self.engine }
    pub fn scenarios(&self) -> &'static [Scenario] { &SCENARIOS }

    /// Menu -> Playing. Starts a round on the chosen scenario.
    pub fn select_scenario(&mut self, id: &str) -> Result<RoundTicket, GameError> {
        self.expect_mode(ScreenMode::Menu, ScreenMode::Playing)?;
        let scenario = catalog::find_scenario(id)
            .ok_or_else(|| GameError::UnknownScenario(id.to_string()))?;

        let ticket = self.engine.start(scenario);
        self.scenario = Some(scenario);
        self.result = None;
        self.mode = ScreenMode::Playing;
        info!(scenario = scenario.id, balance = self.balance, "scenario selected");
        Ok(ticket)
    }

    pub fn tick(&mut self, ticket: RoundTicket, elapsed_seconds: f64) -> TickOutcome {
        if self.mode != ScreenMode::Playing {
            return TickOutcome::Stale;
        }
        match self.engine.tick(ticket, elapsed_seconds) {
            TickOutcome::Running(mut snapshot) => {
                snapshot.signal = signals::current_signal(snapshot.distance, &SOCIAL_SIGNALS).copied();
                TickOutcome::Running(snapshot)
            }
            TickOutcome::Ended(result) => {
                self.apply_settlement(&result);
                TickOutcome::Ended(result)
            }
            TickOutcome::Stale => TickOutcome::Stale,
        }
    }

    pub fn buy(&mut self) -> Result<(), GameError> {
        if self.mode != ScreenMode::Playing {
            return Err(GameError::NoActiveRound);
        }
        self.engine.buy()
    }

    /// Playing -> Result.
    pub fn sell(&mut self) -> Result<RoundResult, GameError> {
        self.expect_mode(ScreenMode::Playing, ScreenMode::Result)?;
        let result = self.engine.sell()?;
        self.apply_settlement(&result);
        Ok(result)
    }

    /// Result -> Menu. Drops the round result; the balance stays.
    pub fn return_to_menu(&mut self) -> Result<(), GameError> {
        self.expect_mode(ScreenMode::Result, ScreenMode::Menu)?;
        self.result = None;
        self.mode = ScreenMode::Menu;
        debug!(balance = self.balance, "back to menu");
        Ok(())
    }

    /// Live HUD view, with the current social signal filled in. Nothing on
    /// the menu.
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        if !matches!(self.mode, ScreenMode::Playing | ScreenMode::Result) {
            return None;
        }
        let mut snapshot = self.engine.snapshot();
        snapshot.signal = signals::current_signal(snapshot.distance, &SOCIAL_SIGNALS).copied();
        Some(snapshot)
    }

    /// Chart for the summary screen. Only while the result is on screen.
    pub fn result_chart(&self) -> Option<ResultChart> {
        if self.mode != ScreenMode::Result {
            return None;
        }
        self.engine.result_chart()
    }

    fn apply_settlement(&mut self, result: &RoundResult) {
        let before = self.balance;
        if result.held_position() {
            self.balance *= 1.0 + result.profit_percent / 100.0;
        }
        self.result = Some(result.clone());
        self.mode = ScreenMode::Result;
        info!(
            before,
            after = self.balance,
            profit_percent = result.profit_percent,
            reason = %result.reason,
            "balance settled"
        );
    }

    fn expect_mode(&self, from: ScreenMode, to: ScreenMode) -> Result<(), GameError> {
        if self.mode != from {
            warn!(current = ?self.mode, ?to, "rejected screen transition");
            return Err(GameError::InvalidTransition { from: self.mode, to });
        }
        Ok(())
    }
}
