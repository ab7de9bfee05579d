// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - speculative price propagation game engine

pub mod types;
pub mod error;
pub mod config;
pub mod pricing;
pub mod signals;
pub mod catalog;
pub mod round;
pub mod session;

pub use types::*;
pub use error::GameError;
pub use config::{GameConfig, RoundConfig};
pub use pricing::{FixedNoise, NoiseSource};
pub use round::RoundEngine;
pub use session::SessionController;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing session. The front end owns the animation loop: it keeps
/// the ticket returned by `select_scenario` and passes it to every `tick`;
/// once a tick reports anything other than `running` the loop must stop.
#[wasm_bindgen]
pub struct GameSession {
    inner: SessionController<ChaCha8Rng>,
}

#[wasm_bindgen]
impl GameSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_panic_hook();
        Self {
            inner: SessionController::new(GameConfig::default(), ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Build from a partial config object; invalid configs fall back to
    /// the defaults.
    pub fn with_config(seed: u64, config: JsValue) -> Self {
        let cfg = serde_wasm_bindgen::from_value::<GameConfig>(config)
            .ok()
            .filter(|c| c.validate().is_ok())
            .unwrap_or_default();
        install_panic_hook();
        Self {
            inner: SessionController::new(cfg, ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn get_scenarios(&self) -> JsValue {
        to_js(&self.inner.scenarios())
    }

    /// Returns the round ticket, or undefined if the selection was refused.
    pub fn select_scenario(&mut self, id: &str) -> Option<u32> {
        self.inner.select_scenario(id).ok().map(|ticket| ticket.0)
    }

    pub fn tick(&mut self, ticket: u32, elapsed_seconds: f64) -> JsValue {
        to_js(&self.inner.tick(RoundTicket(ticket), elapsed_seconds))
    }

    pub fn buy(&mut self) -> bool {
        self.inner.buy().is_ok()
    }

    /// Returns the round result, or null if there was no round to end.
    pub fn sell(&mut self) -> JsValue {
        match self.inner.sell() {
            Ok(result) => to_js(&result),
            Err(_) => JsValue::NULL,
        }
    }

    pub fn return_to_menu(&mut self) -> bool {
        self.inner.return_to_menu().is_ok()
    }

    pub fn get_snapshot(&self) -> JsValue {
        match self.inner.snapshot() {
            Some(snapshot) => to_js(&snapshot),
            None => JsValue::NULL,
        }
    }

    pub fn get_result(&self) -> JsValue {
        match self.inner.result() {
            Some(result) => to_js(result),
            None => JsValue::NULL,
        }
    }

    /// The outcome sentence and entry review for the summary screen.
    pub fn get_result_narrative(&self) -> JsValue {
        match self.inner.result() {
            Some(result) => to_js(&(
                result.narrative(),
                result.entry_timing.map(|t| t.commentary()),
            )),
            None => JsValue::NULL,
        }
    }

    pub fn get_result_chart(&self) -> JsValue {
        match self.inner.result_chart() {
            Some(chart) => to_js(&chart),
            None => JsValue::NULL,
        }
    }

    pub fn get_balance(&self) -> f64 {
        self.inner.balance()
    }

    pub fn get_mode(&self) -> JsValue {
        to_js(&self.inner.mode())
    }
}
