// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Type Definitions

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Propagation Params ──────────────────────────────────────────────────────

/// Shape of one scenario's price curve over propagation distance.
///
/// Field names on the wire match the front end's parameter sheet (`P0`, `R`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PropagationParams {
    /// Scale of the theoretical max price.
    #[serde(rename = "P0")]
    pub p0: f64,
    /// Trust decay rate.
    pub beta: f64,
    /// Scarcity exponent. Carried for catalog compatibility; the price
    /// formula does not read it.
    pub gamma: f64,
    /// Scarcity decay rate.
    #[serde(rename = "R")]
    pub r: f64,
    /// Inverse width of the audience bump.
    pub lambda: f64,
    /// Capital decay exponent.
    pub delta: f64,
    /// Distance at which the audience bump is centred.
    pub d_peak_est: f64,
}

// ─── Scenario ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Global = 0,
    Crypto = 1,
    Meme = 2,
    Scam = 3,
}

impl EventCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Global => "Global (Trump/Musk)",
            Self::Crypto => "Crypto (Vitalik/Hacks)",
            Self::Meme => "Pure Meme (Cats/Dogs)",
            Self::Scam => "Pig Butchering (Rug Pull)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub category: EventCategory,
    pub description: &'static str,
    /// Wall-clock seconds over which the playable distance range is traversed.
    pub max_duration: f64,
    pub params: PropagationParams,
}

// ─── Social Signal ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SocialSignal {
    /// Distance from which this signal is the current one.
    pub threshold: f64,
    pub text: &'static str,
    pub source: &'static str,
}

// ─── Round Phase / Screen Mode ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundPhase {
    Idle = 0,
    Active = 1,
    Ended = 2,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScreenMode {
    Menu = 0,
    Playing = 1,
    Result = 2,
    /// Reserved. No transition produces it.
    GameOver = 3,
}

// ─── Round Ticket ────────────────────────────────────────────────────────────

/// Identifies one tick sequence. A ticket goes stale as soon as its round is
/// settled, cancelled or replaced; stale tickets are ignored by the engine.
///
/// `u32` so it crosses the wasm boundary as a plain JS number. The counter
/// wraps after 2^32 rounds on one engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoundTicket(pub u32);

// ─── Market Phase (progress bar bands) ───────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarketPhase {
    Smart = 0,
    Alpha = 1,
    Fomo = 2,
    Rekt = 3,
}

impl MarketPhase {
    /// Band for a progress fraction (distance over playable distance).
    pub fn from_progress(progress: f64) -> Self {
        if progress < 0.2 {
            Self::Smart
        } else if progress < 0.5 {
            Self::Alpha
        } else if progress < 0.8 {
            Self::Fomo
        } else {
            Self::Rekt
        }
    }
}

// ─── Entry Timing (post-round review) ────────────────────────────────────────

/// Entries before this distance count as insider/influencer stage.
pub const EARLY_ENTRY_DISTANCE: f64 = 1.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryTiming {
    /// Bought during the insider/influencer stage.
    Early = 0,
    /// Bought while the trend was still building toward the audience peak.
    MidTrend = 1,
    /// Bought into the crowd, past the estimated peak.
    Fomo = 2,
}

impl EntryTiming {
    pub fn classify(entry_distance: f64, params: &PropagationParams) -> Self {
        if entry_distance < EARLY_ENTRY_DISTANCE {
            Self::Early
        } else if entry_distance < params.d_peak_est {
            Self::MidTrend
        } else {
            Self::Fomo
        }
    }

    pub fn commentary(&self) -> &'static str {
        match self {
            Self::Early => "You got in during the insider stage: cheap entry and the whole propagation run ahead of you.",
            Self::MidTrend => "You chased the trend mid-way. Still profitable territory, but the risk/reward was already shrinking.",
            Self::Fomo => "You bought into the mania phase. Classic FOMO: you were someone else's exit liquidity.",
        }
    }
}

// ─── Outcome Reason ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Never bought and the round ran out.
    SatOut,
    /// Never bought and ended the round by hand.
    Skipped,
    /// Still holding when the round ran out.
    Rugged,
    /// Sold above entry; `percent` is the rounded gain.
    TookProfit { percent: i64 },
    /// Sold at or below entry.
    BoughtTheTop,
}

impl OutcomeReason {
    pub fn is_win(&self) -> bool {
        matches!(self, Self::TookProfit { .. })
    }
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SatOut => write!(f, "You watched the whole round and missed every opportunity."),
            Self::Skipped => write!(f, "You chose to skip this one."),
            Self::Rugged => write!(f, "Liquidity dried up and you couldn't get out (zeroed)!"),
            Self::TookProfit { percent } => write!(f, "Clean take-profit! Up {}%", percent),
            Self::BoughtTheTop => write!(f, "Bought the top, sold at a loss."),
        }
    }
}

// ─── Round Result ────────────────────────────────────────────────────────────

/// Scored outcome of one round. Produced once, at settlement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundResult {
    pub scenario_id: String,
    /// Zero when no position was opened.
    pub entry_distance: f64,
    /// Zero when no position was opened.
    pub entry_price: f64,
    /// `None` means the player never bought.
    pub exit_distance: Option<f64>,
    pub exit_price: Option<f64>,
    pub profit_percent: f64,
    pub peak_distance: f64,
    pub peak_price: f64,
    pub forced: bool,
    pub reason: OutcomeReason,
    #[serde(default)]
    pub entry_timing: Option<EntryTiming>,
}

impl RoundResult {
    pub fn held_position(&self) -> bool {
        self.exit_price.is_some()
    }

    pub fn narrative(&self) -> String {
        self.reason.to_string()
    }
}

// ─── Round Snapshot (live HUD) ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub distance: f64,
    pub price: f64,
    pub open_price: f64,
    /// `price / open_price`.
    pub open_multiplier: f64,
    pub holding: bool,
    pub entry_distance: f64,
    pub entry_price: f64,
    /// Only while holding.
    pub unrealized_pnl_percent: Option<f64>,
    /// Distance over playable distance, capped at 1.
    pub progress: f64,
    pub market_phase: MarketPhase,
    pub signal: Option<SocialSignal>,
}

// ─── Tick Outcome ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickOutcome {
    Running(RoundSnapshot),
    Ended(RoundResult),
    /// The ticket does not belong to the live round; nothing changed.
    Stale,
}

impl TickOutcome {
    /// True when the driver should keep sampling.
    pub fn keep_going(&self) -> bool {
        matches!(self, Self::Running(_))
    }
}

// ─── Curve / Chart ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    pub d: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultChart {
    pub points: Vec<CurvePoint>,
    pub entry: Option<CurvePoint>,
    pub exit: Option<CurvePoint>,
    pub peak: CurvePoint,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
