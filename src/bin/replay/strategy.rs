// Scripted Player Strategies
// Each strategy decides, from the live snapshot, whether to buy or sell.

use meme_arena::{PropagationParams, RoundSnapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Wait,
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Never buys, never sells; the round runs out.
    Spectator,
    /// Ends the round immediately without a position.
    Skipper,
    /// Buys at `buy_at`, sells at `sell_at` (distances).
    Window { buy_at: f64, sell_at: f64 },
    /// Buys at `buy_at` and holds into the forced end.
    DiamondHands { buy_at: f64 },
    /// Buys early, sells once the price has run up by `target` (fraction).
    TakeProfit { buy_at: f64, target: f64 },
}

impl Strategy {
    pub fn name(&self) -> String {
        match self {
            Self::Spectator => "spectator".to_string(),
            Self::Skipper => "skipper".to_string(),
            Self::Window { buy_at, sell_at } => format!("window_{buy_at:.1}_{sell_at:.1}"),
            Self::DiamondHands { buy_at } => format!("diamond_hands_{buy_at:.1}"),
            Self::TakeProfit { buy_at, target } => {
                format!("take_profit_{buy_at:.1}_{:.0}pct", target * 100.0)
            }
        }
    }

    pub fn decide(&self, snap: &RoundSnapshot) -> Action {
        match *self {
            Self::Spectator => Action::Wait,
            Self::Skipper => Action::Sell,
            Self::Window { buy_at, sell_at } => {
                if !snap.holding && snap.distance >= buy_at {
                    Action::Buy
                } else if snap.holding && snap.distance >= sell_at {
                    Action::Sell
                } else {
                    Action::Wait
                }
            }
            Self::DiamondHands { buy_at } => {
                if !snap.holding && snap.distance >= buy_at {
                    Action::Buy
                } else {
                    Action::Wait
                }
            }
            Self::TakeProfit { buy_at, target } => {
                if !snap.holding && snap.distance >= buy_at {
                    Action::Buy
                } else if snap.holding && snap.price >= snap.entry_price * (1.0 + target) {
                    Action::Sell
                } else {
                    Action::Wait
                }
            }
        }
    }
}

/// Line-up played against every scenario. The peak-chaser window is cut
/// around each scenario's estimated audience peak.
pub fn lineup(params: &PropagationParams) -> Vec<Strategy> {
    vec![
        Strategy::Spectator,
        Strategy::Skipper,
        Strategy::Window { buy_at: 0.2, sell_at: 1.5 },
        Strategy::Window { buy_at: params.d_peak_est * 0.5, sell_at: params.d_peak_est },
        Strategy::DiamondHands { buy_at: 0.5 },
        Strategy::TakeProfit { buy_at: 0.1, target: 0.2 },
    ]
}
