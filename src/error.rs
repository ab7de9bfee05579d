// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Errors

use crate::types::ScreenMode;

/// Every way a command against the round or session can be refused.
///
/// None of these are fatal: the wasm facade turns them into `false`/`null`
/// and the state they were issued against is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no active round")]
    NoActiveRound,

    #[error("a position is already open")]
    AlreadyHolding,

    #[error("unknown scenario id: {0}")]
    UnknownScenario(String),

    #[error("screen transition {from:?} -> {to:?} is not allowed")]
    InvalidTransition { from: ScreenMode, to: ScreenMode },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),
}
