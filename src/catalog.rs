// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Scenario Catalog

use crate::types::{EventCategory, PropagationParams, Scenario};

/// The fixed scenario list, in menu order.
pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: "1",
        name: "Musk posted a hamster",
        category: EventCategory::Global,
        description: "Global-scale event. Huge audience, pumps for a long time.",
        max_duration: 25.0,
        params: PropagationParams {
            p0: 2000.0,
            beta: 0.1,       // it's Elon, trust barely moves
            gamma: 1.0,
            r: 0.1,          // hard to replicate
            lambda: 0.05,    // very wide audience curve
            delta: 0.5,
            d_peak_est: 5.5, // peaks late
        },
    },
    Scenario {
        id: "2",
        name: "Vitalik wore a dinosaur suit",
        category: EventCategory::Crypto,
        description: "Viral on crypto Twitter. The textbook golden-dog curve.",
        max_duration: 18.0,
        params: PropagationParams {
            p0: 500.0,
            beta: 0.2,
            gamma: 1.0,
            r: 0.2,
            lambda: 0.15,
            delta: 0.8,
            d_peak_est: 3.5,
        },
    },
    Scenario {
        id: "3",
        name: "Random Frog Coin #882",
        category: EventCategory::Meme,
        description: "Ordinary dog coin. In fast, out fast, or you're too late.",
        max_duration: 12.0,
        params: PropagationParams {
            p0: 100.0,
            beta: 0.5,
            gamma: 1.0,
            r: 0.6,          // trivially copied
            lambda: 0.4,     // sharp, narrow peak
            delta: 1.2,
            d_peak_est: 2.0,
        },
    },
    Scenario {
        id: "4",
        name: "SuperSafeMoon (Trust Me)",
        category: EventCategory::Scam,
        description: "Looks like it's going up. The crash takes an instant.",
        max_duration: 10.0,
        params: PropagationParams {
            p0: 50.0,
            beta: 0.1,
            gamma: 0.5,
            r: 0.1,
            lambda: 0.8,
            delta: 0.2,      // artificially stable
            d_peak_est: 1.2,
        },
    },
];

pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}
