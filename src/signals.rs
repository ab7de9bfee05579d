// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Social Signals

use crate::types::SocialSignal;

/// Who is talking about the coin at each propagation distance.
/// Sorted ascending by threshold.
pub static SOCIAL_SIGNALS: [SocialSignal; 8] = [
    SocialSignal { threshold: 0.2, text: "Dev is deploying the contract...", source: "Etherscan" },
    SocialSignal { threshold: 0.5, text: "'Alpha God' mentioned it in the private group", source: "Telegram" },
    SocialSignal { threshold: 1.2, text: "Influencer 'CryptoChad' is shilling it", source: "Twitter/X" },
    SocialSignal { threshold: 2.0, text: "DexScreener trending #5", source: "DexScreener" },
    SocialSignal { threshold: 3.5, text: "Coindesk ran an article", source: "News" },
    SocialSignal { threshold: 4.5, text: "Kids on TikTok are copying the meme", source: "TikTok" },
    SocialSignal { threshold: 6.0, text: "Your aunt is asking how to buy it", source: "WhatsApp/WeChat" },
    SocialSignal { threshold: 8.0, text: "Community takeover (dev has left)", source: "Bagholders" },
];

/// Signal with the largest threshold not above `distance`; the first entry
/// when `distance` is below every threshold. `None` only for an empty table.
pub fn current_signal(distance: f64, table: &[SocialSignal]) -> Option<&SocialSignal> {
    let first = table.first()?;
    Some(table.iter().fold(first, |best, s| {
        if s.threshold <= distance && s.threshold > best.threshold {
            s
        } else {
            best
        }
    }))
}
