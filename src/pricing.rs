// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Propagation Pricing Model
//
// P(d) = P0 * trust(d) * scarcity(d) * audience(d) * capital(d), plus up to
// ±2.5% uniform market noise, floored at PRICE_FLOOR. The noiseless curve is
// the one evaluator shared by the opening price, the peak scan and the
// result chart.

use rand::{Rng, RngCore};

use crate::types::{CurvePoint, PropagationParams};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Offset inside the capital factor `(d + 3)^-delta`. Softens the early decay
/// so the audience bump can carry the price up near the origin.
pub const CAPITAL_OFFSET: f64 = 3.0;

/// Full width of the noise band as a fraction of the raw price (±2.5%).
pub const NOISE_AMPLITUDE: f64 = 0.05;

/// Prices never go below this.
pub const PRICE_FLOOR: f64 = 0.001;

// ---------------------------------------------------------------------------
// Noise source
// ---------------------------------------------------------------------------

/// Supplies uniform samples in `[0, 1)` for the market noise term.
pub trait NoiseSource {
    fn unit_sample(&mut self) -> f64;
}

impl<R: RngCore> NoiseSource for R {
    fn unit_sample(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Always returns the same sample. `FixedNoise(0.5)` cancels the noise term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn unit_sample(&mut self) -> f64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Curve evaluation
// ---------------------------------------------------------------------------

/// Unfloored product of the four factors. `gamma` is not read.
fn raw_price(distance: f64, params: &PropagationParams) -> f64 {
    let d = distance.max(0.0);

    let trust = (-params.beta * d).exp();
    let scarcity = (-params.r * d).exp();
    let audience = (-params.lambda * (d - params.d_peak_est).powi(2)).exp();
    let capital = (d + CAPITAL_OFFSET).powf(-params.delta);

    params.p0 * trust * scarcity * audience * capital
}

/// Stable, repeatable price at `distance`.
pub fn noiseless_price(distance: f64, params: &PropagationParams) -> f64 {
    raw_price(distance, params).max(PRICE_FLOOR)
}

/// Live market price at `distance`: the raw curve plus one noise draw.
/// Two calls at the same distance may differ.
pub fn price<N: NoiseSource + ?Sized>(
    distance: f64,
    params: &PropagationParams,
    noise: &mut N,
) -> f64 {
    let raw = raw_price(distance, params);
    let jitter = (noise.unit_sample() - 0.5) * raw * NOISE_AMPLITUDE;
    (raw + jitter).max(PRICE_FLOOR)
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// Highest point of the noiseless curve over `[0, limit)` sampled every
/// `step`. Ties keep the earliest distance.
pub fn scan_peak(params: &PropagationParams, limit: f64, step: f64) -> CurvePoint {
    let mut peak = CurvePoint { d: 0.0, price: 0.0 };
    let mut i: usize = 0;
    loop {
        let d = i as f64 * step;
        if d >= limit {
            break;
        }
        let p = noiseless_price(d, params);
        if p > peak.price {
            peak = CurvePoint { d, price: p };
        }
        i += 1;
    }
    peak
}

/// Noiseless curve over `[0, limit]` inclusive, sampled every `step`.
pub fn sample_curve(params: &PropagationParams, limit: f64, step: f64) -> Vec<CurvePoint> {
    let n = (limit / step).round() as usize;
    (0..=n)
        .map(|i| {
            let d = i as f64 * step;
            CurvePoint { d, price: noiseless_price(d, params) }
        })
        .collect()
}

/// First curve point within `step` of `distance`. With a step-spaced curve
/// this can be the sample just below `distance` rather than the closest one.
pub fn first_point_within(points: &[CurvePoint], distance: f64, step: f64) -> Option<CurvePoint> {
    points.iter().copied().find(|p| (p.d - distance).abs() < step)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
