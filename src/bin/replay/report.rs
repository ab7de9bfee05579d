// Replay Report Types
// Structured output for strategy comparison across the scenario catalog

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub seed: u64,
    pub frames: u64,
    pub profit_percent: f64,
    pub balance_after: f64,
    pub entry_distance: Option<f64>,
    pub exit_distance: Option<f64>,
    pub peak_distance: f64,
    pub forced: bool,
    pub win: bool,
    pub reason: String,
}

// ─── Monte Carlo Report (per scenario x strategy) ───────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub scenario_id: String,
    pub scenario_name: String,
    pub category: String,
    pub strategy: String,
    pub n_runs: usize,
    pub win_rate: f64,
    pub forced_rate: f64,
    pub profit_percent: Stats,
    pub balance_after: Stats,
    pub individual_runs: Vec<RunResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub frame_ms: f64,
    pub n_runs: usize,
    pub base_seed: u64,
    pub reports: Vec<StrategyReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let s = Stats::from_samples(&[]);
        assert_eq!(s.n, 0);
        assert_eq!(s.mean, 0.0);
    }

    #[test]
    fn test_stats_values() {
        let s = Stats::from_samples(&[2.0, 4.0, 6.0]);
        assert!((s.mean - 4.0).abs() < f64::EPSILON);
        assert!((s.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 6.0);
        assert!(s.ci_lower < s.mean && s.mean < s.ci_upper);
    }
}
