//! Synthetic "score history" for the trend chart.
//!
//! Nothing here is real historical data: every series is random noise drawn around
//! the player's current MVP score.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::model::ScoredRecord;

pub const SIMULATION_LABEL: &str = "SIMULATED: random noise around current scores, not real history";
pub const PLAYER_COUNT_OPTIONS: [usize; 2] = [3, 5];
pub const MIN_DAYS: usize = 3;
pub const MAX_DAYS: usize = 8;
pub const DEFAULT_DAYS: usize = 5;
const NOISE_STD_DEV: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMetric {
    #[default]
    ProxyScore,
    /// Each player's series rescaled to percent of its own total.
    Probability,
}

impl HistoryMetric {
    pub fn toggle(self) -> Self {
        match self {
            HistoryMetric::ProxyScore => HistoryMetric::Probability,
            HistoryMetric::Probability => HistoryMetric::ProxyScore,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistoryMetric::ProxyScore => "MVP Proxy Score",
            HistoryMetric::Probability => "MVP Probability (%)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSeries {
    pub player_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedHistory {
    pub metric: HistoryMetric,
    /// Oldest first: "Day -4" .. "Day -0".
    pub day_labels: Vec<String>,
    pub series: Vec<SimulatedSeries>,
    pub synthetic: bool,
}

impl SimulatedHistory {
    pub fn label(&self) -> &'static str {
        SIMULATION_LABEL
    }

    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Nearest allowed player count (3 or 5).
pub fn clamp_player_count(requested: usize) -> usize {
    if requested <= PLAYER_COUNT_OPTIONS[0] {
        PLAYER_COUNT_OPTIONS[0]
    } else {
        PLAYER_COUNT_OPTIONS[1]
    }
}

pub fn clamp_days(requested: usize) -> usize {
    requested.clamp(MIN_DAYS, MAX_DAYS)
}

/// Perturbs each leader's score with `days` draws of N(score, 0.01), clipped at zero.
/// Records without a score are skipped.
pub fn simulate_history<R: Rng>(
    leaders: &[ScoredRecord],
    players: usize,
    days: usize,
    metric: HistoryMetric,
    rng: &mut R,
) -> SimulatedHistory {
    let players = clamp_player_count(players);
    let days = clamp_days(days);

    let series = leaders
        .iter()
        .filter_map(|r| r.mvp_score.map(|score| (r.player_name(), score)))
        .take(players)
        .map(|(name, base)| {
            let raw: Vec<f64> = (0..days)
                .map(|_| (base + NOISE_STD_DEV * rng.sample::<f64, _>(StandardNormal)).max(0.0))
                .collect();
            let values = match metric {
                HistoryMetric::ProxyScore => raw,
                HistoryMetric::Probability => to_percent_of_total(&raw),
            };
            SimulatedSeries {
                player_name: name.to_string(),
                values,
            }
        })
        .collect();

    SimulatedHistory {
        metric,
        day_labels: day_labels(days),
        series,
        synthetic: true,
    }
}

pub fn day_labels(days: usize) -> Vec<String> {
    (0..days).rev().map(|i| format!("Day -{i}")).collect()
}

fn to_percent_of_total(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| 100.0 * v / total).collect()
}

#[cfg(test)]
mod tests {
    use super::to_percent_of_total;

    #[test]
    fn percent_series_sums_to_hundred() {
        let pct = to_percent_of_total(&[1.0, 1.0, 2.0]);
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert_eq!(pct[2], 50.0);
        assert_eq!(to_percent_of_total(&[0.0, 0.0]), vec![0.0, 0.0]);
    }
}
