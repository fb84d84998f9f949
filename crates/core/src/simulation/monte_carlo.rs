//! Monte Carlo simulator: jump-diffusion GBM and a factor-model variant.
//!
//! A child seed is drawn per path from the caller's generator before any path
//! runs, and each path owns a generator seeded from it. Paths are then
//! generated on the rayon pool, so a seeded caller gets identical results no
//! matter how many threads run.
//!
//! Only the retained paths are stored. Every other path is reduced to its
//! final value and drawdown as it is walked. Percentile bands replay the paths
//! from their seeds, a block of days at a time, into one fixed-size buffer.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use super::factor_model::FactorModel;
use super::simulation_model::{
    ConfidenceInterval, FactorModelParams, FactorSimulationResult, PercentileBand,
    SimulationConfig, SimulationParams, SimulationResult,
};
use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::utils::rng::{child_seeds, seeded};
use crate::utils::stats::{mean, percentile_sorted, sorted, tail_mean_sorted, DrawdownTracker};

const TAIL_PROBABILITY: f64 = 0.05;

/// Upper bound on path values held at once while computing percentile bands.
const BAND_BUFFER_VALUES: usize = 1 << 22;

#[derive(Debug, Clone, Default)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
}

impl MonteCarloSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates `num_simulations` value paths over `horizon_days`.
    ///
    /// Degenerate inputs (zero, negative or non-finite) are replaced by the
    /// configured defaults with a warning.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        params: &SimulationParams,
        horizon_days: usize,
        num_simulations: usize,
        rng: &mut R,
    ) -> SimulationResult {
        let params = self.sanitize_params(params);
        let horizon_days = self.sanitize_horizon(horizon_days);
        let num_simulations = self.sanitize_count(num_simulations);

        let drift = params.expected_return / TRADING_DAYS_PER_YEAR;
        let diffusion = params.volatility / TRADING_DAYS_PER_YEAR.sqrt();
        let config = &self.config;

        let seeds = child_seeds(rng, num_simulations);
        let daily_return = |path_rng: &mut StdRng| {
            let z: f64 = path_rng.sample(StandardNormal);
            drift + diffusion * z + jump(config, path_rng)
        };

        let result = run_paths(
            &seeds,
            params.current_value,
            horizon_days,
            config,
            &daily_return,
            BAND_BUFFER_VALUES,
        );
        debug!(
            "Simulated {} paths over {} days: expected={:.2} var95={:.2} p(loss)={:.3}",
            num_simulations,
            horizon_days,
            result.expected_value,
            result.var_95,
            result.probability_of_loss
        );
        result
    }

    /// Simulates paths whose daily return is the sum of factor shocks plus an
    /// idiosyncratic residual, and reports per-factor contributions.
    pub fn simulate_factor_model<R: Rng + ?Sized>(
        &self,
        params: &FactorModelParams,
        horizon_days: usize,
        num_simulations: usize,
        rng: &mut R,
    ) -> FactorSimulationResult {
        let current_value = self.positive_or_default(
            "current value",
            params.current_value,
            self.config.default_current_value,
        );
        let horizon_days = self.sanitize_horizon(horizon_days);
        let num_simulations = self.sanitize_count(num_simulations);

        let model = FactorModel::resolve(params, &self.config);
        let seeds = child_seeds(rng, num_simulations);
        let daily_return = |path_rng: &mut StdRng| model.daily_return(path_rng);

        FactorSimulationResult {
            simulation: run_paths(
                &seeds,
                current_value,
                horizon_days,
                &self.config,
                &daily_return,
                BAND_BUFFER_VALUES,
            ),
            contributions: model.contributions(),
            idiosyncratic_volatility: model.idiosyncratic_volatility(),
            idiosyncratic_risk_share: model.idiosyncratic_risk_share(),
            expected_annual_return: model.expected_annual_return(),
            annual_volatility: model.annual_volatility(),
        }
    }

    fn sanitize_params(&self, params: &SimulationParams) -> SimulationParams {
        SimulationParams {
            current_value: self.positive_or_default(
                "current value",
                params.current_value,
                self.config.default_current_value,
            ),
            expected_return: self.positive_or_default(
                "expected return",
                params.expected_return,
                self.config.default_expected_return,
            ),
            volatility: self.positive_or_default(
                "volatility",
                params.volatility,
                self.config.default_volatility,
            ),
        }
    }

    fn positive_or_default(&self, name: &str, value: f64, default: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            warn!("Degenerate {} {}; using default {}", name, value, default);
            default
        }
    }

    fn sanitize_horizon(&self, horizon_days: usize) -> usize {
        if horizon_days == 0 {
            warn!(
                "Horizon of 0 days; using default {}",
                self.config.default_horizon_days
            );
            return self.config.default_horizon_days.max(1);
        }
        horizon_days
    }

    fn sanitize_count(&self, num_simulations: usize) -> usize {
        if num_simulations == 0 {
            warn!(
                "Zero simulations requested; using default {}",
                self.config.default_num_simulations
            );
            return self.config.default_num_simulations.max(1);
        }
        num_simulations
    }
}

fn jump<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> f64 {
    if !config.jumps_enabled || rng.gen::<f64>() >= config.jump_probability {
        return 0.0;
    }
    let z: f64 = rng.sample(StandardNormal);
    config.jump_mean + config.jump_std_dev * z
}

/// Walks the path of `seed` through `days` steps, handing every value (day 0
/// included) to `visit`. Values never go below zero.
fn walk<F, V>(seed: u64, initial: f64, days: usize, daily_return: &F, mut visit: V)
where
    F: Fn(&mut StdRng) -> f64,
    V: FnMut(usize, f64),
{
    let mut rng = seeded(seed);
    let mut value = initial;
    visit(0, value);
    for day in 1..=days {
        value = (value * (1.0 + daily_return(&mut rng))).max(0.0);
        visit(day, value);
    }
}

struct PathOutcome {
    final_value: f64,
    max_drawdown: f64,
    path: Option<Vec<f64>>,
}

/// Runs one path per seed and summarizes them. `band_buffer_values` bounds the
/// buffer used for the percentile bands.
pub(crate) fn run_paths<F>(
    seeds: &[u64],
    initial_value: f64,
    horizon_days: usize,
    config: &SimulationConfig,
    daily_return: &F,
    band_buffer_values: usize,
) -> SimulationResult
where
    F: Fn(&mut StdRng) -> f64 + Sync,
{
    let retain = config.max_retained_paths;
    let outcomes: Vec<PathOutcome> = seeds
        .par_iter()
        .enumerate()
        .map(|(i, &seed)| {
            let mut path = (i < retain).then(|| Vec::with_capacity(horizon_days + 1));
            let mut drawdown = DrawdownTracker::new(initial_value);
            let mut final_value = initial_value;
            walk(seed, initial_value, horizon_days, daily_return, |_, value| {
                drawdown.push(value);
                final_value = value;
                if let Some(path) = path.as_mut() {
                    path.push(value);
                }
            });
            PathOutcome {
                final_value,
                max_drawdown: drawdown.max_drawdown(),
                path,
            }
        })
        .collect();

    let num_simulations = outcomes.len();
    let finals: Vec<f64> = outcomes.iter().map(|o| o.final_value).collect();
    let ordered = sorted(&finals);

    let var_95 = percentile_sorted(&ordered, TAIL_PROBABILITY);
    let cvar_95 = tail_mean_sorted(&ordered, TAIL_PROBABILITY);

    let losing = finals.iter().filter(|v| **v < initial_value).count();
    let probability_of_loss = if num_simulations == 0 {
        0.0
    } else {
        losing as f64 / num_simulations as f64
    };

    let worst_drawdown = outcomes.iter().map(|o| o.max_drawdown).fold(0.0, f64::max);
    let paths: Vec<Vec<f64>> = outcomes.into_iter().filter_map(|o| o.path).collect();

    let level = if config.confidence_level.is_finite() {
        config.confidence_level.clamp(0.0, 1.0)
    } else {
        0.95
    };
    let alpha = (1.0 - level) / 2.0;

    let percentile_bands =
        percentile_bands(seeds, initial_value, horizon_days, daily_return, band_buffer_values);

    SimulationResult {
        initial_value,
        horizon_days,
        num_simulations,
        expected_value: mean(&finals),
        median_value: percentile_sorted(&ordered, 0.5),
        var_95,
        cvar_95,
        var_95_loss: initial_value - var_95,
        cvar_95_loss: initial_value - cvar_95,
        max_drawdown: worst_drawdown,
        probability_of_loss,
        confidence_interval: ConfidenceInterval {
            level,
            lower: percentile_sorted(&ordered, alpha),
            upper: percentile_sorted(&ordered, 1.0 - alpha),
        },
        percentile_bands,
        paths,
    }
}

/// p5/p25/p50/p75/p95 for every day. Paths are replayed from their seeds one
/// block of days at a time; a block holds at most `buffer_values` values (one
/// day minimum), stored path-major in a single reused buffer.
fn percentile_bands<F>(
    seeds: &[u64],
    initial_value: f64,
    horizon_days: usize,
    daily_return: &F,
    buffer_values: usize,
) -> Vec<PercentileBand>
where
    F: Fn(&mut StdRng) -> f64 + Sync,
{
    let days = horizon_days + 1;
    if seeds.is_empty() {
        return Vec::new();
    }
    let block = (buffer_values / seeds.len()).clamp(1, days);
    let mut buffer = vec![0.0; seeds.len() * block];
    let mut bands = Vec::with_capacity(days);

    let mut start = 0;
    while start < days {
        let end = (start + block).min(days);
        buffer
            .par_chunks_mut(block)
            .zip(seeds.par_iter())
            .for_each(|(row, &seed)| {
                walk(seed, initial_value, end - 1, daily_return, |day, value| {
                    if day >= start {
                        row[day - start] = value;
                    }
                });
            });

        let block_bands: Vec<PercentileBand> = (start..end)
            .into_par_iter()
            .map(|day| {
                let mut column: Vec<f64> = buffer.chunks(block).map(|row| row[day - start]).collect();
                column.sort_by(|a, b| a.total_cmp(b));
                PercentileBand {
                    day,
                    p5: percentile_sorted(&column, 0.05),
                    p25: percentile_sorted(&column, 0.25),
                    p50: percentile_sorted(&column, 0.50),
                    p75: percentile_sorted(&column, 0.75),
                    p95: percentile_sorted(&column, 0.95),
                }
            })
            .collect();
        bands.extend(block_bands);
        start = end;
    }
    bands
}
