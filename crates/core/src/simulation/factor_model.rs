//! Multi-factor return model used by the factor variant of the simulator.
//!
//! Factor shocks are independent normals. The idiosyncratic residual carries
//! the variance the factors do not explain: `sigma_idio = sigma * sqrt(1 - R^2)`.

use log::warn;
use rand::Rng;
use rand_distr::StandardNormal;

use super::simulation_model::{
    Factor, FactorContribution, FactorExposure, FactorModelParams, SimulationConfig,
};
use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::utils::stats::safe_div;

#[derive(Debug, Clone, Copy)]
struct ResolvedExposure {
    factor: Factor,
    loading: f64,
    annual_mean: f64,
    annual_volatility: f64,
}

/// Factor model with every input checked and defaults applied.
#[derive(Debug, Clone)]
pub(crate) struct FactorModel {
    exposures: Vec<ResolvedExposure>,
    idiosyncratic_volatility: f64,
}

impl FactorModel {
    pub(crate) fn resolve(params: &FactorModelParams, config: &SimulationConfig) -> Self {
        let exposures = params
            .exposures
            .iter()
            .filter_map(resolve_exposure)
            .collect();

        let r_squared = if params.r_squared.is_finite() {
            params.r_squared.clamp(0.0, 1.0)
        } else {
            warn!("Non-finite R-squared {}; treating factors as explaining nothing", params.r_squared);
            0.0
        };

        let residual_volatility =
            if params.residual_volatility.is_finite() && params.residual_volatility >= 0.0 {
                params.residual_volatility
            } else {
                warn!(
                    "Invalid residual volatility {}; using default {}",
                    params.residual_volatility, config.default_volatility
                );
                config.default_volatility
            };

        Self {
            exposures,
            idiosyncratic_volatility: residual_volatility * (1.0 - r_squared).sqrt(),
        }
    }

    pub(crate) fn idiosyncratic_volatility(&self) -> f64 {
        self.idiosyncratic_volatility
    }

    /// One day's portfolio return.
    pub(crate) fn daily_return<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let sqrt_days = TRADING_DAYS_PER_YEAR.sqrt();
        let systematic: f64 = self
            .exposures
            .iter()
            .map(|e| {
                let z: f64 = rng.sample(StandardNormal);
                e.loading
                    * (e.annual_mean / TRADING_DAYS_PER_YEAR + e.annual_volatility / sqrt_days * z)
            })
            .sum();
        let z: f64 = rng.sample(StandardNormal);
        systematic + self.idiosyncratic_volatility / sqrt_days * z
    }

    pub(crate) fn expected_annual_return(&self) -> f64 {
        self.exposures.iter().map(|e| e.loading * e.annual_mean).sum()
    }

    fn total_variance(&self) -> f64 {
        self.exposures
            .iter()
            .map(|e| (e.loading * e.annual_volatility).powi(2))
            .sum::<f64>()
            + self.idiosyncratic_volatility.powi(2)
    }

    pub(crate) fn annual_volatility(&self) -> f64 {
        self.total_variance().sqrt()
    }

    pub(crate) fn idiosyncratic_risk_share(&self) -> f64 {
        safe_div(self.idiosyncratic_volatility.powi(2), self.total_variance())
    }

    pub(crate) fn contributions(&self) -> Vec<FactorContribution> {
        let total = self.total_variance();
        self.exposures
            .iter()
            .map(|e| FactorContribution {
                factor: e.factor,
                loading: e.loading,
                expected_return: e.loading * e.annual_mean,
                risk_contribution: safe_div((e.loading * e.annual_volatility).powi(2), total),
            })
            .collect()
    }
}

fn resolve_exposure(exposure: &FactorExposure) -> Option<ResolvedExposure> {
    if !exposure.loading.is_finite() {
        warn!(
            "Dropping {:?} exposure with non-finite loading {}",
            exposure.factor, exposure.loading
        );
        return None;
    }

    let mut annual_mean = exposure.mean();
    if !annual_mean.is_finite() {
        warn!("Invalid {:?} mean {}; using default", exposure.factor, annual_mean);
        annual_mean = exposure.factor.default_annual_mean();
    }

    let mut annual_volatility = exposure.volatility();
    if !annual_volatility.is_finite() || annual_volatility < 0.0 {
        warn!(
            "Invalid {:?} volatility {}; using default",
            exposure.factor, annual_volatility
        );
        annual_volatility = exposure.factor.default_annual_volatility();
    }

    Some(ResolvedExposure {
        factor: exposure.factor,
        loading: exposure.loading,
        annual_mean,
        annual_volatility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(exposures: Vec<FactorExposure>, r_squared: f64, residual: f64) -> FactorModelParams {
        FactorModelParams {
            current_value: 100_000.0,
            exposures,
            r_squared,
            residual_volatility: residual,
        }
    }

    #[test]
    fn test_idiosyncratic_volatility_shrinks_with_r_squared() {
        let config = SimulationConfig::default();
        let model = FactorModel::resolve(&params(vec![], 0.75, 0.20), &config);
        assert!((model.idiosyncratic_volatility() - 0.10).abs() < 1e-12);

        let model = FactorModel::resolve(&params(vec![], 1.0, 0.20), &config);
        assert_eq!(model.idiosyncratic_volatility(), 0.0);

        // Out of range R-squared is clamped
        let model = FactorModel::resolve(&params(vec![], -3.0, 0.20), &config);
        assert!((model.idiosyncratic_volatility() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_contributions_sum_with_idiosyncratic_share_to_one() {
        let config = SimulationConfig::default();
        let exposures = vec![
            FactorExposure::new(Factor::Market, 1.0),
            FactorExposure::new(Factor::Value, 0.5),
        ];
        let model = FactorModel::resolve(&params(exposures, 0.8, 0.15), &config);
        let contributions = model.contributions();
        let total: f64 = contributions.iter().map(|c| c.risk_contribution).sum::<f64>()
            + model.idiosyncratic_risk_share();
        assert!((total - 1.0).abs() < 1e-12);

        assert!((contributions[0].expected_return - 0.07).abs() < 1e-12);
        assert!((contributions[1].expected_return - 0.015).abs() < 1e-12);
        assert!((model.expected_annual_return() - 0.085).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_exposures_are_repaired_or_dropped() {
        let config = SimulationConfig::default();
        let exposures = vec![
            FactorExposure::new(Factor::Size, f64::NAN),
            FactorExposure {
                annual_volatility: Some(-1.0),
                ..FactorExposure::new(Factor::Momentum, 0.3)
            },
        ];
        let model = FactorModel::resolve(&params(exposures, 0.5, f64::NAN), &config);
        let contributions = model.contributions();
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].factor, Factor::Momentum);
        let expected_idio = 0.15 * 0.5f64.sqrt();
        assert!((model.idiosyncratic_volatility() - expected_idio).abs() < 1e-12);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let exposure = FactorExposure {
            annual_mean: Some(0.10),
            annual_volatility: Some(0.20),
            ..FactorExposure::new(Factor::Quality, 2.0)
        };
        assert_eq!(exposure.mean(), 0.10);
        assert_eq!(exposure.volatility(), 0.20);
        assert_eq!(FactorExposure::new(Factor::Quality, 1.0).mean(), 0.03);
    }
}
