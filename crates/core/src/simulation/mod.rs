//! Monte Carlo simulation module - forward value paths, tail risk and factor attribution.

mod factor_model;
mod monte_carlo;
mod simulation_model;

pub use monte_carlo::MonteCarloSimulator;
pub use simulation_model::{
    ConfidenceInterval, Factor, FactorContribution, FactorExposure, FactorModelParams,
    FactorSimulationResult, PercentileBand, SimulationConfig, SimulationParams, SimulationResult,
};

#[cfg(test)]
mod simulation_tests;
