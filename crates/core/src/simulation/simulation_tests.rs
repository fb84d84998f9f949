#[cfg(test)]
mod tests {
    use crate::simulation::{
        Factor, FactorExposure, FactorModelParams, MonteCarloSimulator, SimulationConfig,
        SimulationParams,
    };
    use crate::simulation::monte_carlo::run_paths;
    use crate::utils::rng::{child_seeds, seeded};
    use crate::utils::stats::{max_drawdown, mean};
    use rand::rngs::StdRng;
    use rand::Rng;
    use rand_distr::StandardNormal;

    fn no_jumps() -> MonteCarloSimulator {
        MonteCarloSimulator::new(SimulationConfig {
            jumps_enabled: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_expected_value_matches_drift_without_jumps() {
        let params = SimulationParams::new(100_000.0, 0.08, 0.15);
        let result = no_jumps().simulate(&params, 252, 5_000, &mut seeded(42));
        let analytic = 100_000.0 * 1.08f64.powf(252.0 / 252.0);
        let relative_error = (result.expected_value - analytic).abs() / analytic;
        assert!(
            relative_error < 0.02,
            "expected {} got {}",
            analytic,
            result.expected_value
        );
    }

    #[test]
    fn test_short_horizon_expected_value() {
        let params = SimulationParams::new(50_000.0, 0.10, 0.20);
        let result = no_jumps().simulate(&params, 21, 2_000, &mut seeded(7));
        let analytic = 50_000.0 * 1.10f64.powf(21.0 / 252.0);
        assert!((result.expected_value - analytic).abs() / analytic < 0.02);
    }

    #[test]
    fn test_tail_statistics_are_ordered() {
        let params = SimulationParams::new(1_000.0, 0.05, 0.30);
        let result = MonteCarloSimulator::default().simulate(&params, 126, 1_000, &mut seeded(3));
        assert!(result.cvar_95 <= result.var_95);
        assert!(result.var_95_loss <= result.cvar_95_loss);
        assert!((0.0..=1.0).contains(&result.probability_of_loss));
        assert!((0.0..=1.0).contains(&result.max_drawdown));
        assert!(result.confidence_interval.lower <= result.median_value);
        assert!(result.median_value <= result.confidence_interval.upper);
        assert_eq!(result.confidence_interval.level, 0.95);
    }

    #[test]
    fn test_paths_and_bands_shape() {
        let params = SimulationParams::new(1_000.0, 0.08, 0.15);
        let result = MonteCarloSimulator::default().simulate(&params, 30, 500, &mut seeded(9));
        assert_eq!(result.num_simulations, 500);
        assert_eq!(result.paths.len(), 100);
        assert!(result.paths.iter().all(|p| p.len() == 31 && p[0] == 1_000.0));

        assert_eq!(result.percentile_bands.len(), 31);
        let first = &result.percentile_bands[0];
        assert_eq!(first.p5, 1_000.0);
        assert_eq!(first.p95, 1_000.0);
        for band in &result.percentile_bands {
            assert!(band.p5 <= band.p25 && band.p25 <= band.p50);
            assert!(band.p50 <= band.p75 && band.p75 <= band.p95);
        }
    }

    #[test]
    fn test_band_buffer_size_does_not_change_results() {
        let config = SimulationConfig::default();
        let seeds = child_seeds(&mut seeded(11), 250);
        let daily_return = |rng: &mut StdRng| {
            let z: f64 = rng.sample(StandardNormal);
            0.0003 + 0.01 * z
        };

        let whole = run_paths(&seeds, 1_000.0, 40, &config, &daily_return, usize::MAX);
        // 250 * 3 values: three days per block, the last block partial
        let blocked = run_paths(&seeds, 1_000.0, 40, &config, &daily_return, 750);
        let one_day = run_paths(&seeds, 1_000.0, 40, &config, &daily_return, 1);

        assert_eq!(whole.percentile_bands.len(), 41);
        assert_eq!(blocked, whole);
        assert_eq!(one_day, whole);
    }

    #[test]
    fn test_unretained_paths_still_count() {
        let config = SimulationConfig {
            max_retained_paths: 5,
            ..Default::default()
        };
        let seeds = child_seeds(&mut seeded(4), 200);
        let daily_return = |rng: &mut StdRng| {
            let z: f64 = rng.sample(StandardNormal);
            0.01 * z
        };
        let capped = run_paths(&seeds, 100.0, 20, &config, &daily_return, usize::MAX);
        let all = run_paths(
            &seeds,
            100.0,
            20,
            &SimulationConfig {
                max_retained_paths: 200,
                ..Default::default()
            },
            &daily_return,
            usize::MAX,
        );

        assert_eq!(capped.paths.len(), 5);
        assert_eq!(capped.paths[..], all.paths[..5]);
        assert_eq!(capped.expected_value, all.expected_value);
        assert_eq!(capped.var_95, all.var_95);
        assert_eq!(capped.percentile_bands, all.percentile_bands);

        let finals: Vec<f64> = all.paths.iter().map(|p| p[20]).collect();
        assert!((all.expected_value - mean(&finals)).abs() < 1e-9);
        let worst = all.paths.iter().map(|p| max_drawdown(p)).fold(0.0, f64::max);
        assert_eq!(capped.max_drawdown, worst);
    }

    #[test]
    fn test_fewer_paths_than_retention_cap() {
        let params = SimulationParams::new(1_000.0, 0.08, 0.15);
        let result = MonteCarloSimulator::default().simulate(&params, 5, 10, &mut seeded(1));
        assert_eq!(result.paths.len(), 10);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let params = SimulationParams::new(10_000.0, 0.07, 0.2);
        let sim = MonteCarloSimulator::default();
        let a = sim.simulate(&params, 60, 300, &mut seeded(2024));
        let b = sim.simulate(&params, 60, 300, &mut seeded(2024));
        assert_eq!(a, b);

        let c = sim.simulate(&params, 60, 300, &mut seeded(2025));
        assert_ne!(a.expected_value, c.expected_value);
    }

    #[test]
    fn test_degenerate_inputs_use_defaults() {
        let params = SimulationParams::new(f64::NAN, -0.5, 0.0);
        let result = no_jumps().simulate(&params, 0, 0, &mut seeded(5));
        assert_eq!(result.initial_value, 1_000_000.0);
        assert_eq!(result.horizon_days, 252);
        assert_eq!(result.num_simulations, 1_000);
        assert!(result.expected_value.is_finite());
        let analytic = 1_000_000.0 * 1.08;
        assert!((result.expected_value - analytic).abs() / analytic < 0.03);
    }

    #[test]
    fn test_values_never_negative() {
        let sim = MonteCarloSimulator::new(SimulationConfig {
            jump_probability: 0.5,
            jump_mean: -0.5,
            jump_std_dev: 0.5,
            ..Default::default()
        });
        let params = SimulationParams::new(100.0, 0.01, 3.0);
        let result = sim.simulate(&params, 100, 200, &mut seeded(11));
        assert!(result.paths.iter().flatten().all(|v| *v >= 0.0));
        assert!(result.var_95 >= 0.0);
    }

    #[test]
    fn test_jumps_shift_distribution_down() {
        let params = SimulationParams::new(1_000.0, 0.08, 0.15);
        let with_jumps = MonteCarloSimulator::new(SimulationConfig {
            jump_probability: 0.05,
            ..Default::default()
        })
        .simulate(&params, 252, 2_000, &mut seeded(8));
        let without = no_jumps().simulate(&params, 252, 2_000, &mut seeded(8));
        assert!(with_jumps.expected_value < without.expected_value);
    }

    // ==================== Factor Model ====================

    #[test]
    fn test_factor_model_simulation() {
        let params = FactorModelParams {
            current_value: 100_000.0,
            exposures: vec![
                FactorExposure::new(Factor::Market, 1.0),
                FactorExposure::new(Factor::Size, 0.2),
                FactorExposure::new(Factor::Momentum, -0.1),
            ],
            r_squared: 0.85,
            residual_volatility: 0.18,
        };
        let result = MonteCarloSimulator::default().simulate_factor_model(
            &params,
            252,
            3_000,
            &mut seeded(17),
        );

        assert_eq!(result.contributions.len(), 3);
        assert_eq!(result.contributions[0].factor, Factor::Market);
        // 0.07 + 0.2 * 0.02 - 0.1 * 0.04
        assert!((result.expected_annual_return - 0.07).abs() < 1e-12);

        let analytic = 100_000.0 * (1.0 + result.expected_annual_return);
        let sim = &result.simulation;
        assert!((sim.expected_value - analytic).abs() / analytic < 0.03);
        assert!(sim.var_95_loss <= sim.cvar_95_loss);
        assert!((0.0..=1.0).contains(&sim.probability_of_loss));
    }

    #[test]
    fn test_factor_model_is_reproducible() {
        let params = FactorModelParams {
            current_value: 0.0,
            exposures: vec![FactorExposure::new(Factor::Quality, 0.8)],
            r_squared: 0.5,
            residual_volatility: 0.1,
        };
        let sim = MonteCarloSimulator::default();
        let a = sim.simulate_factor_model(&params, 20, 100, &mut seeded(1));
        let b = sim.simulate_factor_model(&params, 20, 100, &mut seeded(1));
        assert_eq!(a, b);
        assert_eq!(a.simulation.initial_value, 1_000_000.0);
    }
}
