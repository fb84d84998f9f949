//! Property-based integration tests for the calculators.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use quantfolio_core::backtest::{BacktestEngine, StrategyKind, StrategyParams, TradeAction};
use quantfolio_core::portfolio::analysis::{AnalysisResult, PortfolioRiskAnalyzer};
use quantfolio_core::portfolio::holdings::{AssetType, Holding};
use quantfolio_core::risk::{MarketSnapshot, NewsSentiment, PortfolioProfile, RiskLevel, RiskScorer};
use quantfolio_core::simulation::{MonteCarloSimulator, SimulationParams};
use quantfolio_core::utils::rng::seeded;
use quantfolio_market_data::PriceSeries;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Generates a market snapshot with every optional field independently present.
fn arb_market_snapshot() -> impl Strategy<Value = MarketSnapshot> {
    (
        proptest::collection::vec(1.0f64..500.0, 0..40),
        proptest::option::of(0.0f64..2.0),
        proptest::option::of(0.0f64..1e8),
        proptest::option::of(0.0f64..0.2),
        proptest::option::of(-1.0f64..1.0),
        proptest::option::of(0.0f64..1.0),
    )
        .prop_map(
            |(closes, volatility, average_volume, bid_ask_spread, correlation, contagion)| {
                MarketSnapshot {
                    closes,
                    volatility,
                    average_volume,
                    bid_ask_spread,
                    average_correlation: correlation,
                    contagion_indicator: contagion,
                }
            },
        )
}

/// Generates a portfolio profile with non-negative weights.
fn arb_profile() -> impl Strategy<Value = PortfolioProfile> {
    (
        0.0f64..1e9,
        proptest::option::of(-2.0f64..4.0),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        proptest::collection::vec(0.0f64..1.0, 0..20),
    )
        .prop_map(
            |(total_value, beta, high_yield, emerging_markets, crypto_exposure, weights)| {
                PortfolioProfile {
                    total_value,
                    beta,
                    high_yield,
                    emerging_markets,
                    crypto_exposure,
                    weights,
                }
            },
        )
}

/// Generates a valid sentiment breakdown, or none.
fn arb_sentiment() -> impl Strategy<Value = Option<NewsSentiment>> {
    proptest::option::of(
        (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..3.0).prop_map(
            |(bullish, bearish, neutral, volatility)| NewsSentiment::Breakdown {
                bullish,
                bearish,
                neutral,
                volatility,
            },
        ),
    )
}

fn arb_asset_type() -> impl Strategy<Value = AssetType> {
    prop_oneof![
        Just(AssetType::Stock),
        Just(AssetType::Bond),
        Just(AssetType::Fund),
        Just(AssetType::Crypto),
        Just(AssetType::Commodity),
        Just(AssetType::Cash),
    ]
}

/// Generates a valid holding with positive quantity and prices.
fn arb_holding() -> impl Strategy<Value = Holding> {
    (
        "[A-Z]{2,5}",
        1i64..10_000,
        1i64..100_000,
        1i64..100_000,
        arb_asset_type(),
    )
        .prop_map(|(symbol, quantity, buy_cents, current_cents, asset_type)| {
            Holding {
                symbol,
                name: None,
                quantity: Decimal::from(quantity),
                buy_price: Decimal::new(buy_cents, 2),
                current_price: Decimal::new(current_cents, 2),
                asset_type,
                sector: None,
                region: None,
                style: None,
                beta: None,
            }
        })
}

fn arb_strategy() -> impl Strategy<Value = StrategyKind> {
    prop_oneof![
        Just(StrategyKind::BuyAndHold),
        Just(StrategyKind::Momentum),
        Just(StrategyKind::MeanReversion),
        Just(StrategyKind::MacdCrossover),
    ]
}

/// Generates a positive random-walk close series.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-0.05f64..0.05, 1..150).prop_map(|returns| {
        let mut price = 100.0;
        returns
            .into_iter()
            .map(|r| {
                price *= 1.0 + r;
                price
            })
            .collect()
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Risk scores are bounded**
    ///
    /// Every component score and the composite lie in [0, 100].
    #[test]
    fn prop_risk_scores_are_bounded(
        market in arb_market_snapshot(),
        profile in arb_profile(),
        sentiment in arb_sentiment(),
    ) {
        let result = RiskScorer::default()
            .score(&market, &profile, sentiment.as_ref())
            .unwrap();
        for score in result.components.as_array() {
            prop_assert!((0.0..=100.0).contains(&score), "component {} out of range", score);
        }
        prop_assert!(result.total_risk <= 100);
        prop_assert_eq!(result.level, RiskLevel::from_score(f64::from(result.total_risk)));
    }

    /// **Property 2: Risk scoring is deterministic**
    ///
    /// Identical inputs always yield an identical result.
    #[test]
    fn prop_risk_scoring_is_deterministic(
        market in arb_market_snapshot(),
        profile in arb_profile(),
        sentiment in arb_sentiment(),
    ) {
        let scorer = RiskScorer::default();
        let a = scorer.score(&market, &profile, sentiment.as_ref()).unwrap();
        let b = scorer.score(&market, &profile, sentiment.as_ref()).unwrap();
        prop_assert_eq!(a, b);
    }

    /// **Property 3: Risk bands are contiguous and exhaustive**
    ///
    /// Every score in [0, 100] maps to the band whose lower bound is the
    /// greatest one not above the score.
    #[test]
    fn prop_risk_bands_are_exhaustive(score in 0.0f64..=100.0) {
        let level = RiskLevel::from_score(score);
        prop_assert!(level.lower_bound() <= score);
        let next = RiskLevel::ALL.iter().find(|l| **l > level);
        if let Some(next) = next {
            prop_assert!(score < next.lower_bound());
        }
    }

    /// **Property 4: Herfindahl index is in (0, 1]**
    ///
    /// For any non-empty portfolio the HHI is positive and at most 1, and the
    /// effective number of holdings never exceeds the holding count.
    #[test]
    fn prop_herfindahl_is_bounded(
        holdings in proptest::collection::vec(arb_holding(), 1..30)
    ) {
        let result = PortfolioRiskAnalyzer::default().analyze(&holdings, None).unwrap();
        let hhi = result.diversification.herfindahl_index;
        prop_assert!(hhi > 0.0 && hhi <= 1.0 + 1e-12, "hhi {}", hhi);
        prop_assert!(result.diversification.effective_holdings <= holdings.len() as f64 + 1e-9);
        prop_assert!(result.metrics.var_95 >= 0.0);
        prop_assert!(result.metrics.var_99 >= 0.0);
    }

    /// **Property 5: Single holding is fully concentrated**
    #[test]
    fn prop_single_holding_hhi_is_one(holding in arb_holding()) {
        let result = PortfolioRiskAnalyzer::default().analyze(&[holding], None).unwrap();
        prop_assert!((result.diversification.herfindahl_index - 1.0).abs() < 1e-12);
    }

    /// **Property 6: Sharpe is zero without volatility**
    ///
    /// When every holding has the same price return the volatility is 0 and
    /// the Sharpe ratio is exactly 0, whatever the return.
    #[test]
    fn prop_sharpe_zero_without_volatility(
        holdings in proptest::collection::vec(arb_holding(), 1..10),
        ratio_pct in 1i64..300,
    ) {
        let holdings: Vec<Holding> = holdings
            .into_iter()
            .map(|mut h| {
                h.current_price = h.buy_price * Decimal::new(ratio_pct, 2);
                h
            })
            .collect();
        let result = PortfolioRiskAnalyzer::default().analyze(&holdings, None).unwrap();
        if result.metrics.volatility == 0.0 {
            prop_assert_eq!(result.metrics.sharpe_ratio, 0.0);
        }
    }

    /// **Property 7: Zero-quantity portfolios are empty, not errors**
    #[test]
    fn prop_zero_quantity_portfolio_is_empty(
        holdings in proptest::collection::vec(arb_holding(), 0..10)
    ) {
        let holdings: Vec<Holding> = holdings
            .into_iter()
            .map(|mut h| {
                h.quantity = Decimal::ZERO;
                h
            })
            .collect();
        let result = PortfolioRiskAnalyzer::default().analyze(&holdings, None).unwrap();
        prop_assert_eq!(result, AnalysisResult::empty());
    }

    /// **Property 8: Backtests never hold two positions**
    ///
    /// Trades strictly alternate BUY, SELL, BUY... and equity never goes
    /// negative, for every strategy over any positive price path.
    #[test]
    fn prop_backtest_trades_alternate(
        closes in arb_closes(),
        strategy in arb_strategy(),
    ) {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let series = PriceSeries::from_closes("PROP", start, &closes);
        let params = StrategyParams {
            ma_period: 5,
            lookback: 5,
            z_score_threshold: 1.0,
            fast_period: 3,
            slow_period: 8,
            signal_period: 3,
            initial_capital: 10_000.0,
        };
        let result = BacktestEngine::default()
            .run(&series, strategy.as_str(), &params, &mut seeded(0))
            .unwrap();

        for (i, trade) in result.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { TradeAction::Buy } else { TradeAction::Sell };
            prop_assert_eq!(trade.action, expected);
        }
        prop_assert_eq!(result.portfolio_values.len(), closes.len());
        prop_assert!(result.portfolio_values.iter().all(|v| v.value >= 0.0));
        prop_assert!((0.0..=1.0).contains(&result.metrics.win_rate));
        if strategy == StrategyKind::BuyAndHold {
            prop_assert!(result.trades.len() <= 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// **Property 9: Simulated tail statistics are ordered**
    ///
    /// CVaR is never a smaller loss than VaR, the loss probability is a
    /// probability, and retained paths are capped.
    #[test]
    fn prop_simulation_tail_is_ordered(
        seed in any::<u64>(),
        current_value in 1.0f64..1e7,
        expected_return in -0.5f64..0.5,
        volatility in 0.0f64..1.0,
        horizon_days in 1usize..60,
        num_simulations in 1usize..300,
    ) {
        let params = SimulationParams::new(current_value, expected_return, volatility);
        let result = MonteCarloSimulator::default().simulate(
            &params,
            horizon_days,
            num_simulations,
            &mut seeded(seed),
        );
        prop_assert!(result.var_95_loss <= result.cvar_95_loss + 1e-9);
        prop_assert!((0.0..=1.0).contains(&result.probability_of_loss));
        prop_assert!(result.paths.len() <= 100);
        prop_assert!(result.expected_value.is_finite());
        prop_assert_eq!(result.percentile_bands.len(), horizon_days + 1);
    }
}
