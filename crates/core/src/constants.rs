/// Trading days used to annualize daily figures
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate used by Sharpe and Treynor ratios
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// One-sided normal quantile for 95% confidence
pub const Z_SCORE_95: f64 = 1.645;

/// One-sided normal quantile for 99% confidence
pub const Z_SCORE_99: f64 = 2.326;

/// Holding period, in days, that VaR is scaled to
pub const VAR_HORIZON_DAYS: f64 = 10.0;

/// Below this many return observations VaR falls back to the parametric estimate
pub const MIN_HISTORICAL_VAR_OBSERVATIONS: usize = 10;

/// Volatilities and standard deviations below this are treated as zero
pub const EPSILON: f64 = 1e-12;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: usize = 2;
