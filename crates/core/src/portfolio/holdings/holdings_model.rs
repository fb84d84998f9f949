use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Broad asset class of a position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stock,
    Bond,
    Fund,
    Crypto,
    Commodity,
    Cash,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Bond => "bond",
            AssetType::Fund => "fund",
            AssetType::Crypto => "crypto",
            AssetType::Commodity => "commodity",
            AssetType::Cash => "cash",
        }
    }

    /// Stocks and (equity) funds count toward equity exposure.
    pub fn is_equity(&self) -> bool {
        matches!(self, AssetType::Stock | AssetType::Fund)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One portfolio position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub asset_type: AssetType,

    // Classification tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Sensitivity to the market. Calculators substitute a default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl Holding {
    /// Creates a validated holding.
    ///
    /// Quantity must be non-negative and both prices strictly positive.
    pub fn new(
        symbol: impl Into<String>,
        quantity: Decimal,
        buy_price: Decimal,
        current_price: Decimal,
        asset_type: AssetType,
    ) -> Result<Self> {
        let holding = Self {
            symbol: symbol.into(),
            name: None,
            quantity,
            buy_price,
            current_price,
            asset_type,
            sector: None,
            region: None,
            style: None,
            beta: None,
        };
        holding.validate()?;
        Ok(holding)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Checks the holding invariants. Deserialized holdings should be validated
    /// before they reach a calculator.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::invalid_input("holding symbol must not be empty"));
        }
        if self.quantity < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "quantity for {} must be non-negative, got {}",
                self.symbol, self.quantity
            )));
        }
        if self.buy_price <= Decimal::ZERO || self.current_price <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "prices for {} must be positive (buy {}, current {})",
                self.symbol, self.buy_price, self.current_price
            )));
        }
        if let Some(beta) = self.beta {
            if !beta.is_finite() {
                return Err(Error::invalid_input(format!(
                    "beta for {} must be finite",
                    self.symbol
                )));
            }
        }
        Ok(())
    }

    pub fn market_value(&self) -> Decimal {
        self.quantity * self.current_price
    }

    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.buy_price
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.market_value() - self.cost_basis()
    }

    /// Price return since purchase, `(current - buy) / buy`.
    pub fn return_pct(&self) -> f64 {
        if self.buy_price.is_zero() {
            return 0.0;
        }
        ((self.current_price - self.buy_price) / self.buy_price)
            .to_f64()
            .unwrap_or(0.0)
    }

    pub fn market_value_f64(&self) -> f64 {
        self.market_value().to_f64().unwrap_or(0.0)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Drops positions with zero quantity. They are removed, never carried.
pub fn normalize_holdings(holdings: Vec<Holding>) -> Vec<Holding> {
    holdings
        .into_iter()
        .filter(|h| !h.quantity.is_zero())
        .collect()
}

/// Sum of market values.
pub fn total_market_value(holdings: &[Holding]) -> Decimal {
    holdings.iter().map(Holding::market_value).sum()
}

/// Market-value weights in holding order. All zero when the total is zero.
pub fn value_weights(holdings: &[Holding]) -> Vec<f64> {
    let total = total_market_value(holdings);
    if total.is_zero() {
        return vec![0.0; holdings.len()];
    }
    holdings
        .iter()
        .map(|h| (h.market_value() / total).to_f64().unwrap_or(0.0))
        .collect()
}
