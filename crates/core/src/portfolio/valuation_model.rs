//! Valuation domain models.
//!
//! Derived metrics are computed on demand and never persisted; the
//! engine returns plain numbers and leaves formatting and coloring to
//! the presentation layer.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::Position;

/// One position enriched with live-price performance metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingMetrics {
    pub ticker: String,
    pub quantity: u64,
    pub avg_cost: Decimal,
    pub current_price: Decimal,
    /// quantity * current_price
    pub total_value: Decimal,
    /// (current_price - avg_cost) * quantity
    pub gain_loss: Decimal,
    /// gain_loss as a percentage of cost basis; None when the cost basis
    /// is zero and the division is undefined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<Decimal>,
}

impl HoldingMetrics {
    /// Derive metrics for a position at the given market price.
    pub fn from_price(position: &Position, current_price: Decimal) -> Self {
        let quantity = Decimal::from(position.quantity);
        let total_value = quantity * current_price;
        let gain_loss = (current_price - position.avg_cost) * quantity;

        let cost_basis = position.avg_cost * quantity;
        // Zero cost basis cannot occur for a stored position, but guard
        // the division instead of trusting it
        let pct_change = if cost_basis.is_zero() {
            None
        } else {
            Some(gain_loss / cost_basis * Decimal::ONE_HUNDRED)
        };

        Self {
            ticker: position.ticker.clone(),
            quantity: position.quantity,
            avg_cost: position.avg_cost,
            current_price,
            total_value,
            gain_loss,
            pct_change,
        }
    }
}

/// Full-portfolio valuation with per-ticker failure reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    /// Ticker-sorted rows, one per position with a successful lookup
    pub holdings: Vec<HoldingMetrics>,
    /// Sum of pct_change over rows where it is defined
    pub total_pct_change: Decimal,
    /// Tickers whose price lookup failed, with the failure reason;
    /// excluded from `holdings` and from `total_pct_change`
    pub failed: Vec<(String, String)>,
}

/// Valuation result that distinguishes "no holdings at all" from a
/// portfolio that happens to value to zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ValuationReport {
    Empty,
    Valued(PortfolioValuation),
}
