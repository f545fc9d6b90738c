//! Read-only valuation of a position snapshot against live prices.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use stockfolio_market_data::MarketDataProvider;

use crate::errors::Result;
use crate::ledger::Position;

use super::valuation_model::{HoldingMetrics, PortfolioValuation, ValuationReport};

/// Public interface of the valuation service.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Value a snapshot of positions at current market prices.
    ///
    /// Performs no mutation and no persistence; for a fixed snapshot and
    /// fixed provider answers the result is the same on every call.
    async fn value_positions(&self, positions: &[Position]) -> Result<ValuationReport>;
}

/// Valuation service with an injected market data provider.
pub struct ValuationService {
    provider: Arc<dyn MarketDataProvider>,
}

impl ValuationService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value_positions(&self, positions: &[Position]) -> Result<ValuationReport> {
        if positions.is_empty() {
            debug!("No positions to value");
            return Ok(ValuationReport::Empty);
        }

        debug!(
            "Valuing {} positions via provider {}",
            positions.len(),
            self.provider.id()
        );

        // One lookup per ticker, fanned out concurrently; the provider
        // round trip is the dominant cost. Nothing is cached across calls.
        let lookups = positions.iter().map(|position| {
            let provider = Arc::clone(&self.provider);
            async move { (position, provider.get_latest_quote(&position.ticker).await) }
        });
        let results = join_all(lookups).await;

        let mut holdings = Vec::with_capacity(positions.len());
        let mut failed: Vec<(String, String)> = Vec::new();
        let mut total_pct_change = Decimal::ZERO;

        for (position, outcome) in results {
            match outcome {
                Ok(quote) => {
                    let metrics = HoldingMetrics::from_price(position, quote.close);
                    if let Some(pct_change) = metrics.pct_change {
                        total_pct_change += pct_change;
                    }
                    holdings.push(metrics);
                }
                // A single failed lookup must not abort the computation
                Err(e) => {
                    warn!("Price lookup failed for {}: {}", position.ticker, e);
                    failed.push((position.ticker.clone(), e.to_string()));
                }
            }
        }

        Ok(ValuationReport::Valued(PortfolioValuation {
            holdings,
            total_pct_change,
            failed,
        }))
    }
}
