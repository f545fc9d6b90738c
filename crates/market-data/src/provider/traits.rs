//! Market data provider trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, Quote};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The valuation engine holds providers as `Arc<dyn MarketDataProvider>`
/// and issues one lookup per distinct ticker; any per-call retry or
/// timeout policy belongs to the implementation, not to callers.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and
    /// error attribution.
    fn id(&self) -> &'static str;

    /// Check whether a symbol is recognized and has tradable metadata.
    ///
    /// Returns `Ok(false)` for a well-formed query the provider simply
    /// does not know; reserves `Err` for transport or provider failures.
    async fn validate_symbol(&self, symbol: &str) -> Result<bool, MarketDataError>;

    /// Fetch the latest quote for a symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch historical quotes for a symbol.
    ///
    /// Returns quotes for the date range ordered by timestamp ascending,
    /// or `NoDataForRange` when the symbol exists but has no quotes in
    /// the period.
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError>;

    /// Fetch descriptive profile data for a symbol.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        let _ = symbol;
        Err(MarketDataError::NotSupported {
            operation: "profile".to_string(),
            provider: self.id().to_string(),
        })
    }
}
