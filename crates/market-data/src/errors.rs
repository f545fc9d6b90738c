//! Error types for market data operations.

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
///
/// `SymbolNotFound` is terminal for the requested symbol; callers that
/// fan out over many symbols should treat every variant as a per-symbol
/// failure rather than aborting the whole batch.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol is not recognized by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has no quotes in the requested period.
    #[error("No data for date range")]
    NoDataForRange,

    /// The provider returned an error or unusable payload.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider does not implement the requested operation.
    #[error("Operation '{operation}' not supported by provider {provider}")]
    NotSupported {
        /// The operation that was requested
        operation: String,
        /// The provider that was asked
        provider: String,
    },

    /// A provider response could not be parsed or converted.
    #[error("Parsing error: {0}")]
    Parse(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
